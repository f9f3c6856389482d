use crate::builtin;
use crate::completer::{CommandCompleter, ShellHelper};
use crate::env::Environment;
use crate::external::{self, PathIndex};
use crate::lexer;
use crate::redirect::{self, Stdout};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};
use std::io::{self, Write};

/// The interactive shell: reads lines, splits them into words, extracts
/// redirections, and dispatches to a builtin or an external program.
///
/// The program index and the environment are constructed once in the process
/// entry point and owned here for the rest of the run.
///
/// Example
/// ```
/// use minish::{Environment, Interpreter, PathIndex};
/// use std::ffi::OsStr;
///
/// let mut sh = Interpreter::new(Environment::new(), PathIndex::scan(OsStr::new("")));
/// sh.execute_line("echo hello world").unwrap();
/// ```
pub struct Interpreter {
    env: Environment,
    programs: PathIndex,
}

impl Interpreter {
    pub fn new(env: Environment, programs: PathIndex) -> Self {
        Self { env, programs }
    }

    /// The Read-Eval-Print Loop.
    ///
    /// Prompts with `$ `, keeps non-blank lines in history, and reports
    /// recoverable command errors without leaving the loop. The loop ends on
    /// end-of-input or after the `exit` builtin has run.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .build();
        let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::with_config(config)?;
        rl.set_helper(Some(ShellHelper::new(CommandCompleter::new(&self.programs))));

        loop {
            match rl.readline("$ ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    if let Err(e) = self.execute_line(&line) {
                        eprintln!("{e:#}");
                    }
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    /// Execute one input line against the process's standard streams.
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        self.execute_line_with_defaults(line, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Execute one input line, with `default_out`/`default_err` standing in
    /// for the channels no redirection targets.
    fn execute_line_with_defaults(
        &mut self,
        line: &str,
        default_out: Box<dyn Stdout>,
        default_err: Box<dyn Stdout>,
    ) -> Result<()> {
        let mut words = lexer::split_words(line)?;
        let spec = redirect::extract(&mut words)?;
        if words.is_empty() && spec.stdout.is_none() && spec.stderr.is_none() {
            return Ok(());
        }
        let (out, err) = redirect::open(&spec, default_out, default_err)?;
        self.dispatch(words, out, err)
    }

    /// Decide what the first word names and run it. Arms are tried in order;
    /// a builtin name with the wrong number of arguments falls through to
    /// program lookup and, failing that, to the not-found report.
    fn dispatch(
        &mut self,
        words: Vec<String>,
        mut out: Box<dyn Stdout>,
        err: Box<dyn Stdout>,
    ) -> Result<()> {
        match words.as_slice() {
            [name, args @ ..] if name == "echo" => builtin::echo(args, &mut out),
            [name, subject] if name == "type" => {
                builtin::type_of(subject, &self.programs, &mut out)
            }
            [name, _status] if name == "exit" => {
                self.env.should_exit = true;
                Ok(())
            }
            [name] if name == "pwd" => builtin::pwd(&self.env, &mut out),
            [name, target] if name == "cd" => builtin::cd(target, &mut self.env, &mut out),
            [name, args @ ..] => match self.programs.resolve(name) {
                Some(program) => return external::run(program, args, out, err),
                None => {
                    writeln!(out, "{}: command not found", words.join(" ")).map_err(Into::into)
                }
            },
            [] => writeln!(out, ": command not found").map_err(Into::into),
        }?;
        out.flush()?;
        Ok(())
    }
}
