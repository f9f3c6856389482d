//! Tab completion over the set of known command names.

use crate::builtin::BUILTIN_NAMES;
use crate::external::PathIndex;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Prefix completion over builtin names and the PathIndex, computed against
/// one immutable snapshot taken at startup.
pub struct CommandCompleter {
    names: Vec<String>,
}

impl CommandCompleter {
    /// Collect builtin ∪ indexed program names, deduplicated and sorted.
    pub fn new(programs: &PathIndex) -> Self {
        let mut names: Vec<String> = BUILTIN_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(programs.names().map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// All known command names starting with `prefix`, in sorted order.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// Rustyline glue around [`CommandCompleter`].
///
/// A single match is offered with a trailing space so the next argument can be
/// typed right away; multiple matches are listed by the editor below the
/// current input (the editor is configured with `CompletionType::List`).
pub struct ShellHelper {
    completer: CommandCompleter,
}

impl ShellHelper {
    pub fn new(completer: CommandCompleter) -> Self {
        Self { completer }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = &line[start..pos];

        let matches = self.completer.candidates(prefix);
        let single = matches.len() == 1;
        let pairs = matches
            .into_iter()
            .map(|name| {
                let replacement = if single { format!("{name} ") } else { name.clone() };
                Pair {
                    display: name,
                    replacement,
                }
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}
