//! Redirection handling: finding the operators in a word list and opening the
//! target files for the command about to run.
//!
//! Detection is token-based. An operator counts only when it stands alone as a
//! word (`>`, `1>`, `>>`, `1>>`, `2>`, `2>>`), which means a program argument
//! that happens to equal one of these strings is indistinguishable from a real
//! operator. That imprecision is accepted.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::process::Stdio;

/// Abstraction over a writable output stream that can also be converted into
/// a [`Stdio`] handle for spawning external processes.
///
/// Builtins write through the `Write` half in-process; external commands hand
/// the stream to `std::process::Command` via [`Stdout::stdio`]. A blanket
/// implementation exists for any type that implements `Write` and `Into<Stdio>`
/// (e.g. `File`, `io::Stdout`, `io::Stderr`).
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Destination file for one output channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path of the file to open.
    pub path: String,
    /// Append to the existing content instead of truncating it.
    pub append: bool,
}

/// Up to one stdout target and one stderr target per command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedirectSpec {
    pub stdout: Option<Target>,
    pub stderr: Option<Target>,
}

/// Errors found while extracting redirections from the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectError {
    /// An operator appeared as the last word, with no filename after it.
    MissingTarget(String),
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectError::MissingTarget(op) => {
                write!(f, "syntax error: expected a filename after `{op}`")
            }
        }
    }
}

impl std::error::Error for RedirectError {}

/// Extract redirection operators and their filename arguments out of `words`.
///
/// Operators are consulted in a fixed precedence order so that an append
/// operator overrides a truncate target chosen earlier on the same line:
/// `>` else `1>`, then `2>`, then `>>` else `1>>`, then `2>>`. Only the first
/// occurrence of each operator is considered. On return `words` contains no
/// operators or target filenames.
pub fn extract(words: &mut Vec<String>) -> Result<RedirectSpec, RedirectError> {
    let mut spec = RedirectSpec::default();
    if !take_operator(words, ">", false, &mut spec.stdout)? {
        take_operator(words, "1>", false, &mut spec.stdout)?;
    }
    take_operator(words, "2>", false, &mut spec.stderr)?;
    if !take_operator(words, ">>", true, &mut spec.stdout)? {
        take_operator(words, "1>>", true, &mut spec.stdout)?;
    }
    take_operator(words, "2>>", true, &mut spec.stderr)?;
    Ok(spec)
}

fn take_operator(
    words: &mut Vec<String>,
    op: &str,
    append: bool,
    slot: &mut Option<Target>,
) -> Result<bool, RedirectError> {
    let Some(i) = words.iter().position(|w| w == op) else {
        return Ok(false);
    };
    if i + 1 >= words.len() {
        return Err(RedirectError::MissingTarget(op.to_string()));
    }
    let path = words.remove(i + 1);
    words.remove(i);
    *slot = Some(Target { path, append });
    Ok(true)
}

/// Open the streams a command will write to.
///
/// Channels without a redirection target fall back to the provided defaults.
/// Target files are created when missing; truncate mode discards existing
/// content, append mode writes from the end. The returned handles are dropped
/// (and the files closed) when the command finishes, on every exit path.
pub fn open(
    spec: &RedirectSpec,
    default_out: Box<dyn Stdout>,
    default_err: Box<dyn Stdout>,
) -> Result<(Box<dyn Stdout>, Box<dyn Stdout>)> {
    let out = match &spec.stdout {
        Some(target) => Box::new(open_target(target)?) as Box<dyn Stdout>,
        None => default_out,
    };
    let err = match &spec.stderr {
        Some(target) => Box::new(open_target(target)?) as Box<dyn Stdout>,
        None => default_err,
    };
    Ok((out, err))
}

fn open_target(target: &Target) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).write(true);
    if target.append {
        opts.append(true);
    } else {
        opts.truncate(true);
    }
    opts.open(&target.path)
        .with_context(|| format!("cannot open {}", target.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_operators_leaves_words_untouched() {
        let mut w = words(&["echo", "hi", "there"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(spec, RedirectSpec::default());
        assert_eq!(w, words(&["echo", "hi", "there"]));
    }

    #[test]
    fn plain_output_truncates() {
        let mut w = words(&["echo", "hi", ">", "out.txt"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(
            spec.stdout,
            Some(Target {
                path: "out.txt".to_string(),
                append: false
            })
        );
        assert_eq!(spec.stderr, None);
        assert_eq!(w, words(&["echo", "hi"]));
    }

    #[test]
    fn fd_one_alias_is_equivalent() {
        let mut w = words(&["echo", "hi", "1>", "out.txt"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(
            spec.stdout,
            Some(Target {
                path: "out.txt".to_string(),
                append: false
            })
        );
        assert_eq!(w, words(&["echo", "hi"]));
    }

    #[test]
    fn stderr_and_stdout_both_fire() {
        let mut w = words(&["cmd", ">", "out.txt", "2>", "err.txt"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(spec.stdout.unwrap().path, "out.txt");
        assert_eq!(spec.stderr.unwrap().path, "err.txt");
        assert_eq!(w, words(&["cmd"]));
    }

    #[test]
    fn append_operators_set_append_mode() {
        let mut w = words(&["cmd", ">>", "out.log", "2>>", "err.log"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(
            spec.stdout,
            Some(Target {
                path: "out.log".to_string(),
                append: true
            })
        );
        assert_eq!(
            spec.stderr,
            Some(Target {
                path: "err.log".to_string(),
                append: true
            })
        );
        assert_eq!(w, words(&["cmd"]));
    }

    #[test]
    fn append_overrides_truncate_on_same_line() {
        let mut w = words(&["cmd", ">", "a.txt", ">>", "b.txt"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(
            spec.stdout,
            Some(Target {
                path: "b.txt".to_string(),
                append: true
            })
        );
        assert_eq!(w, words(&["cmd"]));
    }

    #[test]
    fn trailing_operator_is_an_error() {
        let mut w = words(&["echo", "hi", ">"]);
        assert_eq!(
            extract(&mut w),
            Err(RedirectError::MissingTarget(">".to_string()))
        );
    }

    #[test]
    fn only_first_occurrence_is_consulted() {
        let mut w = words(&["cmd", ">", "a.txt", ">", "b.txt"]);
        let spec = extract(&mut w).unwrap();
        assert_eq!(spec.stdout.unwrap().path, "a.txt");
        // the second `>` and its filename stay behind as ordinary words
        assert_eq!(w, words(&["cmd", ">", "b.txt"]));
    }
}
