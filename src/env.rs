use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: a snapshot of the environment variables visible to the shell
///   (`PATH` is read from here once at startup, `HOME` lazily by `cd`).
/// - `current_dir`: the working directory, kept in sync with the process-wide
///   one so `pwd` can answer without a syscall.
/// - `should_exit`: a flag the REPL loop checks to know when to terminate.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// Copies variables from `std::env::vars()` and initializes `current_dir`
    /// from `std::env::current_dir()`. The `should_exit` flag starts as `false`.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        for (k, v) in stdenv::vars() {
            vars.insert(k, v);
        }
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
