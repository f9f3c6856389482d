//! A small interactive command-line shell.
//!
//! The crate implements the classic interpretation pipeline: a line of input
//! is split into words with shell quoting rules, redirection operators are
//! extracted from the word list, and the first remaining word is dispatched
//! either to one of five builtins (`echo`, `exit`, `type`, `pwd`, `cd`) or to
//! an executable discovered on the search path at startup. Known command
//! names are also offered through interactive tab completion.
//!
//! The main entry point is [`Interpreter`], which owns an [`Environment`]
//! snapshot and a [`PathIndex`] and drives the prompt loop. Everything runs
//! on a single thread; at most one child process exists at a time and is
//! always waited for before the next prompt.

mod builtin;
mod completer;
pub mod env;
mod external;
mod interpreter;
pub mod io_adapters;
mod lexer;
mod redirect;

pub use env::Environment;
pub use external::PathIndex;
pub use interpreter::Interpreter;
