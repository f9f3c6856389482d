use minish::{Environment, Interpreter, PathIndex};
use std::ffi::OsString;

fn main() {
    let env = Environment::new();
    let search: OsString = env.get_var("PATH").unwrap_or_default().into();
    let programs = PathIndex::scan(&search);

    let mut shell = Interpreter::new(env, programs);
    if let Err(e) = shell.repl() {
        eprintln!("minish: {e}");
        std::process::exit(1);
    }
}
