//! Commands implemented inside the shell process itself.
//!
//! The set is closed and never grows at runtime, so the dispatcher selects
//! builtins with a plain match over the first word instead of a handler
//! registry. Diagnostics go to the command's stdout stream, not stderr.

use crate::env::Environment;
use crate::external::PathIndex;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Names of all builtin commands, used by `type` and by completion.
pub const BUILTIN_NAMES: [&str; 5] = ["echo", "exit", "type", "pwd", "cd"];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Write the arguments joined by single spaces, plus a trailing newline.
pub fn echo(args: &[String], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", args.join(" "))?;
    Ok(())
}

/// Report whether `name` is a builtin, an indexed external program, or unknown.
pub fn type_of(name: &str, programs: &PathIndex, out: &mut dyn Write) -> Result<()> {
    if is_builtin(name) {
        writeln!(out, "{name} is a shell builtin")?;
    } else if let Some(path) = programs.resolve(name) {
        writeln!(out, "{name} is {}", path.display())?;
    } else {
        writeln!(out, "{name}: not found")?;
    }
    Ok(())
}

/// Print the current working directory.
pub fn pwd(env: &Environment, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", env.current_dir.display())?;
    Ok(())
}

/// Change the working directory, process-wide.
///
/// A `~` anywhere in the argument is replaced with `$HOME` (falling back to
/// `/root`); this is a literal substring replacement, not POSIX
/// tilde-expansion. When the target does not exist or the OS refuses the
/// change, the directory stays as it was and a diagnostic naming the original
/// argument is printed.
pub fn cd(arg: &str, env: &mut Environment, out: &mut dyn Write) -> Result<()> {
    let path = if arg.starts_with('~') {
        let home = env.get_var("HOME").unwrap_or_else(|| "/root".to_string());
        arg.replace('~', &home)
    } else {
        arg.to_string()
    };
    let target = Path::new(&path);
    if !target.exists() || std::env::set_current_dir(target).is_err() {
        writeln!(out, "cd: {arg}: No such file or directory")?;
        return Ok(());
    }
    env.current_dir = std::env::current_dir().unwrap_or_else(|_| target.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn captured(run: impl FnOnce(&mut dyn Write)) -> String {
        let mut buf = Vec::new();
        run(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn echo_joins_with_single_spaces() {
        let args = vec!["hello".to_string(), "world".to_string()];
        let out = captured(|w| echo(&args, w).unwrap());
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn echo_without_args_prints_bare_newline() {
        let out = captured(|w| echo(&[], w).unwrap());
        assert_eq!(out, "\n");
    }

    #[test]
    fn type_reports_builtins() {
        let programs = PathIndex::scan(OsStr::new(""));
        let out = captured(|w| type_of("cd", &programs, w).unwrap());
        assert_eq!(out, "cd is a shell builtin\n");
    }

    #[test]
    fn type_reports_unknown_names() {
        let programs = PathIndex::scan(OsStr::new(""));
        let out = captured(|w| type_of("doesnotexist123", &programs, w).unwrap());
        assert_eq!(out, "doesnotexist123: not found\n");
    }

    #[test]
    fn pwd_prints_tracked_directory() {
        let mut env = Environment::new();
        env.current_dir = "/somewhere/specific".into();
        let out = captured(|w| pwd(&env, w).unwrap());
        assert_eq!(out, "/somewhere/specific\n");
    }

    #[test]
    fn cd_to_missing_path_reports_and_keeps_directory() {
        let mut env = Environment::new();
        let before = env.current_dir.clone();
        let out = captured(|w| cd("/no/such/dir/anywhere", &mut env, w).unwrap());
        assert_eq!(out, "cd: /no/such/dir/anywhere: No such file or directory\n");
        assert_eq!(env.current_dir, before);
    }

    #[test]
    fn cd_to_existing_directory_updates_environment() {
        let dir = std::env::temp_dir().join(format!("builtin_cd_{}_ok", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create temp dir");

        let mut env = Environment::new();
        let before = env.current_dir.clone();
        let out = captured(|w| cd(dir.to_str().unwrap(), &mut env, w).unwrap());
        assert_eq!(out, "");
        assert_ne!(env.current_dir, before);

        // restore the process-wide directory for the other tests
        std::env::set_current_dir(&before).expect("restore cwd");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn cd_replaces_every_tilde_literally() {
        let mut env = Environment::new();
        env.vars.insert("HOME".to_string(), "/h".to_string());
        // both tildes are substituted, so the probed path is "/h/x//h" — gone
        let out = captured(|w| cd("~/x/~", &mut env, w).unwrap());
        assert_eq!(out, "cd: ~/x/~: No such file or directory\n");
    }
}
