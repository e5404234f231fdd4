//! Runs external tools from an argument list, never through a shell.

use std::{
    ffi::OsString,
    process::{Command, Stdio},
};

use tracing::{debug, trace};

use crate::{
    config::ToolCommand,
    error::{Result, StemsError},
};

/// How many trailing stderr lines are kept in a `ToolFailed` error.
const STDERR_TAIL_LINES: usize = 20;

pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `tool` with `extra` appended to its fixed arguments and waits for it.
///
/// Output is captured. A non-zero exit becomes [`StemsError::ToolFailed`]
/// carrying the tail of stderr.
pub fn run_tool<I, S>(tool: &ToolCommand, extra: I) -> Result<ToolOutput>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let program = tool.display_name();
    let mut cmd = Command::new(&tool.program);
    cmd.args(&tool.args)
        .args(extra.into_iter().map(Into::into))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("Running {:?}", cmd);

    let output = cmd.output().map_err(|source| StemsError::Spawn {
        program: program.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    for line in stdout.lines() {
        trace!("[{program}] {line}");
    }

    if !output.status.success() {
        return Err(StemsError::ToolFailed {
            program,
            status: output.status,
            stderr: tail(&stderr, STDERR_TAIL_LINES),
        });
    }

    Ok(ToolOutput { stdout, stderr })
}

fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let sh = ToolCommand::new("sh").arg("-c").arg("echo hello");
        let out = run_tool(&sh, Vec::<OsString>::new()).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn arguments_are_not_shell_interpreted() {
        let sh = ToolCommand::new("sh").arg("-c").arg("printf '%s' \"$1\"").arg("sh");
        let out = run_tool(&sh, ["$(echo pwned); rm -rf x"]).unwrap();
        assert_eq!(out.stdout, "$(echo pwned); rm -rf x");
    }

    #[test]
    fn non_zero_exit_keeps_stderr_tail() {
        let sh = ToolCommand::new("sh")
            .arg("-c")
            .arg("for i in $(seq 1 30); do echo line$i >&2; done; exit 3");
        match run_tool(&sh, Vec::<OsString>::new()) {
            Err(StemsError::ToolFailed { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert!(stderr.starts_with("line11"));
                assert!(stderr.ends_with("line30"));
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let tool = ToolCommand::new("definitely-not-a-real-binary-4242");
        let err = run_tool(&tool, ["x"]).err().unwrap();
        assert!(matches!(err, StemsError::Spawn { .. }));
    }
}
