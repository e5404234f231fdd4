#![allow(dead_code)]

use std::{fs, path::Path};

use yt_stems::ToolCommand;

/// Saves `body` as a shell script and returns a command that runs it via `sh`,
/// standing in for an external tool.
pub fn sh_tool(dir: &Path, name: &str, body: &str) -> ToolCommand {
    let script = dir.join(name);
    fs::write(&script, body).unwrap();
    ToolCommand::new("sh").arg(script)
}

/// Reads the one-argument-per-line file written by a recording stub.
pub fn recorded_args(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
