//! Runtime configuration for a pipeline run.

use std::{ffi::OsString, path::PathBuf};

pub const DEFAULT_WORK_ROOT: &str = "work_";
pub const DEFAULT_STEMS_ROOT: &str = "stems_";
pub const DEFAULT_LOG_FILE: &str = "process.log";

/// Fixed name of the downloaded media file inside a run's working directory.
pub const MEDIA_FILE_NAME: &str = "downloaded_video.mp4";
/// Stem of the extracted audio file; the extension comes from the encoder.
pub const AUDIO_FILE_STEM: &str = "audio";

/// An external program plus the arguments that always precede the
/// per-invocation ones, e.g. `python3 -m demucs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Splits on whitespace. Returns `None` for a blank string.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            program: program.into(),
            args: parts.map(OsString::from).collect(),
        })
    }

    pub fn display_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloaderKind {
    YtDlp { command: ToolCommand },
    Http,
}

impl Default for DownloaderKind {
    fn default() -> Self {
        DownloaderKind::YtDlp {
            command: ToolCommand::new("yt-dlp"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncoderKind {
    Ffmpeg { command: ToolCommand },
    NativeWav,
}

impl Default for EncoderKind {
    fn default() -> Self {
        EncoderKind::Ffmpeg {
            command: ToolCommand::new("ffmpeg"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemucsSettings {
    pub command: ToolCommand,
    /// Passed as `-n <model>` when set.
    pub model: Option<String>,
    /// Passed as `--two-stems <stem>` when set.
    pub two_stems: Option<String>,
}

impl Default for DemucsSettings {
    fn default() -> Self {
        Self {
            command: ToolCommand::new("demucs"),
            model: None,
            two_stems: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Parent of the per-identifier working directories.
    pub work_root: PathBuf,
    /// Parent of the per-identifier stem directories.
    pub stems_root: PathBuf,
    pub downloader: DownloaderKind,
    pub encoder: EncoderKind,
    pub demucs: DemucsSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_root: DEFAULT_WORK_ROOT.into(),
            stems_root: DEFAULT_STEMS_ROOT.into(),
            downloader: DownloaderKind::default(),
            encoder: EncoderKind::default(),
            demucs: DemucsSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_leading_args() {
        let cmd = ToolCommand::parse("  python3 -m   demucs ").unwrap();
        assert_eq!(cmd.program, OsString::from("python3"));
        assert_eq!(cmd.args, vec![OsString::from("-m"), OsString::from("demucs")]);
        assert!(ToolCommand::parse("   ").is_none());
    }
}
