//! Transcode stage: media file to a standalone audio file.

use std::{
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    config::ToolCommand,
    core::audio::decode_to_wav,
    error::{Result, StemsError},
    io::process::run_tool,
};

pub trait AudioEncoder {
    /// Extension of the files this encoder writes.
    fn extension(&self) -> &'static str;

    /// Extracts the audio of `media` into `dest`. Must not touch `media`.
    fn encode(&self, media: &Path, dest: &Path) -> Result<()>;
}

/// MP3 through the `ffmpeg` command-line tool, default encoder settings.
pub struct Ffmpeg {
    command: ToolCommand,
}

impl Ffmpeg {
    pub fn new(command: ToolCommand) -> Self {
        Self { command }
    }
}

impl AudioEncoder for Ffmpeg {
    fn extension(&self) -> &'static str {
        "mp3"
    }

    fn encode(&self, media: &Path, dest: &Path) -> Result<()> {
        let args: [OsString; 10] = [
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            "-i".into(),
            media.as_os_str().to_owned(),
            "-vn".into(),
            "-c:a".into(),
            "libmp3lame".into(),
            dest.as_os_str().to_owned(),
        ];
        run_tool(&self.command, args)?;
        Ok(())
    }
}

/// In-process decode to PCM WAV; needs no external binary.
pub struct NativeWav;

impl AudioEncoder for NativeWav {
    fn extension(&self) -> &'static str {
        "wav"
    }

    fn encode(&self, media: &Path, dest: &Path) -> Result<()> {
        decode_to_wav(media, dest)?;
        Ok(())
    }
}

/// Encodes `media` into `dest`, then deletes `media`.
///
/// The media file is only removed once the audio file exists; on any
/// encoding failure it stays where it is.
pub fn transcode(encoder: &dyn AudioEncoder, media: &Path, dest: &Path) -> Result<PathBuf> {
    info!("Starting audio extraction for {}...", media.display());

    // A leftover from an earlier run must not pass for fresh output.
    remove_if_present(dest)?;

    if let Err(e) = encoder.encode(media, dest) {
        // Whatever the encoder managed to write is truncated.
        remove_if_present(dest)?;
        return Err(e);
    }

    if !dest.is_file() {
        return Err(StemsError::MissingOutput(dest.to_path_buf()));
    }
    info!("Audio file saved as '{}'", dest.display());

    fs::remove_file(media)?;
    info!("Deleted temporary video file '{}'", media.display());

    Ok(dest.to_path_buf())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
