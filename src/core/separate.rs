//! Separation stage: audio file to a directory of stems.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{config::DemucsSettings, error::Result, io::process::run_tool};

pub trait StemSeparator {
    /// Splits `audio` into stems written somewhere under `out_dir`.
    fn separate(&self, audio: &Path, out_dir: &Path) -> Result<()>;
}

/// Runs Demucs. It decides the stem count, naming and format itself.
pub struct Demucs {
    settings: DemucsSettings,
}

impl Demucs {
    pub fn new(settings: DemucsSettings) -> Self {
        Self { settings }
    }

    fn args(&self, audio: &Path, out_dir: &Path) -> Vec<OsString> {
        let mut out_flag = OsString::from("--out=");
        out_flag.push(out_dir);

        let mut args = vec![out_flag];
        if let Some(model) = &self.settings.model {
            args.push("-n".into());
            args.push(model.into());
        }
        if let Some(stem) = &self.settings.two_stems {
            args.push("--two-stems".into());
            args.push(stem.into());
        }
        args.push(audio.as_os_str().to_owned());
        args
    }
}

impl StemSeparator for Demucs {
    fn separate(&self, audio: &Path, out_dir: &Path) -> Result<()> {
        run_tool(&self.settings.command, self.args(audio, out_dir))?;
        Ok(())
    }
}

/// Creates `<stems_root>/<video_id>` and runs the separator into it.
pub fn separate(
    separator: &dyn StemSeparator,
    audio: &Path,
    stems_root: &Path,
    video_id: &str,
) -> Result<PathBuf> {
    let out_dir = stems_root.join(video_id);
    fs::create_dir_all(&out_dir)?;

    info!("Starting Demucs separation for '{}'...", audio.display());
    info!("Stems will be stored in: {}/", out_dir.display());

    separator.separate(audio, &out_dir)?;

    info!(
        "Stems separation completed. Files saved in '{}/'.",
        out_dir.display()
    );
    Ok(out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolCommand;

    #[test]
    fn optional_flags_come_before_the_audio_path() {
        let demucs = Demucs::new(DemucsSettings {
            command: ToolCommand::new("demucs"),
            model: Some("htdemucs_ft".into()),
            two_stems: Some("vocals".into()),
        });
        let args = demucs.args(Path::new("w/audio.mp3"), Path::new("stems_/id"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "--out=stems_/id",
                "-n",
                "htdemucs_ft",
                "--two-stems",
                "vocals",
                "w/audio.mp3"
            ]
        );
    }
}
