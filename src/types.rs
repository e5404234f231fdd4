use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    config::{AUDIO_FILE_STEM, MEDIA_FILE_NAME},
    error::StemsError,
};

/// Where one run keeps its intermediate files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunLayout {
    pub work_dir: PathBuf,
    pub media_path: PathBuf,
    pub audio_path: PathBuf,
}

impl RunLayout {
    /// Runs for the same identifier get the same paths.
    pub fn new(work_root: &Path, video_id: &str, audio_ext: &str) -> Self {
        let work_dir = work_root.join(video_id);
        Self {
            media_path: work_dir.join(MEDIA_FILE_NAME),
            audio_path: work_dir.join(format!("{AUDIO_FILE_STEM}.{audio_ext}")),
            work_dir,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    IdentifierExtracted,
    Downloaded,
    Transcoded,
    Separated,
    Finished,
    Aborted,
}

/// The stages that can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Transcode,
    Separate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Fetch => "download",
            Stage::Transcode => "transcode",
            Stage::Separate => "separation",
        })
    }
}

#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: StemsError,
}

#[derive(Debug)]
pub struct RunReport {
    pub video_id: String,
    /// Last non-terminal state the run entered.
    pub reached: PipelineState,
    pub layout: RunLayout,
    pub stem_dir: Option<PathBuf>,
    pub failure: Option<StageFailure>,
}

impl RunReport {
    pub fn terminal(&self) -> PipelineState {
        if self.failure.is_some() {
            PipelineState::Aborted
        } else {
            PipelineState::Finished
        }
    }
}

/// Progress notifications handed to a pipeline observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    Entered(PipelineState),
    Failed { stage: Stage, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_keyed_by_identifier() {
        let layout = RunLayout::new(Path::new("work_"), "ABC123", "mp3");
        assert_eq!(layout.work_dir, Path::new("work_/ABC123"));
        assert_eq!(layout.media_path, Path::new("work_/ABC123/downloaded_video.mp4"));
        assert_eq!(layout.audio_path, Path::new("work_/ABC123/audio.mp3"));
    }
}
