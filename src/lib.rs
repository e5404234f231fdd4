//! # yt-stems
//!
//! Downloads a video's audio, extracts it to a standalone audio file and
//! hands it to Demucs, which writes the stems to `stems_/<video id>/`.
//! Each stage wraps an external collaborator behind a trait so the
//! pipeline can run against stand-ins.

pub mod config;
pub mod core;
pub mod error;
pub mod ident;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod types;

pub use crate::{
    config::{DemucsSettings, DownloaderKind, EncoderKind, PipelineConfig, ToolCommand},
    core::{
        fetch::{fetch, Downloader},
        separate::{separate, StemSeparator},
        transcode::{transcode, AudioEncoder},
    },
    error::{Result, StemsError},
    ident::{extract_video_id, UNKNOWN_VIDEO_ID},
    pipeline::Pipeline,
    types::{PipelineEvent, PipelineState, RunLayout, RunReport, Stage, StageFailure},
};
