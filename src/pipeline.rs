use std::path::PathBuf;

use tracing::{error, info, info_span};

use crate::{
    config::{DownloaderKind, EncoderKind, PipelineConfig},
    core::{
        fetch::{fetch, Downloader, HttpDownload, YtDlp},
        separate::{separate, Demucs, StemSeparator},
        transcode::{transcode, AudioEncoder, Ffmpeg, NativeWav},
    },
    error::StemsError,
    ident::extract_video_id,
    types::{PipelineEvent, PipelineState, RunLayout, RunReport, Stage, StageFailure},
};

/// Fetch, transcode, separate. The first failing stage stops the run.
pub struct Pipeline<'a> {
    work_root: PathBuf,
    stems_root: PathBuf,
    downloader: Box<dyn Downloader + 'a>,
    encoder: Box<dyn AudioEncoder + 'a>,
    separator: Box<dyn StemSeparator + 'a>,
    observer: Option<Box<dyn FnMut(&PipelineEvent) + 'a>>,
}

impl Pipeline<'static> {
    /// Wires up the real collaborators named in `cfg`.
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        let downloader: Box<dyn Downloader> = match &cfg.downloader {
            DownloaderKind::YtDlp { command } => Box::new(YtDlp::new(command.clone())),
            DownloaderKind::Http => Box::new(HttpDownload),
        };
        let encoder: Box<dyn AudioEncoder> = match &cfg.encoder {
            EncoderKind::Ffmpeg { command } => Box::new(Ffmpeg::new(command.clone())),
            EncoderKind::NativeWav => Box::new(NativeWav),
        };
        let separator = Box::new(Demucs::new(cfg.demucs.clone()));

        Self::new(
            cfg.work_root.clone(),
            cfg.stems_root.clone(),
            downloader,
            encoder,
            separator,
        )
    }
}

impl<'a> Pipeline<'a> {
    pub fn new(
        work_root: impl Into<PathBuf>,
        stems_root: impl Into<PathBuf>,
        downloader: Box<dyn Downloader + 'a>,
        encoder: Box<dyn AudioEncoder + 'a>,
        separator: Box<dyn StemSeparator + 'a>,
    ) -> Self {
        Self {
            work_root: work_root.into(),
            stems_root: stems_root.into(),
            downloader,
            encoder,
            separator,
            observer: None,
        }
    }

    /// Called for every state change and failure of subsequent runs.
    pub fn with_observer(mut self, observer: impl FnMut(&PipelineEvent) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Runs every stage for `url`. Never panics on stage failure; the
    /// outcome is in the returned report.
    pub fn run(&mut self, url: &str) -> RunReport {
        info!("========== Starting Process ==========");
        self.emit(PipelineEvent::Entered(PipelineState::Start));

        let video_id = extract_video_id(url);
        info!("Extracted video ID: {video_id}");

        let span = info_span!("run", video_id = %video_id);
        let _guard = span.enter();

        let layout = RunLayout::new(&self.work_root, &video_id, self.encoder.extension());
        let mut report = RunReport {
            video_id,
            reached: PipelineState::Start,
            layout,
            stem_dir: None,
            failure: None,
        };
        self.advance(&mut report, PipelineState::IdentifierExtracted);

        if let Err(failure) = self.run_stages(url, &mut report) {
            match failure.stage {
                Stage::Fetch => error!("Failed to download video: {}", failure.error),
                Stage::Transcode => error!("Error during audio conversion: {}", failure.error),
                Stage::Separate => error!("Error running Demucs: {}", failure.error),
            }
            self.emit(PipelineEvent::Failed {
                stage: failure.stage,
                message: failure.error.to_string(),
            });
            report.failure = Some(failure);
        }

        self.emit(PipelineEvent::Entered(report.terminal()));
        info!("========== Process Finished ==========");
        report
    }

    fn run_stages(
        &mut self,
        url: &str,
        report: &mut RunReport,
    ) -> std::result::Result<(), StageFailure> {
        let media = fetch(self.downloader.as_ref(), url, &report.layout.media_path)
            .map_err(failed_at(Stage::Fetch))?;
        info!("Video download completed successfully.");
        self.advance(report, PipelineState::Downloaded);

        let audio = transcode(self.encoder.as_ref(), &media, &report.layout.audio_path)
            .map_err(failed_at(Stage::Transcode))?;
        info!("Audio file '{}' is ready.", audio.display());
        self.advance(report, PipelineState::Transcoded);

        let stem_dir = separate(
            self.separator.as_ref(),
            &audio,
            &self.stems_root,
            &report.video_id,
        )
        .map_err(failed_at(Stage::Separate))?;
        report.stem_dir = Some(stem_dir);
        self.advance(report, PipelineState::Separated);

        Ok(())
    }

    fn advance(&mut self, report: &mut RunReport, state: PipelineState) {
        report.reached = state;
        self.emit(PipelineEvent::Entered(state));
    }

    fn emit(&mut self, event: PipelineEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}

fn failed_at(stage: Stage) -> impl FnOnce(StemsError) -> StageFailure {
    move |error| StageFailure { stage, error }
}
