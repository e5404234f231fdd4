use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::debug;
use yt_stems::{
    config::{DEFAULT_LOG_FILE, DEFAULT_STEMS_ROOT, DEFAULT_WORK_ROOT},
    logging::{self, LogSettings},
    DemucsSettings, DownloaderKind, EncoderKind, Pipeline, PipelineConfig, ToolCommand,
};

#[derive(Parser)]
#[command(name = "yt-stems")]
#[command(about = "Download a video's audio and split it into stems with Demucs", long_about = None)]
#[command(version)]
struct Cli {
    /// Video URL. Prompted for on stdin when omitted.
    url: Option<String>,

    /// Parent of the per-video working directories
    #[arg(long, env = "YT_STEMS_WORK_DIR", default_value = DEFAULT_WORK_ROOT)]
    work_dir: PathBuf,

    /// Parent of the per-video stem directories
    #[arg(long, env = "YT_STEMS_STEMS_DIR", default_value = DEFAULT_STEMS_ROOT)]
    stems_dir: PathBuf,

    #[arg(long, env = "YT_STEMS_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value_t = DownloaderArg::YtDlp)]
    downloader: DownloaderArg,

    #[arg(long, env = "YT_STEMS_YT_DLP", default_value = "yt-dlp", value_parser = parse_tool)]
    yt_dlp_cmd: ToolCommand,

    #[arg(long, value_enum, default_value_t = EncoderArg::Ffmpeg)]
    encoder: EncoderArg,

    #[arg(long, env = "YT_STEMS_FFMPEG", default_value = "ffmpeg", value_parser = parse_tool)]
    ffmpeg_cmd: ToolCommand,

    /// Demucs command line, e.g. "python3 -m demucs"
    #[arg(long, env = "YT_STEMS_DEMUCS", default_value = "demucs", value_parser = parse_tool)]
    demucs_cmd: ToolCommand,

    /// Demucs model name (-n)
    #[arg(long)]
    model: Option<String>,

    /// Only split into <STEM> and everything else
    #[arg(long, value_name = "STEM")]
    two_stems: Option<String>,

    /// More output (-v for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Warnings and errors only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DownloaderArg {
    YtDlp,
    Http,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncoderArg {
    Ffmpeg,
    Native,
}

impl Cli {
    fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::WARN;
        }
        match self.verbose {
            0 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            work_root: self.work_dir.clone(),
            stems_root: self.stems_dir.clone(),
            downloader: match self.downloader {
                DownloaderArg::YtDlp => DownloaderKind::YtDlp {
                    command: self.yt_dlp_cmd.clone(),
                },
                DownloaderArg::Http => DownloaderKind::Http,
            },
            encoder: match self.encoder {
                EncoderArg::Ffmpeg => EncoderKind::Ffmpeg {
                    command: self.ffmpeg_cmd.clone(),
                },
                EncoderArg::Native => EncoderKind::NativeWav,
            },
            demucs: DemucsSettings {
                command: self.demucs_cmd.clone(),
                model: self.model.clone(),
                two_stems: self.two_stems.clone(),
            },
        }
    }
}

fn parse_tool(s: &str) -> Result<ToolCommand, String> {
    ToolCommand::parse(s).ok_or_else(|| "command must not be empty".to_string())
}

fn prompt_url() -> anyhow::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter the YouTube video URL: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogSettings {
        file: cli.log_file.clone(),
        level: cli.log_level(),
    })?;

    let url = match &cli.url {
        Some(url) => url.clone(),
        None => prompt_url()?,
    };

    let report = Pipeline::from_config(&cli.pipeline_config()).run(&url);
    match &report.failure {
        Some(failure) => debug!(
            "Run for {} aborted in the {} stage after reaching {:?}",
            report.video_id, failure.stage, report.reached
        ),
        None => debug!("Run for {} finished", report.video_id),
    }

    // Stage failures are logged and absorbed; the exit status stays 0.
    Ok(())
}
