//! Fetch stage: URL to a media file at a fixed path.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    config::ToolCommand,
    error::{Result, StemsError},
    io::{net, process::run_tool},
};

/// yt-dlp format selector. Prefers AAC in an MP4 container so the fixed
/// `.mp4` file name matches what is on disk.
pub const YT_DLP_FORMAT: &str = "bestaudio[ext=m4a]/bestaudio/best";

pub trait Downloader {
    /// Writes the media behind `url` to `dest`, overwriting it.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Downloads through the `yt-dlp` command-line tool.
pub struct YtDlp {
    command: ToolCommand,
}

impl YtDlp {
    pub fn new(command: ToolCommand) -> Self {
        Self { command }
    }
}

impl Downloader for YtDlp {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let args: [OsString; 7] = [
            "--no-playlist".into(),
            "--force-overwrites".into(),
            "-f".into(),
            YT_DLP_FORMAT.into(),
            "-o".into(),
            dest.as_os_str().to_owned(),
            url.into(),
        ];
        run_tool(&self.command, args)?;
        Ok(())
    }
}

/// Plain HTTP GET, for URLs that point straight at a media file.
pub struct HttpDownload;

impl Downloader for HttpDownload {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let client = net::http_client()?;
        net::download_to(&client, url, dest)?;
        Ok(())
    }
}

/// Runs the downloader and checks that it left a non-empty file at `dest`.
pub fn fetch(downloader: &dyn Downloader, url: &str, dest: &Path) -> Result<PathBuf> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    info!("Starting video download...");
    downloader.download(url, dest)?;

    match fs::metadata(dest) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        _ => return Err(StemsError::MissingOutput(dest.to_path_buf())),
    }

    info!("Video successfully downloaded as '{}'", dest.display());
    Ok(dest.to_path_buf())
}
