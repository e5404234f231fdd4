//! Console plus log-file output for the binary.
//!
//! Nothing in the library installs a subscriber; `main` calls [`init`] once.

use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    field::RecordFields,
    filter::LevelFilter,
    fmt::{
        self,
        format::{DefaultFields, Writer},
        FormatFields,
    },
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::Result;

#[derive(Clone, Debug)]
pub struct LogSettings {
    /// Appended to, created if missing.
    pub file: PathBuf,
    /// Used when `RUST_LOG` is unset.
    pub level: tracing::Level,
}

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init(settings: &LogSettings) -> Result<WorkerGuard> {
    let (dir, name) = split_log_path(&settings.file)?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(settings.level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stdout().is_terminal()),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .fmt_fields(PlainFields::default())
                .with_writer(file_writer),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(guard)
}

/// Field formatter for the log file.
///
/// Span fields are cached per formatter type, so sharing `DefaultFields` with
/// the console layer would copy its colour codes into the file.
#[derive(Default)]
struct PlainFields(DefaultFields);

impl<'w> FormatFields<'w> for PlainFields {
    fn format_fields<R: RecordFields>(&self, writer: Writer<'w>, fields: R) -> std::fmt::Result {
        self.0.format_fields(writer, fields)
    }
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {:?}", path))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, PathBuf::from(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_logs_to_current_dir() {
        let (dir, name) = split_log_path(Path::new("process.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, Path::new("process.log"));
    }

    #[test]
    fn directory_without_file_name_is_rejected() {
        assert!(split_log_path(Path::new("/")).is_err());
    }
}
