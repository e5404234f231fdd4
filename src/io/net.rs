use crate::error::Result;
use reqwest::blocking::Client;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::Path,
    time::Duration,
};
use tracing::debug;

pub fn http_client() -> Result<Client> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// GETs `url` and stores the body at `dest`.
pub fn download_to(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let mut resp = client.get(url).send()?.error_for_status()?;
    debug!(
        "GET {url}: {} bytes announced",
        resp.content_length().unwrap_or(0)
    );

    let written = save_stream(&mut resp, dest)?;
    debug!("Stored {written} bytes at {}", dest.display());
    Ok(written)
}

/// Copies `src` into `<dest>.part` and renames it over `dest` once complete.
/// A failed copy removes the partial file and leaves `dest` untouched.
pub fn save_stream<R: Read>(src: &mut R, dest: &Path) -> Result<u64> {
    let part = dest.with_extension("part");

    let copied = File::create(&part).and_then(|file| {
        let mut out = BufWriter::new(file);
        let n = io::copy(src, &mut out)?;
        out.flush()?;
        Ok(n)
    });

    match copied {
        Ok(n) => {
            fs::rename(&part, dest)?;
            Ok(n)
        }
        Err(e) => {
            let _ = fs::remove_file(&part);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Yields some bytes, then fails like a dropped connection.
    struct Interrupted {
        sent: bool,
    }

    impl Read for Interrupted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"));
            }
            self.sent = true;
            let chunk = b"partial body";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn interrupted_stream_leaves_no_part_file() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("downloaded_video.mp4");
        fs::write(&dest, b"earlier run").unwrap();

        let err = save_stream(&mut Interrupted { sent: false }, &dest).unwrap_err();

        assert!(err.to_string().contains("reset by peer"));
        assert!(!dest.with_extension("part").exists());
        assert_eq!(fs::read(&dest).unwrap(), b"earlier run");
    }

    #[test]
    fn completed_stream_replaces_existing_file() {
        let tmp = tempdir().unwrap();
        let dest = tmp.path().join("downloaded_video.mp4");
        fs::write(&dest, b"earlier run").unwrap();

        let n = save_stream(&mut &b"fresh media"[..], &dest).unwrap();

        assert_eq!(n, 11);
        assert_eq!(fs::read(&dest).unwrap(), b"fresh media");
        assert!(!dest.with_extension("part").exists());
    }
}
