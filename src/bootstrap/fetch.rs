// src/bootstrap/fetch.rs

//! Fetching snapshot archives
//!
//! [`Fetcher`] is the seam between the install steps and the transport:
//! - `HttpFetcher`: blocking reqwest, streams the body to disk in 8 KiB chunks
//! - `LocalFetcher`: copies archives from a directory of pre-downloaded files
//!
//! Neither retries. Any failure ends the bootstrap run.

use crate::error::{Error, Result};
use crate::progress::ProgressTracker;
use reqwest::blocking::{Client, Response};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Connect timeout; the transfer itself is not time-limited
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Something that can place the archive behind a URL at a local path
pub trait Fetcher {
    /// Write the content behind `url` to `dest`, returning the bytes written
    fn fetch(&self, url: &str, dest: &Path, progress: &dyn ProgressTracker) -> Result<u64>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Last path segment of a URL
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Copy everything from `reader` into `file`, reporting progress per chunk
///
/// `total` is the announced size, if any; a short body is an error.
fn stream_to_file<R: Read>(
    reader: &mut R,
    file: &mut File,
    total: Option<u64>,
    progress: &dyn ProgressTracker,
    display_name: &str,
) -> Result<u64> {
    progress.set_length(total);
    match total {
        Some(_) => progress.set_message(display_name),
        None => progress.set_message(&format!("{} (unknown size)", display_name)),
    }

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("Failed to read {display_name}: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;
        progress.set_position(downloaded);
    }

    if let Some(total) = total
        && downloaded < total
    {
        return Err(Error::DownloadError(format!(
            "{display_name} ended after {downloaded} of {total} bytes"
        )));
    }

    Ok(downloaded)
}

fn create_file(dest: &Path) -> Result<File> {
    File::create(dest)
        .map_err(|e| Error::IoError(format!("Failed to create file {}: {e}", dest.display())))
}

/// Downloads over HTTP(S)
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None::<Duration>)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path, progress: &dyn ProgressTracker) -> Result<u64> {
        info!("Downloading {} to {}", url, dest.display());

        let mut response = self.get(url)?;
        let total = response.content_length();
        let mut file = create_file(dest)?;

        let downloaded = stream_to_file(
            &mut response,
            &mut file,
            total,
            progress,
            file_name_from_url(url),
        )?;

        file.sync_all()
            .map_err(|e| Error::IoError(format!("Failed to flush {}: {e}", dest.display())))?;

        info!("Downloaded {} bytes", downloaded);
        Ok(downloaded)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Serves archives from a local directory, looked up by the URL's file name
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    source_dir: PathBuf,
}

impl LocalFetcher {
    pub fn new(source_dir: impl AsRef<Path>) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
        }
    }

    /// Where the archive for `url` is expected
    pub fn source_path(&self, url: &str) -> PathBuf {
        self.source_dir.join(file_name_from_url(url))
    }
}

impl Fetcher for LocalFetcher {
    fn fetch(&self, url: &str, dest: &Path, progress: &dyn ProgressTracker) -> Result<u64> {
        let source = self.source_path(url);
        debug!("Copying {} to {}", source.display(), dest.display());

        let mut input = File::open(&source).map_err(|e| {
            Error::DownloadError(format!("Failed to open {}: {}", source.display(), e))
        })?;
        let total = input.metadata().ok().map(|m| m.len());
        let mut file = create_file(dest)?;

        stream_to_file(
            &mut input,
            &mut file,
            total,
            progress,
            file_name_from_url(url),
        )
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentProgress;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://example.com/a/metronotesd-db.latest.tar.gz"),
            "metronotesd-db.latest.tar.gz"
        );
        assert_eq!(file_name_from_url("plain"), "plain");
    }

    #[test]
    fn test_stream_reports_progress() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out");
        let mut file = File::create(&dest).unwrap();
        let data = vec![7u8; STREAM_BUFFER_SIZE * 2 + 5];
        let progress = SilentProgress::new();

        let n = stream_to_file(
            &mut Cursor::new(data.clone()),
            &mut file,
            Some(data.len() as u64),
            &progress,
            "test",
        )
        .unwrap();

        assert_eq!(n, data.len() as u64);
        assert_eq!(progress.position(), n);
        assert_eq!(progress.length(), Some(n));
        assert_eq!(std::fs::read(&dest).unwrap(), data);
    }

    #[test]
    fn test_stream_short_body_fails() {
        let temp = TempDir::new().unwrap();
        let mut file = File::create(temp.path().join("out")).unwrap();

        let result = stream_to_file(
            &mut Cursor::new(vec![0u8; 10]),
            &mut file,
            Some(100),
            &SilentProgress::new(),
            "test",
        );
        assert!(matches!(result, Err(Error::DownloadError(_))));
    }

    #[test]
    fn test_local_fetcher() {
        let temp = TempDir::new().unwrap();
        let source_dir = temp.path().join("mirror");
        std::fs::create_dir(&source_dir).unwrap();
        std::fs::write(source_dir.join("snap.tar.gz"), b"archive").unwrap();

        let fetcher = LocalFetcher::new(&source_dir);
        let dest = temp.path().join("download");
        let n = fetcher
            .fetch("https://host/x/snap.tar.gz", &dest, &SilentProgress::new())
            .unwrap();
        assert_eq!(n, 7);
        assert_eq!(std::fs::read(&dest).unwrap(), b"archive");

        let missing = fetcher.fetch("https://host/none.tar.gz", &dest, &SilentProgress::new());
        assert!(matches!(missing, Err(Error::DownloadError(_))));
    }
}
