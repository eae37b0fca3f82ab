//! Resumable HTTP downloader

use crate::error::{FetchError, FetchResult};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sv_core::FetchConfig;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Outcome of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Final location of the file
    pub path: PathBuf,

    /// Bytes received in this call
    pub bytes_written: u64,

    /// True if an earlier partial download was continued
    pub resumed: bool,
}

/// Partial-download path for a destination: `<dest>.part`
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// HTTP downloader
pub struct Fetcher {
    client: Client,
    resume: bool,
    progress: bool,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            resume: config.resume,
            progress: false,
        })
    }

    /// Show a byte progress bar on stderr while downloading
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Override the resume setting
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Download `url` to `dest`, replacing any existing file
    pub async fn fetch(&self, url: &str, dest: &Path) -> FetchResult<FetchReport> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await.map_err(|e| io_error(parent, e))?;
        }
        let part = part_path(dest);

        let existing = if self.resume {
            match fs::metadata(&part).await {
                Ok(meta) => meta.len(),
                Err(_) => 0,
            }
        } else {
            0
        };

        let mut request = self.client.get(url);
        if existing > 0 {
            log::debug!("Resuming {} from byte {}", url, existing);
            request = request.header(RANGE, format!("bytes={}-", existing));
        }
        let mut response = request.send().await.map_err(|e| request_error(url, e))?;
        let status = response.status();

        if status == StatusCode::RANGE_NOT_SATISFIABLE && existing > 0 {
            // The partial file already holds the whole body
            log::debug!("{}: server reports nothing past byte {}", url, existing);
            publish(&part, dest).await?;
            return Ok(FetchReport {
                path: dest.to_path_buf(),
                bytes_written: 0,
                resumed: true,
            });
        }
        if !status.is_success() {
            return Err(FetchError::TransferFailure {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let resumed = existing > 0
            && status == StatusCode::PARTIAL_CONTENT
            && response.headers().contains_key(CONTENT_RANGE);
        if existing > 0 && !resumed {
            log::debug!("{}: server ignored the range request, restarting", url);
        }

        let mut file = if resumed {
            OpenOptions::new()
                .append(true)
                .open(&part)
                .await
                .map_err(|e| io_error(&part, e))?
        } else {
            fs::File::create(&part)
                .await
                .map_err(|e| io_error(&part, e))?
        };

        let bar = self.progress_bar(
            response
                .content_length()
                .map(|len| len + if resumed { existing } else { 0 }),
        );
        if resumed {
            bar.set_position(existing);
        }

        let mut bytes_written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| request_error(url, e))? {
            file.write_all(&chunk)
                .await
                .map_err(|e| io_error(&part, e))?;
            bytes_written += chunk.len() as u64;
            bar.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(|e| io_error(&part, e))?;
        file.sync_all().await.map_err(|e| io_error(&part, e))?;
        drop(file);
        bar.finish_and_clear();

        publish(&part, dest).await?;
        log::debug!(
            "Downloaded {} bytes from {} to {}",
            bytes_written,
            url,
            dest.display()
        );
        Ok(FetchReport {
            path: dest.to_path_buf(),
            bytes_written,
            resumed,
        })
    }

    fn progress_bar(&self, total: Option<u64>) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}",
                        )
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        }
    }
}

async fn publish(part: &Path, dest: &Path) -> FetchResult<()> {
    fs::rename(part, dest).await.map_err(|e| io_error(dest, e))
}

fn io_error(path: &Path, source: std::io::Error) -> FetchError {
    FetchError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn request_error(url: &str, source: reqwest::Error) -> FetchError {
    FetchError::Request {
        url: url.to_string(),
        source,
    }
}
