use std::path::{Component, Path, PathBuf};

use colored::*;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::checklist::ResultSet;
use crate::error::DownloadError;
use crate::extract::SearchResult;

/// Name used when a title is empty after sanitizing.
const FALLBACK_TITLE: &str = "untitled";

/// Outcome of one item in a download batch.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub title: String,
    pub result: Result<PathBuf, DownloadError>,
}

/// Per-item outcomes of one "download selected" batch, in list order.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    pub fn saved(&self) -> impl Iterator<Item = &PathBuf> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &DownloadError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.title.as_str(), e)))
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Streams result links into one folder per book.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    out_dir: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            out_dir: out_dir.into(),
        }
    }

    /// Folder holding everything written for `book_name`.
    pub fn book_dir(&self, book_name: &str) -> PathBuf {
        book_folder(&self.out_dir, book_name)
    }

    /// Where `title` is written for `book_name`.
    pub fn target_path(&self, book_name: &str, title: &str) -> PathBuf {
        self.book_dir(book_name)
            .join(format!("{}.pdf", sanitize_title(title)))
    }

    /// Downloads one result into `<out_dir>/<book_name>/<title>.pdf`.
    ///
    /// A failure part way through the body leaves the partial file on disk.
    #[instrument(skip(self, result), fields(url = %result.url))]
    pub async fn download(
        &self,
        result: &SearchResult,
        book_name: &str,
    ) -> Result<PathBuf, DownloadError> {
        let url = result.url.as_str();
        let path = self.target_path(book_name, &result.title);
        info!("Downloading \"{}\" into \"{}\"", url.green(), path.display().to_string().blue());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let folder = self.book_dir(book_name);
        fs::create_dir_all(&folder)
            .await
            .map_err(|e| DownloadError::io(&folder, e))?;

        let mut file = File::create(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::network(url, e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(&path, e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| DownloadError::io(&path, e))?;

        debug!("Wrote {} bytes to {}", written, path.display());
        Ok(path)
    }

    /// Downloads every checked entry of `set`, one after another.
    ///
    /// A failed item is recorded and the batch moves on to the next one.
    pub async fn download_selected(&self, set: &ResultSet) -> DownloadReport {
        let mut report = DownloadReport::default();

        for result in set.selected() {
            let outcome = self.download(result, set.book_name()).await;
            if let Err(e) = &outcome {
                warn!("Failed to download {}: {}", result.title, e);
            }
            report.outcomes.push(DownloadOutcome {
                title: result.title.clone(),
                result: outcome,
            });
        }

        info!(
            "Downloaded {} of {} selected for \"{}\"",
            report.saved().count(),
            report.outcomes.len(),
            set.book_name()
        );
        report
    }
}

/// `<out_dir>/<book_name>`, always inside `out_dir`.
///
/// Only plain name components of `book_name` are kept, so roots, drive
/// prefixes, `.` and `..` cannot move the folder elsewhere.
pub fn book_folder(out_dir: &Path, book_name: &str) -> PathBuf {
    let relative: PathBuf = Path::new(book_name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if relative.as_os_str().is_empty() {
        out_dir.join(FALLBACK_TITLE)
    } else {
        out_dir.join(relative)
    }
}

/// Replaces path separators in a title so it stays a single file name.
pub fn sanitize_title(title: &str) -> String {
    let sanitized = title.replace(['/', '\\'], "_");
    if sanitized.trim().is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        sanitized
    }
}
