use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::downloader::{book_folder, sanitize_title};
use crate::error::ReportError;
use crate::extract::SearchResult;

/// `<book_name>_results.txt`, with path separators in the name replaced.
pub fn report_file_name(book_name: &str) -> String {
    format!("{}_results.txt", sanitize_title(book_name))
}

/// Renders results as numbered blocks, starting at 1.
pub fn render_results(results: &[SearchResult]) -> String {
    let mut out = String::new();
    for (idx, result) in results.iter().enumerate() {
        let _ = write!(out, "{}. {}\n   Link: {}\n\n", idx + 1, result.title, result.url);
    }
    out
}

/// Writes every result, checked or not, to
/// `<out_dir>/<book_name>/<book_name>_results.txt`, replacing any earlier report.
pub async fn save_results(
    out_dir: &Path,
    book_name: &str,
    results: &[SearchResult],
) -> Result<PathBuf, ReportError> {
    let folder = book_folder(out_dir, book_name);
    fs::create_dir_all(&folder)
        .await
        .map_err(|source| ReportError {
            path: folder.clone(),
            source,
        })?;

    let path = folder.join(report_file_name(book_name));
    fs::write(&path, render_results(results))
        .await
        .map_err(|source| ReportError {
            path: path.clone(),
            source,
        })?;

    info!("Saved {} result(s) to {}", results.len(), path.display());
    Ok(path)
}
