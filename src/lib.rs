//! # bookfinder
//!
//! A CLI utility that searches the web for PDF copies of books, lets you
//! tick the matches you want, and downloads them into one folder per book.
//!
//! ## Features
//!
//! - `"<book> filetype:pdf"` searches against an HTML search endpoint
//! - Up to ten PDF result links per book, in search order
//! - Checklist selection, sequential streaming downloads
//! - Plain-text report of every result found for a book
//!
//! ## Usage
//!
//! ```bash
//! bookfinder search "Sapiens, Dune" --topic history
//! bookfinder search Sapiens --select 2 --save --no-prompt
//! ```

mod checklist;
mod config;
mod downloader;
mod error;
mod extract;
mod query;
mod report;
mod search;
mod session;
mod topic;

pub use checklist::{parse_selection, ResultSet, SelectionError};
pub use config::{Config, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
pub use downloader::{book_folder, sanitize_title, DownloadOutcome, DownloadReport, Downloader};
pub use error::{ConfigError, DownloadError, ReportError, SearchError};
pub use extract::{extract_results, SearchResult, MAX_RESULTS};
pub use query::{book_requests, build_query, parse_book_names, BookRequest, FILETYPE_FILTER};
pub use report::{render_results, report_file_name, save_results};
pub use search::{build_http_client, SearchClient};
pub use session::{BookSearch, SearchOutcome, Session};
pub use topic::Topic;
