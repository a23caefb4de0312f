use std::path::PathBuf;

use tracing::warn;

use crate::checklist::ResultSet;
use crate::config::Config;
use crate::downloader::{DownloadReport, Downloader};
use crate::error::{ConfigError, ReportError, SearchError};
use crate::query::{book_requests, BookRequest};
use crate::report;
use crate::search::{build_http_client, SearchClient};
use crate::Topic;

/// What a search produced for one book.
#[derive(Debug)]
pub enum SearchOutcome {
    Found(ResultSet),
    NoResults,
    /// The request failed. Shown to the user, then handled like `NoResults`.
    Failed(SearchError),
}

impl SearchOutcome {
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            SearchOutcome::Found(set) => Some(set),
            _ => None,
        }
    }
}

/// One book name and its search outcome.
#[derive(Debug)]
pub struct BookSearch {
    pub request: BookRequest,
    pub outcome: SearchOutcome,
}

/// Everything the search, present, and download steps share.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    search: SearchClient,
    downloader: Downloader,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let client = build_http_client(&config)?;
        let search = SearchClient::new(client.clone(), &config)?;
        let downloader = Downloader::new(client, config.output_dir.clone());
        Ok(Self {
            config,
            search,
            downloader,
        })
    }

    /// Searches one book and wraps its results in a fresh checklist.
    pub async fn search_book(&self, request: &BookRequest) -> SearchOutcome {
        match self.search.search(request).await {
            Ok(results) if results.is_empty() => SearchOutcome::NoResults,
            Ok(results) => SearchOutcome::Found(ResultSet::new(&request.book_name, results)),
            Err(e) => {
                warn!("Search failed for \"{}\": {}", request.book_name, e);
                SearchOutcome::Failed(e)
            }
        }
    }

    /// Searches every name in a comma-separated list, in order.
    pub async fn search_books(&self, topic: Topic, input: &str) -> Vec<BookSearch> {
        let mut searches = Vec::new();
        for request in book_requests(topic, input) {
            let outcome = self.search_book(&request).await;
            searches.push(BookSearch { request, outcome });
        }
        searches
    }

    /// Downloads the checked entries only.
    pub async fn download_selected(&self, set: &ResultSet) -> DownloadReport {
        self.downloader.download_selected(set).await
    }

    /// Saves every entry of the set, whether checked or not.
    pub async fn save_results(&self, set: &ResultSet) -> Result<PathBuf, ReportError> {
        report::save_results(&self.config.output_dir, set.book_name(), set.results()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_for(server: &MockServer, out_dir: PathBuf) -> Session {
        Session::new(Config {
            endpoint: format!("{}/html/", server.uri()),
            output_dir: out_dir,
            ..Config::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn one_outcome_per_distinct_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("q=Dune"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="result__url" href="https://x.example/dune.pdf">dune</a>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("q=Nothing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("q=Broken"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let session = session_for(&server, temp_dir.path().to_path_buf());
        let searches = session
            .search_books(Topic::Fiction, "Dune, ,Nothing,Broken, Dune")
            .await;

        let names: Vec<_> = searches.iter().map(|s| s.request.book_name.as_str()).collect();
        assert_eq!(names, vec!["Dune", "Nothing", "Broken"]);
        assert_eq!(searches[0].outcome.result_set().unwrap().len(), 1);
        assert!(matches!(searches[1].outcome, SearchOutcome::NoResults));
        assert!(matches!(searches[2].outcome, SearchOutcome::Failed(_)));
        assert!(searches[2].outcome.result_set().is_none());
    }

    #[tokio::test]
    async fn empty_selection_runs_an_empty_batch() {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        let session = session_for(&server, temp_dir.path().to_path_buf());

        let mut set = ResultSet::new(
            "Ethics",
            vec![crate::SearchResult::new("One", format!("{}/1.pdf", server.uri()))],
        );
        set.apply_selection("none").unwrap();

        let report = session.download_selected(&set).await;

        assert!(report.is_empty());
        assert!(server.received_requests().await.unwrap().is_empty());
        assert!(!temp_dir.path().join("Ethics").exists());
    }

    #[test]
    fn unusable_timeout_fails_session_setup() {
        let result = Session::new(Config {
            timeout_secs: Some(f64::INFINITY),
            ..Config::default()
        });
        assert!(matches!(result, Err(ConfigError::Timeout(_))));
    }

    #[tokio::test]
    async fn save_writes_unchecked_entries_too() {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        let session = session_for(&server, temp_dir.path().to_path_buf());

        let set = ResultSet::new(
            "Ethics",
            vec![
                crate::SearchResult::new("One", "https://x.example/1.pdf"),
                crate::SearchResult::new("Two", "https://x.example/2.pdf"),
            ],
        );

        let path = session.save_results(&set).await.unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("1. One"));
        assert!(text.contains("2. Two"));
    }
}
