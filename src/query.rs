use std::collections::HashSet;

use serde::Serialize;

use crate::Topic;

/// Filter appended to every book name so the engine only returns PDFs.
pub const FILETYPE_FILTER: &str = "filetype:pdf";

/// One book the user asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRequest {
    pub topic: Topic,
    pub book_name: String,
}

impl BookRequest {
    pub fn new(topic: Topic, book_name: impl Into<String>) -> Self {
        Self {
            topic,
            book_name: book_name.into(),
        }
    }

    pub fn query(&self) -> String {
        build_query(&self.book_name)
    }
}

/// `"<book_name> filetype:pdf"`
pub fn build_query(book_name: &str) -> String {
    format!("{} {}", book_name, FILETYPE_FILTER)
}

/// Splits the comma-separated input into book names.
///
/// Names are trimmed; empty and repeated names are dropped, keeping the
/// first occurrence in input order.
pub fn parse_book_names(input: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Builds one request per parsed book name, all sharing `topic`.
pub fn book_requests(topic: Topic, input: &str) -> Vec<BookRequest> {
    parse_book_names(input)
        .into_iter()
        .map(|name| BookRequest::new(topic, name))
        .collect()
}
