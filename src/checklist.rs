//! Checkable result list for one book.
//!
//! This is the state behind a results window: the results in source order
//! plus one checked flag each. Nothing is checked until the user says so.

use serde::Serialize;
use thiserror::Error;

use crate::extract::SearchResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{0}' is not a result number")]
    NotANumber(String),

    #[error("result {index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },

    #[error("'{0}' is not a valid range")]
    BadRange(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    book_name: String,
    results: Vec<SearchResult>,
    #[serde(skip)]
    checked: Vec<bool>,
}

impl ResultSet {
    pub fn new(book_name: impl Into<String>, results: Vec<SearchResult>) -> Self {
        let checked = vec![false; results.len()];
        Self {
            book_name: book_name.into(),
            results,
            checked,
        }
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn title(&self) -> String {
        format!("Results for {}", self.book_name)
    }

    /// Whether the zero-based entry is checked.
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Sets the zero-based entry. Out-of-range indices are ignored.
    pub fn set_checked(&mut self, index: usize, checked: bool) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = checked;
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(flag) = self.checked.get_mut(index) {
            *flag = !*flag;
        }
    }

    pub fn check_all(&mut self) {
        self.checked.iter_mut().for_each(|flag| *flag = true);
    }

    pub fn clear(&mut self) {
        self.checked.iter_mut().for_each(|flag| *flag = false);
    }

    /// Checked results in list order.
    pub fn selected(&self) -> impl Iterator<Item = &SearchResult> {
        self.results
            .iter()
            .zip(&self.checked)
            .filter_map(|(result, checked)| checked.then_some(result))
    }

    pub fn selected_count(&self) -> usize {
        self.checked.iter().filter(|checked| **checked).count()
    }

    /// Replaces the checked flags with a selection spec.
    pub fn apply_selection(&mut self, spec: &str) -> Result<(), SelectionError> {
        let indices = parse_selection(spec, self.len())?;
        self.clear();
        for index in indices {
            self.set_checked(index, true);
        }
        Ok(())
    }
}

/// Parses `all`, `none`, or comma-separated 1-based numbers and ranges
/// (`1,3-5`) into zero-based indices for a list of `len` entries.
pub fn parse_selection(spec: &str, len: usize) -> Result<Vec<usize>, SelectionError> {
    let spec = spec.trim();
    match spec.to_ascii_lowercase().as_str() {
        "all" | "a" => return Ok((0..len).collect()),
        "none" | "" => return Ok(Vec::new()),
        _ => {}
    }

    let mut indices = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_position(start.trim(), len)?;
                let end = parse_position(end.trim(), len)?;
                if start > end {
                    return Err(SelectionError::BadRange(part.to_string()));
                }
                indices.extend(start..=end);
            }
            None => indices.push(parse_position(part, len)?),
        }
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

fn parse_position(text: &str, len: usize) -> Result<usize, SelectionError> {
    let index: usize = text
        .parse()
        .map_err(|_| SelectionError::NotANumber(text.to_string()))?;
    if index == 0 || index > len {
        return Err(SelectionError::OutOfRange { index, len });
    }
    Ok(index - 1)
}
