use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Most results kept for one book query.
pub const MAX_RESULTS: usize = 10;

/// Anchors the search engine uses for result links.
const RESULT_LINK_SELECTOR: &str = "a.result__url";

/// Substring an href must contain (case-insensitive) to be kept.
const PDF_HINT: &str = "pdf";

/// One result link for a book query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Pulls PDF-looking result links out of a search response page.
///
/// Results keep document order and are cut off after `limit` entries.
/// Relative hrefs are resolved against `base` when one is given.
pub fn extract_results(html: &str, base: Option<&Url>, limit: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(RESULT_LINK_SELECTOR) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    let mut anchors = 0;

    for element in document.select(&selector) {
        if results.len() >= limit {
            break;
        }
        anchors += 1;
        let Some(href) = element.value().attr("href") else {
            debug!("Skipping result anchor without href");
            continue;
        };

        if !href.to_lowercase().contains(PDF_HINT) {
            continue;
        }

        let title = element.text().collect::<String>().trim().to_string();
        results.push(SearchResult::new(title, resolve_href(base, href)));
    }

    debug!("Kept {} of {} scanned result links", results.len(), anchors);
    results
}

fn resolve_href(base: Option<&Url>, href: &str) -> String {
    match base.map(|base| base.join(href)) {
        Some(Ok(url)) => url.to_string(),
        _ => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_anchor(text: &str, href: &str) -> String {
        format!(r#"<div class="result"><a class="result__url" href="{href}">{text}</a></div>"#)
    }

    fn page(anchors: &[String]) -> String {
        format!("<html><body>{}</body></html>", anchors.join("\n"))
    }

    #[test]
    fn keeps_only_pdf_links_in_document_order() {
        let html = page(&[
            result_anchor(" Sapiens PDF ", "https://a.example/sapiens.pdf"),
            result_anchor("Sapiens review", "https://b.example/review.html"),
            result_anchor("Mirror", "https://c.example/get?file=Sapiens.PDF"),
        ]);

        let results = extract_results(&html, None, MAX_RESULTS);

        assert_eq!(
            results,
            vec![
                SearchResult::new("Sapiens PDF", "https://a.example/sapiens.pdf"),
                SearchResult::new("Mirror", "https://c.example/get?file=Sapiens.PDF"),
            ]
        );
    }

    #[test]
    fn truncates_to_limit() {
        let anchors: Vec<String> = (0..25)
            .map(|i| result_anchor(&format!("Book {i}"), &format!("https://x.example/{i}.pdf")))
            .collect();

        let results = extract_results(&page(&anchors), None, MAX_RESULTS);

        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0].title, "Book 0");
        assert_eq!(results[9].title, "Book 9");
        assert!(results.iter().all(|r| r.url.to_lowercase().contains("pdf")));
    }

    #[test]
    fn ignores_anchors_without_result_class_or_href() {
        let html = r#"
            <a href="https://x.example/other.pdf">Not a result</a>
            <a class="result__url">No href pdf</a>
            <a class="result__a result__url" href="https://x.example/kept.pdf">Kept</a>
        "#;

        let results = extract_results(html, None, MAX_RESULTS);

        assert_eq!(results, vec![SearchResult::new("Kept", "https://x.example/kept.pdf")]);
    }

    #[test]
    fn duplicates_are_kept() {
        let html = page(&[
            result_anchor("Same", "https://x.example/same.pdf"),
            result_anchor("Same", "https://x.example/same.pdf"),
        ]);
        assert_eq!(extract_results(&html, None, MAX_RESULTS).len(), 2);
    }

    #[test]
    fn relative_hrefs_resolve_against_base() {
        let base = Url::parse("https://html.duckduckgo.com/html/").unwrap();
        let html = page(&[result_anchor(
            "Redirect",
            "//duckduckgo.com/l/?uddg=https%3A%2F%2Fx.example%2Fbook.pdf",
        )]);

        let results = extract_results(&html, Some(&base), MAX_RESULTS);

        assert_eq!(
            results[0].url,
            "https://duckduckgo.com/l/?uddg=https%3A%2F%2Fx.example%2Fbook.pdf"
        );
    }

    #[test]
    fn empty_page_has_no_results() {
        assert!(extract_results("<html></html>", None, MAX_RESULTS).is_empty());
    }
}
