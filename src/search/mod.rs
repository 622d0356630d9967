//! Read-only projections over the diary for listing and keyword search.
//!
//! Projections never touch storage: they take a `DiaryStore` snapshot and
//! return entries newest first, which is also the order used for export.

use crate::calendar::date_index;
use crate::diary::DiaryStore;
use crate::errors::InputError;
use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use std::ops::Range;
use tracing::debug;

/// A validated, non-blank search keyword.
///
/// Matching is literal and case-insensitive; characters such as `(`, `*` or `.`
/// only ever match themselves.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    term: String,
    matcher: Regex,
}

impl SearchTerm {
    /// Validates `raw` (surrounding whitespace is ignored) and builds its matcher.
    ///
    /// # Errors
    ///
    /// - `InputError::EmptySearchTerm` if `raw` is blank
    /// - `InputError::SearchTermTooLong` if the matcher exceeds the regex size limit
    ///
    /// ```
    /// use daybook::search::SearchTerm;
    ///
    /// assert!(SearchTerm::new("   ").is_err());
    /// assert_eq!(SearchTerm::new(" cat ").unwrap().as_str(), "cat");
    /// ```
    pub fn new(raw: &str) -> Result<Self, InputError> {
        let term = raw.trim();
        if term.is_empty() {
            return Err(InputError::EmptySearchTerm);
        }

        let matcher = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .map_err(|_| InputError::SearchTermTooLong(term.chars().count()))?;

        Ok(SearchTerm {
            term: term.to_string(),
            matcher,
        })
    }

    /// The keyword as entered, trimmed.
    pub fn as_str(&self) -> &str {
        &self.term
    }

    /// Byte ranges of every non-overlapping occurrence in `text`.
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.matcher.find_iter(text).map(|m| m.range()).collect()
    }
}

/// One entry of a projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedEntry {
    /// Date of the entry.
    pub date: NaiveDate,
    /// Entry text, unmodified.
    pub text: String,
    /// Byte ranges in `text` to highlight. Empty for plain listings.
    pub highlights: Vec<Range<usize>>,
}

impl ProjectedEntry {
    /// Storage key of the entry date.
    pub fn date_key(&self) -> String {
        date_index::format(self.date)
    }

    /// The text with every highlight wrapped in `open`/`close`.
    ///
    /// ```
    /// use daybook::search::{search, SearchTerm};
    /// use daybook::diary::DiaryStore;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let diary: DiaryStore = vec![(date, "Cat and cat".to_string())].into_iter().collect();
    /// let result = search(&diary, &SearchTerm::new("cat").unwrap());
    ///
    /// assert_eq!(result.entries[0].highlighted("[", "]"), "[Cat] and [cat]");
    /// ```
    pub fn highlighted(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for span in &self.highlights {
            out.push_str(&self.text[cursor..span.start]);
            out.push_str(open);
            out.push_str(&self.text[span.clone()]);
            out.push_str(close);
            cursor = span.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// Result of listing or searching: entries newest first plus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionResult {
    /// Entries in descending date order.
    pub entries: Vec<ProjectedEntry>,
    /// Number of entries in `entries`.
    pub total_count: usize,
    /// Total keyword occurrences across `entries`. Zero for plain listings.
    pub match_count: usize,
}

impl ProjectionResult {
    /// One-line statistics for display.
    pub fn summary(&self, term: Option<&SearchTerm>) -> String {
        match term {
            Some(term) => format!(
                "Search: found {} {}, \"{}\" appears {} {}.",
                self.total_count,
                plural(self.total_count, "entry", "entries"),
                term.as_str(),
                self.match_count,
                plural(self.match_count, "time", "times"),
            ),
            None => format!(
                "Total: {} {}.",
                self.total_count,
                plural(self.total_count, "entry", "entries")
            ),
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Every entry, newest first.
pub fn list_all(store: &DiaryStore) -> ProjectionResult {
    let entries: Vec<ProjectedEntry> = store
        .iter()
        .rev()
        .map(|(date, text)| ProjectedEntry {
            date,
            text: text.to_string(),
            highlights: Vec::new(),
        })
        .collect();

    ProjectionResult {
        total_count: entries.len(),
        match_count: 0,
        entries,
    }
}

/// Entries containing `term` (case-insensitive, literal), newest first, with
/// every occurrence highlighted and counted.
pub fn search(store: &DiaryStore, term: &SearchTerm) -> ProjectionResult {
    let entries: Vec<ProjectedEntry> = store
        .iter()
        .rev()
        .filter_map(|(date, text)| {
            let highlights = term.find_spans(text);
            (!highlights.is_empty()).then(|| ProjectedEntry {
                date,
                text: text.to_string(),
                highlights,
            })
        })
        .collect();

    let match_count = entries.iter().map(|entry| entry.highlights.len()).sum();
    debug!(
        matched_entries = entries.len(),
        match_count, "Search projection built"
    );

    ProjectionResult {
        total_count: entries.len(),
        match_count,
        entries,
    }
}

/// Plain-text export: one `date, text` line per entry, in result order.
pub fn export_plain_text(result: &ProjectionResult) -> String {
    result
        .entries
        .iter()
        .map(|entry| format!("{}, {}\n", entry.date_key(), entry.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn diary(entries: &[(&str, &str)]) -> DiaryStore {
        entries
            .iter()
            .map(|(key, text)| (date_index::parse_key(key).unwrap(), text.to_string()))
            .collect()
    }

    fn keys(result: &ProjectionResult) -> Vec<String> {
        result.entries.iter().map(ProjectedEntry::date_key).collect()
    }

    #[test]
    fn test_list_all_is_newest_first() {
        let store = diary(&[("2024-01-05", "a"), ("2024-03-01", "b"), ("2024-02-10", "c")]);

        let result = list_all(&store);

        assert_eq!(keys(&result), vec!["2024-03-01", "2024-02-10", "2024-01-05"]);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.match_count, 0);
        assert!(result.entries.iter().all(|e| e.highlights.is_empty()));
    }

    #[test]
    fn test_list_all_empty() {
        let result = list_all(&DiaryStore::new());
        assert_eq!(result, ProjectionResult::default());
        assert_eq!(result.summary(None), "Total: 0 entries.");
    }

    #[test]
    fn test_search_counts_every_occurrence() {
        let store = diary(&[("2024-01-01", "cat cat dog")]);

        let result = search(&store, &SearchTerm::new("cat").unwrap());

        assert_eq!(result.match_count, 2);
        assert_eq!(result.total_count, 1);
        assert_eq!(result.entries[0].date, date(2024, 1, 1));
        assert_eq!(result.entries[0].highlights, vec![0..3, 4..7]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = diary(&[("2024-01-01", "Hello")]);

        let result = search(&store, &SearchTerm::new("hello").unwrap());

        assert_eq!(result.total_count, 1);
        assert_eq!(result.match_count, 1);
        assert_eq!(result.entries[0].highlighted("<", ">"), "<Hello>");
    }

    #[test]
    fn test_search_filters_and_keeps_order() {
        let store = diary(&[
            ("2024-01-01", "rainy day, stayed in"),
            ("2024-02-01", "sunny"),
            ("2024-03-01", "Rain again. RAIN!"),
        ]);

        let result = search(&store, &SearchTerm::new("rain").unwrap());

        assert_eq!(keys(&result), vec!["2024-03-01", "2024-01-01"]);
        assert_eq!(result.total_count, 2);
        assert_eq!(result.match_count, 3);
        assert!(result.match_count >= result.total_count);
    }

    #[test]
    fn test_search_matches_metacharacters_literally() {
        let store = diary(&[
            ("2024-01-01", "costs (approx.) $5"),
            ("2024-01-02", "approx 5"),
        ]);

        let result = search(&store, &SearchTerm::new("(approx.)").unwrap());
        assert_eq!(keys(&result), vec!["2024-01-01"]);
        assert_eq!(result.match_count, 1);

        let result = search(&store, &SearchTerm::new(".*").unwrap());
        assert_eq!(result.total_count, 0);

        let result = search(&store, &SearchTerm::new("$5").unwrap());
        assert_eq!(result.match_count, 1);
    }

    #[test]
    fn test_search_matches_partial_words() {
        let store = diary(&[("2024-01-01", "concatenate the category")]);
        let result = search(&store, &SearchTerm::new("cat").unwrap());
        assert_eq!(result.match_count, 2);
    }

    #[test]
    fn test_search_no_matches() {
        let store = diary(&[("2024-01-01", "nothing here")]);
        let term = SearchTerm::new("zebra").unwrap();
        let result = search(&store, &term);

        assert!(result.entries.is_empty());
        assert_eq!(
            result.summary(Some(&term)),
            "Search: found 0 entries, \"zebra\" appears 0 times."
        );
    }

    #[test]
    fn test_search_term_rejects_blank() {
        assert!(matches!(SearchTerm::new(""), Err(InputError::EmptySearchTerm)));
        assert!(matches!(SearchTerm::new(" \t"), Err(InputError::EmptySearchTerm)));
    }

    #[test]
    fn test_highlight_spans_respect_multibyte_text() {
        let store = diary(&[("2024-01-01", "今天 Café café")]);
        let result = search(&store, &SearchTerm::new("CAFÉ").unwrap());

        assert_eq!(result.match_count, 2);
        assert_eq!(
            result.entries[0].highlighted("*", "*"),
            "今天 *Café* *café*"
        );
    }

    #[test]
    fn test_summary_wording() {
        let store = diary(&[("2024-01-01", "one cat")]);
        let term = SearchTerm::new("cat").unwrap();

        assert_eq!(list_all(&store).summary(None), "Total: 1 entry.");
        assert_eq!(
            search(&store, &term).summary(Some(&term)),
            "Search: found 1 entry, \"cat\" appears 1 time."
        );
    }

    #[test]
    fn test_export_plain_text_uses_raw_text_in_display_order() {
        let store = diary(&[("2024-01-05", "a cat"), ("2024-03-01", "b cat")]);
        let result = search(&store, &SearchTerm::new("cat").unwrap());

        assert_eq!(
            export_plain_text(&result),
            "2024-03-01, b cat\n2024-01-05, a cat\n"
        );
        assert_eq!(export_plain_text(&ProjectionResult::default()), "");
    }
}
