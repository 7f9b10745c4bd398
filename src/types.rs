//! Core data model: line views, match records, context, and per-file/search results.
//!
//! Match spans are UTF-8 byte offsets into `full_line` (see SPEC_FULL.md's
//! resolution of the source's UTF-16-vs-bytes open question).

use std::time::Duration;

/// A borrowed or owned line of text paired with its 1-based line number.
#[derive(Debug, Clone)]
pub struct LineView {
    pub line_number: u64,
    pub content: String,
}

/// A single match within a file.
///
/// `start == 0 && end == full_line.len()` is the convention for whole-line
/// records produced by invert-match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub file_name: String,
    pub line_number: u64,
    pub full_line: String,
    pub start: usize,
    pub end: usize,
}

impl MatchRecord {
    #[must_use]
    pub fn matched_text(&self) -> &str {
        &self.full_line[self.start..self.end]
    }
}

/// A context line attached to a match by the Context Window (F).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    pub file_name: String,
    pub line_number: u64,
    pub content: String,
}

/// A match with its surrounding before/after context.
#[derive(Debug, Clone)]
pub struct ContextualMatch {
    pub r#match: MatchRecord,
    pub before: Vec<ContextLine>,
    pub after: Vec<ContextLine>,
}

/// The accumulated outcome of searching one file (or standard input).
#[derive(Debug, Clone, Default)]
pub struct FileResult {
    pub file_name: String,
    pub matches: Vec<MatchRecord>,
    pub has_error: bool,
    pub error_message: Option<String>,
    pub contextual_matches: Option<Vec<ContextualMatch>>,
}

impl FileResult {
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn error(file_name: String, message: String) -> Self {
        Self {
            file_name,
            matches: Vec::new(),
            has_error: true,
            error_message: Some(message),
            contextual_matches: None,
        }
    }
}

/// The aggregated outcome of a full engine run.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub file_results: Vec<FileResult>,
    pub elapsed: Duration,
}

impl SearchResult {
    #[must_use]
    pub fn total_matches(&self) -> usize {
        self.file_results
            .iter()
            .filter(|fr| !fr.has_error)
            .map(FileResult::total_matches)
            .sum()
    }

    #[must_use]
    pub fn total_files(&self) -> usize {
        self.file_results.len()
    }

    #[must_use]
    pub fn any_errors(&self) -> bool {
        self.file_results.iter().any(|fr| fr.has_error)
    }
}
