//! Whole-word strategy: `\b<escaped-pattern>\b`, ignore-case aware.

use regex::{Regex, RegexBuilder};

use crate::regexcache::{self, PatternKind};
use crate::types::MatchRecord;

#[derive(Clone)]
pub struct WholeWordStrategy {
    regex: Option<Regex>,
}

impl WholeWordStrategy {
    #[must_use]
    pub fn new(pattern: &str, ignore_case: bool) -> Self {
        if pattern.is_empty() {
            return Self { regex: None };
        }
        let regex = regexcache::compiled(PatternKind::WholeWord, pattern, ignore_case, || {
            let wrapped = format!(r"\b{}\b", regex::escape(pattern));
            RegexBuilder::new(&wrapped).case_insensitive(ignore_case).build().ok()
        });
        Self { regex }
    }

    pub fn find_matches(&self, line: &str, file_name: &str, line_number: u64) -> Vec<MatchRecord> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        regex
            .find_iter(line)
            .map(|m| MatchRecord {
                file_name: file_name.to_string(),
                line_number,
                full_line: line.to_string(),
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}
