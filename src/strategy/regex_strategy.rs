//! Regex strategy: the default when neither fixed-strings nor whole-word
//! applies, or when `-E` is set explicitly. A compilation failure is
//! silently downgraded to a fixed-string interpretation of the same pattern
//! (§4.2) — it never surfaces as a user-facing error.

use regex::{Regex, RegexBuilder};

use crate::regexcache::{self, PatternKind};
use crate::types::MatchRecord;

#[derive(Clone)]
pub struct RegexStrategy {
    regex: Option<Regex>,
}

impl RegexStrategy {
    #[must_use]
    pub fn new(pattern: &str, ignore_case: bool) -> Self {
        if pattern.is_empty() {
            return Self { regex: None };
        }

        let compiled = regexcache::compiled(PatternKind::Regex, pattern, ignore_case, || {
            RegexBuilder::new(pattern)
                .case_insensitive(ignore_case)
                .build()
                .or_else(|_| {
                    // Downgrade: escape all metacharacters and recompile as a
                    // literal match.
                    RegexBuilder::new(&regex::escape(pattern))
                        .case_insensitive(ignore_case)
                        .build()
                })
                .ok()
        });

        Self { regex: compiled }
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
