//! Fixed-string strategy: every non-overlapping occurrence, advancing by one
//! character per hit so overlapping sources (`aaaa` / `aa`) yield 0,1,2.

use crate::types::MatchRecord;

#[derive(Clone)]
pub struct FixedStrategy {
    pattern: String,
    ignore_case: bool,
}

impl FixedStrategy {
    #[must_use]
    pub fn new(pattern: &str, ignore_case: bool) -> Self {
        Self {
            pattern: if ignore_case {
                pattern.to_lowercase()
            } else {
                pattern.to_string()
            },
            ignore_case,
        }
    }

    pub fn find_matches(&self, line: &str, file_name: &str, line_number: u64) -> Vec<MatchRecord> {
        if self.pattern.is_empty() {
            return Vec::new();
        }

        let haystack = if self.ignore_case {
            line.to_lowercase()
        } else {
            line.to_string()
        };

        let mut out = Vec::new();
        // Byte-offset scan, advancing one *character* per hit (not one byte),
        // so multi-byte UTF-8 doesn't land mid-codepoint.
        let char_starts: Vec<usize> = haystack.char_indices().map(|(i, _)| i).collect();
        let mut idx = 0;
        while idx < char_starts.len() {
            let start = char_starts[idx];
            if haystack[start..].starts_with(self.pattern.as_str()) {
                let end = start + self.pattern.len();
                out.push(MatchRecord {
                    file_name: file_name.to_string(),
                    line_number,
                    full_line: line.to_string(),
                    start,
                    end,
                });
            }
            idx += 1;
        }
        out
    }
}
