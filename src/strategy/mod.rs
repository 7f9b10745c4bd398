//! Match Strategies (C): pluggable line -> matches predicates.
//!
//! A closed `enum Strategy` rather than a `Vec<Box<dyn MatchStrategy>>` — the
//! teacher's own polymorphic-strategy note (SPEC_FULL.md §9) calls this
//! sufficient for a fixed, small set of variants.

mod fixed;
mod regex_strategy;
mod whole_word;

use crate::options::OptionContext;
use crate::types::MatchRecord;

/// Contract every strategy satisfies: pure, thread-safe line -> matches.
pub trait MatchStrategy {
    fn find_matches(
        &self,
        line: &str,
        file_name: &str,
        line_number: u64,
    ) -> Vec<MatchRecord>;
}

/// One of the three matching strategies, selected once per run.
#[derive(Clone)]
pub enum Strategy {
    Fixed(fixed::FixedStrategy),
    WholeWord(whole_word::WholeWordStrategy),
    Regex(regex_strategy::RegexStrategy),
}

impl MatchStrategy for Strategy {
    fn find_matches(&self, line: &str, file_name: &str, line_number: u64) -> Vec<MatchRecord> {
        match self {
            Strategy::Fixed(s) => s.find_matches(line, file_name, line_number),
            Strategy::WholeWord(s) => s.find_matches(line, file_name, line_number),
            Strategy::Regex(s) => s.find_matches(line, file_name, line_number),
        }
    }
}

/// Select the strategy per the precedence rule in §4.2: fixed-strings,
/// then whole-word, then regex (the default).
#[must_use]
pub fn select(options: &OptionContext) -> Strategy {
    if options.fixed_strings {
        Strategy::Fixed(fixed::FixedStrategy::new(&options.pattern, options.ignore_case))
    } else if options.word_regexp {
        Strategy::WholeWord(whole_word::WholeWordStrategy::new(
            &options.pattern,
            options.ignore_case,
        ))
    } else {
        Strategy::Regex(regex_strategy::RegexStrategy::new(
            &options.pattern,
            options.ignore_case,
        ))
    }
}
