//! Context Window (F): attaches before/after context to every match under a
//! single forward streaming pass with bounded memory.
//!
//! Implementation note (resolves part of the Open Question in SPEC_FULL.md
//! §9): rather than a single combined ring buffer sized `2*max(before,after)+1`
//! and a deferred predecessor/successor count check, before-context is
//! snapshotted immediately when a match is found (from a ring buffer sized
//! exactly `before`), and only after-context is deferred per pending match.
//! This sidesteps a corner case in the naive algorithm where a match near
//! the start of a file — which can never accumulate `before` predecessors —
//! would never satisfy a "≥ before predecessors" check and could have its
//! true before-context evicted by the time end-of-input flush runs. Memory
//! stays bounded: one ring of `before` lines, plus one in-flight after-buffer
//! per still-pending match.

use std::collections::VecDeque;

use crate::strategy::{MatchStrategy, Strategy};
use crate::types::{ContextLine, ContextualMatch, MatchRecord};

struct Pending {
    record: MatchRecord,
    before: Vec<ContextLine>,
    after: Vec<ContextLine>,
    remaining_after: usize,
}

pub struct ContextWindow<'s> {
    strategy: &'s Strategy,
    invert: bool,
    before: usize,
    after: usize,
    ring_before: VecDeque<ContextLine>,
    pending: VecDeque<Pending>,
    pub matches: Vec<MatchRecord>,
    pub contextual: Vec<ContextualMatch>,
}

impl<'s> ContextWindow<'s> {
    #[must_use]
    pub fn new(strategy: &'s Strategy, invert: bool, before: usize, after: usize) -> Self {
        Self {
            strategy,
            invert,
            before,
            after,
            ring_before: VecDeque::with_capacity(before + 1),
            pending: VecDeque::new(),
            matches: Vec::new(),
            contextual: Vec::new(),
        }
    }

    /// Feed one more line through the window. Returns the number of matches
    /// recorded on this line (used by the caller to enforce `max-count`).
    pub fn push_line(&mut self, file_name: &str, line_number: u64, content: &str) -> usize {
        let found = self.strategy.find_matches(content, file_name, line_number);
        let records: Vec<MatchRecord> = if self.invert && found.is_empty() {
            vec![MatchRecord {
                file_name: file_name.to_string(),
                line_number,
                full_line: content.to_string(),
                start: 0,
                end: content.len(),
            }]
        } else if self.invert {
            Vec::new()
        } else {
            found
        };

        let produced = records.len();

        let this_line = ContextLine {
            file_name: file_name.to_string(),
            line_number,
            content: content.to_string(),
        };

        // Feed this line as after-context to every still-open pending match
        // before registering any new match on the same line, so a line never
        // becomes its own after-context.
        for p in &mut self.pending {
            if p.remaining_after > 0 {
                p.after.push(this_line.clone());
                p.remaining_after -= 1;
            }
        }
        self.drain_resolved();

        for record in records {
            self.matches.push(record.clone());
            let before: Vec<ContextLine> = self.ring_before.iter().cloned().collect();
            if self.after == 0 {
                self.contextual.push(ContextualMatch {
                    r#match: record,
                    before,
                    after: Vec::new(),
                });
            } else {
                self.pending.push_back(Pending {
                    record,
                    before,
                    after: Vec::new(),
                    remaining_after: self.after,
                });
            }
        }

        if self.before > 0 {
            self.ring_before.push_back(this_line);
            while self.ring_before.len() > self.before {
                self.ring_before.pop_front();
            }
        }

        produced
    }

    /// Pop any pending matches whose after-context is fully collected,
    /// preserving match order (earlier matches always fill first).
    fn drain_resolved(&mut self) {
        while let Some(front) = self.pending.front() {
            if front.remaining_after == 0 {
                let p = self.pending.pop_front().expect("front just checked");
                self.contextual.push(ContextualMatch {
                    r#match: p.record,
                    before: p.before,
                    after: p.after,
                });
            } else {
                break;
            }
        }
    }

    /// Flush any matches still awaiting after-context at end of input, with
    /// whatever after-context they accumulated (§4.4's end-of-input rule).
    pub fn finish(mut self) -> (Vec<MatchRecord>, Vec<ContextualMatch>) {
        while let Some(p) = self.pending.pop_front() {
            self.contextual.push(ContextualMatch {
                r#match: p.record,
                before: p.before,
                after: p.after,
            });
        }
        (self.matches, self.contextual)
    }
}
