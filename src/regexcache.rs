//! Process-wide compiled-pattern cache shared by the Path Source/Glob Filter
//! (B) and the Match Strategies (C) — SPEC_FULL.md §5: "The compiled-regex
//! cache (B, C) is shared; it uses a concurrent map keyed by
//! `(kind, pattern, flags)` so that the amortized cost is one compile per
//! distinct regex."

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Glob,
    WholeWord,
    Regex,
}

type CacheKey = (PatternKind, String, bool);

static CACHE: Lazy<RwLock<HashMap<CacheKey, Option<Regex>>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Look up or compile-and-insert a pattern. `build` runs at most once per
/// distinct `(kind, pattern, ignore_case)` — later callers hit the cache.
pub fn compiled(
    kind: PatternKind,
    pattern: &str,
    ignore_case: bool,
    build: impl FnOnce() -> Option<Regex>,
) -> Option<Regex> {
    let key = (kind, pattern.to_string(), ignore_case);
    if let Some(hit) = CACHE.read().get(&key) {
        return hit.clone();
    }
    let compiled = build();
    CACHE.write().insert(key, compiled.clone());
    compiled
}
