//! Path Source & Glob Filter (B): resolves input tokens to a concrete,
//! deduplicated sequence of paths, applying include/exclude filters.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::options::OptionContext;
use crate::regexcache::{self, PatternKind};

pub const STDIN_SENTINEL: &str = "-";

/// Translate a shell glob into an anchored regex per §4.1's exact character
/// table, memoized in the shared pattern cache (§5). A malformed glob
/// (translation that fails to compile, which in practice cannot happen given
/// the table below) falls back to matching the glob text literally.
#[must_use]
pub fn compile_glob(pattern: &str) -> Regex {
    regexcache::compiled(PatternKind::Glob, pattern, true, || build_glob_regex(pattern))
        .unwrap_or_else(|| Regex::new(&regex::escape(pattern)).expect("escaped literal always compiles"))
}

fn build_glob_regex(pattern: &str) -> Option<Regex> {
    let mut out = String::from("(?i)^");
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '.' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' | '+' => {
                out.push('\\');
                out.push(c);
            }
            other => out.push(other),
        }
    }
    out.push('$');
    Regex::new(&out).ok()
}

/// Whether `file` survives the include/exclude filter (§4.1). Excludes are
/// checked first; an exclude hit drops the file. Otherwise, if any include
/// pattern exists, the file must match at least one.
#[must_use]
pub fn passes_filter(file: &Path, options: &OptionContext) -> bool {
    for pattern in &options.exclude {
        if glob_matches(pattern, file) {
            return false;
        }
    }
    if options.include.is_empty() {
        return true;
    }
    options.include.iter().any(|pattern| glob_matches(pattern, file))
}

fn glob_matches(pattern: &str, file: &Path) -> bool {
    let regex = compile_glob(pattern);
    if pattern.contains('/') {
        let full = file.to_string_lossy().replace('\\', "/");
        regex.is_match(&full)
    } else {
        let leaf = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        regex.is_match(&leaf)
    }
}

/// Expand the option context's path tokens into a deduplicated sequence of
/// concrete path tokens (§4.1). `"-"` is always preserved verbatim.
#[must_use]
pub fn expand_paths(options: &OptionContext) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |token: String| {
        if seen.insert(token.clone()) {
            out.push(token);
        }
    };

    for token in &options.paths {
        if token == STDIN_SENTINEL {
            push(STDIN_SENTINEL.to_string());
            continue;
        }

        let path = Path::new(token);
        if options.recursive && path.is_dir() {
            walk_recursive(path, options, &mut push);
        } else if path.is_file() {
            push(token.clone());
        } else {
            expand_glob_token(token, &mut push);
        }
    }
    out
}

fn walk_recursive(root: &Path, options: &OptionContext, push: &mut impl FnMut(String)) {
    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(true)
        .build();

    for entry in walker {
        match entry {
            Ok(dent) => {
                if dent.file_type().is_some_and(|ft| ft.is_file())
                    && passes_filter(dent.path(), options)
                {
                    push(dent.path().to_string_lossy().to_string());
                }
            }
            Err(err) => {
                // An unreadable subtree aborts only itself (§4.1, §7).
                let err = crate::error::GrepError::PathExpansion(err.to_string());
                log::warn!("{err}");
            }
        }
    }
}

fn expand_glob_token(token: &str, push: &mut impl FnMut(String)) {
    let path = Path::new(token);
    let (dir, leaf) = match (path.parent(), path.file_name()) {
        (Some(dir), Some(leaf)) => (dir, leaf.to_string_lossy().to_string()),
        _ => {
            // Malformed glob: fall back to the literal token (§4.1).
            push(token.to_string());
            return;
        }
    };
    let dir = if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    };

    let regex = compile_glob(&leaf);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        push(token.to_string());
        return;
    };

    let mut any = false;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if regex.is_match(&name) {
            any = true;
            push(entry.path().to_string_lossy().to_string());
        }
    }
    if !any {
        push(token.to_string());
    }
}
