//! Error kinds named in SPEC_FULL.md §7.
//!
//! Pattern compilation never constructs one of these: a regex-compile
//! failure is downgraded to a fixed-string match inline in the strategy
//! (§4.2), and cancellation is a plain value (`StreamError::Cancelled`) the
//! worker converts to an early, non-error `FileResult`, never an exception
//! at this boundary (§5, §7). `PathExpansion` gates the Path Source's
//! per-subtree walk failures; `Io` gates the File Worker's per-file read
//! failures; `Fatal` gates the Engine/CLI boundary in `main`.

use std::fmt;

#[derive(Debug)]
pub enum GrepError {
    /// An unreadable directory aborted one subtree of a recursive walk.
    PathExpansion(String),
    /// A per-file read failure, captured on a `FileResult` rather than
    /// propagated to the engine.
    Io(String),
    /// A fatal, unrecoverable error at the engine/CLI boundary.
    Fatal(String),
}

impl fmt::Display for GrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrepError::PathExpansion(msg) => write!(f, "path expansion error: {msg}"),
            GrepError::Io(msg) => write!(f, "{msg}"),
            GrepError::Fatal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GrepError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_expansion_display_is_prefixed() {
        let err = GrepError::PathExpansion("permission denied".to_string());
        assert_eq!(err.to_string(), "path expansion error: permission denied");
    }

    #[test]
    fn io_display_passes_the_message_through() {
        let err = GrepError::Io("no such file or directory".to_string());
        assert_eq!(err.to_string(), "no such file or directory");
    }
}
