//! Tuning constants for the search core.
//!
//! Mirrors the teacher's `search/manager/config.rs`: one place for every
//! magic number so the buffering/threshold rationale lives next to the value.

/// Default Match Record buffer size when `max-count` is absent (§4.5).
pub const DEFAULT_MATCH_BUFFER: usize = 1_000;

/// Files at or below this size use the whole-file fast path (§4.3, §4.5).
pub const FAST_PATH_THRESHOLD_BYTES: u64 = 4 * 1024;

/// Buffered-read sizes, chosen from file size (§4.3).
pub const BUF_SIZE_TINY: usize = 1024; // <1 KiB
pub const BUF_SIZE_SMALL: usize = 4 * 1024; // <1 MiB
pub const BUF_SIZE_MEDIUM: usize = 8 * 1024; // <10 MiB
pub const BUF_SIZE_LARGE: usize = 16 * 1024; // >=10 MiB
pub const STDIN_BUF_SIZE: usize = 4 * 1024;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

#[must_use]
pub fn buffer_size_for(file_size: u64) -> usize {
    if file_size < KIB {
        BUF_SIZE_TINY
    } else if file_size < MIB {
        BUF_SIZE_SMALL
    } else if file_size < 10 * MIB {
        BUF_SIZE_MEDIUM
    } else {
        BUF_SIZE_LARGE
    }
}
