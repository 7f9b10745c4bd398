//! Line Stream (D): a lazy, cancellable, once-iterable sequence of lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use tokio::sync::watch;

use crate::config;
use crate::types::LineView;

#[derive(Debug)]
pub enum StreamError {
    Cancelled,
    Io(io::Error),
}

/// Strip a trailing `\n`, and a `\r` immediately preceding it, from a raw
/// line buffer (§4.3).
fn strip_newline(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

/// Pull-based line iterator over any `BufRead`, checking cancellation before
/// every yielded line (§4.3, §5).
pub struct LineStream<R> {
    reader: R,
    line_number: u64,
    cancel: watch::Receiver<bool>,
}

impl<R: BufRead> LineStream<R> {
    pub fn new(reader: R, cancel: watch::Receiver<bool>) -> Self {
        Self {
            reader,
            line_number: 0,
            cancel,
        }
    }

    /// Returns `Ok(None)` at end of input, `Err(Cancelled)` if cancellation
    /// was requested before this line could be produced.
    pub fn next_line(&mut self) -> Result<Option<LineView>, StreamError> {
        if *self.cancel.borrow() {
            return Err(StreamError::Cancelled);
        }

        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf).map_err(StreamError::Io)?;
        if read == 0 {
            return Ok(None);
        }
        strip_newline(&mut buf);
        self.line_number += 1;
        Ok(Some(LineView {
            line_number: self.line_number,
            content: String::from_utf8_lossy(&buf).into_owned(),
        }))
    }
}

/// Open a file for streaming with the buffer size chosen from its size
/// (§4.3's table). Also reports whether the first chunk looked binary
/// (NUL-byte heuristic, SPEC_FULL.md §4.3 **[ADDED]**) for diagnostics only.
pub fn open_file_with_cancel(
    path: &Path,
    cancel: watch::Receiver<bool>,
) -> io::Result<LineStream<BufReader<File>>> {
    let file = File::open(path)?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    let cap = config::buffer_size_for(size);
    let mut reader = BufReader::with_capacity(cap, file);
    probe_binary(&mut reader, path);
    Ok(LineStream::new(reader, cancel))
}

pub fn open_stdin(cancel: watch::Receiver<bool>) -> LineStream<BufReader<io::Stdin>> {
    LineStream::new(BufReader::with_capacity(config::STDIN_BUF_SIZE, io::stdin()), cancel)
}

fn probe_binary<R: BufRead>(reader: &mut R, path: &Path) {
    if let Ok(peeked) = reader.fill_buf() {
        if peeked.contains(&0) {
            log::debug!("{} looks binary (NUL byte in first chunk)", path.display());
        }
    }
}

/// Fast path (§4.3, §4.5): read a small file whole and split on `\n`.
/// Output must be identical to the streaming path.
pub fn read_whole_file_lines(path: &Path) -> io::Result<Vec<LineView>> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(split_lines(&data))
}

pub fn split_lines(data: &[u8]) -> Vec<LineView> {
    if data.is_empty() {
        return Vec::new();
    }

    // `split(b'\n')` on a trailing newline yields one spurious empty element
    // *after* the last real line; strip that one trailing `\n` up front so
    // every remaining split element — including genuine blank lines in the
    // middle of the file — is emitted, matching the streaming path exactly.
    let data = data.strip_suffix(b"\n").unwrap_or(data);

    let mut out = Vec::new();
    let mut line_number = 0u64;
    for raw in data.split(|&b| b == b'\n') {
        let mut buf = raw.to_vec();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        line_number += 1;
        out.push(LineView {
            line_number,
            content: String::from_utf8_lossy(&buf).into_owned(),
        });
    }
    out
}
