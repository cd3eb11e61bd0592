//! Trace reader: strace text to an ordered sequence of call names
//!
//! One syscall invocation per line; the call name is everything before the
//! first `(`. Lines without a `(` are passed through whole so the caller sees
//! malformed input instead of silently losing it. With filtering enabled only
//! calls in the relevant allow-list survive.

use crate::config::SyscallSets;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a trace file
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Extract the call name from one trace line
///
/// ```
/// use stracegraph::trace_reader::call_name;
///
/// assert_eq!(call_name("openat(AT_FDCWD, \"/etc/hosts\", O_RDONLY) = 3"), "openat");
/// assert_eq!(call_name("+++ exited with 0 +++"), "+++ exited with 0 +++");
/// ```
pub fn call_name(line: &str) -> &str {
    match line.find('(') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse in-memory trace text into call names
///
/// Order and repetition are preserved; nothing is deduplicated.
pub fn parse_trace(text: &str, filter: bool, sets: &SyscallSets) -> Vec<String> {
    let mut calls = Vec::new();
    let mut dropped = 0usize;

    for line in text.lines() {
        let name = call_name(line);
        if filter && !sets.is_relevant(name) {
            dropped += 1;
            continue;
        }
        calls.push(name.to_string());
    }

    tracing::debug!(kept = calls.len(), dropped, filter, "parsed trace");
    calls
}

/// Read a trace file into call names
///
/// An empty file yields an empty sequence. Invalid UTF-8 is replaced rather
/// than rejected.
///
/// # Errors
/// Returns [`TraceError::Io`] if the file is missing or unreadable.
pub fn read_syscalls<P: AsRef<Path>>(
    path: P,
    filter: bool,
    sets: &SyscallSets,
) -> Result<Vec<String>, TraceError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read trace file");
    Ok(parse_trace(&String::from_utf8_lossy(&bytes), filter, sets))
}
