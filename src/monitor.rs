//! Process monitor: report newly started processes by name
//!
//! Polls the process table and reports each matching pid once. Independent of
//! the encoder; it only exists so traces can be captured from the processes
//! it finds.

use std::collections::{BTreeMap, BTreeSet, HashSet};
#[cfg(unix)]
use std::fs;

/// Source of `(pid, name)` pairs for every running process
pub trait ProcessTable {
    fn snapshot(&self) -> Vec<(u32, String)>;
}

/// Reads `/proc/<pid>/comm` for every numeric entry in `/proc`
pub struct ProcfsTable;

#[cfg(unix)]
impl ProcessTable for ProcfsTable {
    fn snapshot(&self) -> Vec<(u32, String)> {
        let entries = match fs::read_dir("/proc") {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "cannot list /proc");
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .filter_map(|pid| {
                // Processes can exit between listing and reading
                let comm = fs::read_to_string(format!("/proc/{}/comm", pid)).ok()?;
                let name = comm.trim();
                if name.is_empty() {
                    None
                } else {
                    Some((pid, name.to_string()))
                }
            })
            .collect()
    }
}

#[cfg(not(unix))]
impl ProcessTable for ProcfsTable {
    fn snapshot(&self) -> Vec<(u32, String)> {
        Vec::new()
    }
}

/// Tracks which matching pids have already been reported
pub struct ProcessMonitor<T: ProcessTable> {
    table: T,
    names: BTreeSet<String>,
    known: HashSet<u32>,
}

impl<T: ProcessTable> ProcessMonitor<T> {
    pub fn new<I, S>(table: T, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table,
            names: names.into_iter().map(Into::into).collect(),
            known: HashSet::new(),
        }
    }

    /// Names being watched
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Matching processes not seen by an earlier poll, ordered by pid
    pub fn poll(&mut self) -> Vec<(u32, String)> {
        let current: BTreeMap<u32, String> = self
            .table
            .snapshot()
            .into_iter()
            .filter(|(_, name)| self.names.contains(name))
            .collect();

        let fresh: Vec<(u32, String)> = current
            .into_iter()
            .filter(|(pid, _)| !self.known.contains(pid))
            .collect();

        self.known.extend(fresh.iter().map(|(pid, _)| *pid));
        tracing::debug!(new = fresh.len(), known = self.known.len(), "polled process table");
        fresh
    }
}
