//! Syscall type classification
//!
//! Maps a call name to one of three mutually exclusive categories using the
//! configured membership sets. File membership is checked before network
//! membership, so a call listed in both sets is a File call.

use crate::config::SyscallSets;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a syscall node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyscallCategory {
    File,
    Network,
    Other,
}

impl SyscallCategory {
    pub const ALL: [SyscallCategory; 3] = [Self::File, Self::Network, Self::Other];

    /// Position of the hot entry in the one-hot encoding
    pub fn index(self) -> usize {
        match self {
            Self::File => 0,
            Self::Network => 1,
            Self::Other => 2,
        }
    }

    /// 3-element one-hot encoding `[file, network, other]`
    pub fn one_hot(self) -> [f64; 3] {
        let mut encoding = [0.0; 3];
        encoding[self.index()] = 1.0;
        encoding
    }

    /// Human-readable label used in legends and tables
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Network => "network",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SyscallCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a call name against the configured sets
pub fn classify(name: &str, sets: &SyscallSets) -> SyscallCategory {
    if sets.file.contains(name) {
        SyscallCategory::File
    } else if sets.network.contains(name) {
        SyscallCategory::Network
    } else {
        SyscallCategory::Other
    }
}
