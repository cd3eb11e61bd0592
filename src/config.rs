//! Encoder configuration: syscall membership sets and centrality parameters
//!
//! The membership sets that drive filtering and categorical encoding are plain
//! data passed into the pipeline. Defaults ship embedded in the binary
//! (`syscall-sets-default.toml`) and can be replaced with a user TOML file.
//!
//! # Example TOML
//! ```toml
//! [syscalls]
//! file = ["open", "unlink"]
//! network = ["socket", "connect"]
//! relevant = ["open", "unlink", "socket", "connect", "ioctl"]
//!
//! [centrality]
//! katz_alpha = 0.05
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../syscall-sets-default.toml");

/// The three fixed call-name sets used by the reader and the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyscallSets {
    /// File-related calls (checked first by the classifier)
    pub file: BTreeSet<String>,

    /// Network-related calls
    pub network: BTreeSet<String>,

    /// Allow-list applied when filtering is enabled
    pub relevant: BTreeSet<String>,
}

impl SyscallSets {
    /// Build sets from string slices, mostly useful in tests
    pub fn new(file: &[&str], network: &[&str], relevant: &[&str]) -> Self {
        Self {
            file: to_set(file),
            network: to_set(network),
            relevant: to_set(relevant),
        }
    }

    /// Whether a call survives `--filter`
    pub fn is_relevant(&self, name: &str) -> bool {
        self.relevant.contains(name)
    }

    /// Calls that appear in both the file and network sets
    pub fn overlap(&self) -> Vec<&str> {
        self.file
            .intersection(&self.network)
            .map(String::as_str)
            .collect()
    }

    /// File or network calls that the relevant allow-list would drop
    pub fn missing_from_relevant(&self) -> Vec<&str> {
        self.file
            .iter()
            .chain(self.network.iter())
            .filter(|name| !self.relevant.contains(*name))
            .map(String::as_str)
            .collect()
    }
}

fn to_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Numeric parameters for the centrality engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralityConfig {
    /// Katz attenuation factor; converges only below 1/spectral radius
    pub katz_alpha: f64,

    /// Cap alpha at `katz_alpha_fraction / spectral radius` for each graph
    pub katz_adaptive: bool,

    /// Share of the convergence bound used when `katz_adaptive` is set
    pub katz_alpha_fraction: f64,

    /// Katz constant bias added to every node
    pub katz_beta: f64,

    pub katz_max_iter: usize,

    /// Convergence threshold per node (total error < n * tolerance)
    pub katz_tolerance: f64,

    /// Probability of following an edge instead of restarting
    pub pagerank_damping: f64,

    pub pagerank_max_iter: usize,

    pub pagerank_tolerance: f64,

    /// QR sweeps allowed per eigenvalue before the eigen solve gives up
    pub eigen_max_sweeps: usize,

    /// Inverse iteration steps for the principal eigenvector
    pub eigen_max_iter: usize,

    pub eigen_tolerance: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            katz_alpha: 0.1,
            katz_adaptive: true,
            katz_alpha_fraction: 0.9,
            katz_beta: 1.0,
            katz_max_iter: 1000,
            katz_tolerance: 1.0e-6,
            pagerank_damping: 0.85,
            pagerank_max_iter: 100,
            pagerank_tolerance: 1.0e-6,
            eigen_max_sweeps: 30,
            eigen_max_iter: 100,
            eigen_tolerance: 1.0e-10,
        }
    }
}

impl CentralityConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.katz_alpha > 0.0 && self.katz_alpha.is_finite()) {
            return Err(format!("katz_alpha must be positive, got {}", self.katz_alpha));
        }
        if !(self.katz_alpha_fraction > 0.0 && self.katz_alpha_fraction < 1.0) {
            return Err(format!(
                "katz_alpha_fraction must be in (0, 1), got {}",
                self.katz_alpha_fraction
            ));
        }
        if !self.katz_beta.is_finite() {
            return Err(format!("katz_beta must be finite, got {}", self.katz_beta));
        }
        if !(self.pagerank_damping > 0.0 && self.pagerank_damping < 1.0) {
            return Err(format!(
                "pagerank_damping must be in (0, 1), got {}",
                self.pagerank_damping
            ));
        }
        for (name, tol) in [
            ("katz_tolerance", self.katz_tolerance),
            ("pagerank_tolerance", self.pagerank_tolerance),
            ("eigen_tolerance", self.eigen_tolerance),
        ] {
            if !(tol > 0.0 && tol.is_finite()) {
                return Err(format!("{} must be positive, got {}", name, tol));
            }
        }
        for (name, iters) in [
            ("katz_max_iter", self.katz_max_iter),
            ("pagerank_max_iter", self.pagerank_max_iter),
            ("eigen_max_sweeps", self.eigen_max_sweeps),
            ("eigen_max_iter", self.eigen_max_iter),
        ] {
            if iters == 0 {
                return Err(format!("{} must be at least 1", name));
            }
        }
        Ok(())
    }
}

/// Everything the encoding pipeline needs besides the trace itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub syscalls: SyscallSets,

    #[serde(default)]
    pub centrality: CentralityConfig,
}

impl EncoderConfig {
    /// Build a config from explicit sets and default centrality parameters
    pub fn with_sets(syscalls: SyscallSets) -> Self {
        Self {
            syscalls,
            centrality: CentralityConfig::default(),
        }
    }

    /// Load the configuration embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(DEFAULT_TOML)
            .context("Failed to parse embedded syscall-sets-default.toml")
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file doesn't exist, has invalid TOML syntax, or
    /// carries out-of-range centrality parameters.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML encoder configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameters and report suspicious membership sets
    pub fn validate(&self) -> Result<()> {
        self.centrality
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid centrality configuration: {}", e))?;

        let overlap = self.syscalls.overlap();
        if !overlap.is_empty() {
            tracing::debug!(
                calls = ?overlap,
                "file and network sets overlap; file membership wins"
            );
        }

        let missing = self.syscalls.missing_from_relevant();
        if !missing.is_empty() {
            tracing::warn!(
                calls = ?missing,
                "classified calls are absent from the relevant set and will be dropped by --filter"
            );
        }

        Ok(())
    }
}
