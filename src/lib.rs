//! stracegraph - strace call sequences as weighted call-transition graphs
//!
//! This library reads strace text output, builds a directed graph whose edges
//! count consecutive-call transitions, and encodes every node as a 9-element
//! feature vector (one-hot syscall category plus six centrality metrics) for
//! downstream graph-learning models.

pub mod call_graph;
pub mod centrality;
pub mod classify;
pub mod cli;
pub mod config;
pub mod encoder;
pub mod features;
pub mod monitor;
pub mod report;
pub mod svg_output;
pub mod trace_reader;

pub use config::EncoderConfig;
pub use encoder::{encode_calls, encode_trace, EncodeError};
pub use features::{FeatureGraph, FEATURE_NAMES};
