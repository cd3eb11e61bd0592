// End-to-end tests for the trace → FeatureGraph pipeline

use std::io::Write;
use stracegraph::centrality::CentralityError;
use stracegraph::classify::SyscallCategory;
use stracegraph::config::SyscallSets;
use stracegraph::trace_reader::TraceError;
use stracegraph::{encode_trace, EncodeError, EncoderConfig, FEATURE_NAMES};

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/strace_sample.txt");

fn write_trace(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn builtin() -> EncoderConfig {
    EncoderConfig::builtin().unwrap()
}

#[test]
fn test_open_read_read_close() {
    let trace = write_trace("open(...)\nread(...)\nread(...)\nclose(...)\n");
    let fg = encode_trace(trace.path(), false, &builtin()).unwrap();

    assert_eq!(fg.node_count(), 3);
    assert_eq!(fg.edge_count(), 3);
    assert_eq!(fg.edge_weight("open", "read"), Some(1));
    assert_eq!(fg.edge_weight("read", "read"), Some(1));
    assert_eq!(fg.edge_weight("read", "close"), Some(1));

    let open = fg.index_of("open").unwrap();
    let read = fg.index_of("read").unwrap();
    let close = fg.index_of("close").unwrap();
    assert_eq!(fg.category_of(open), Some(SyscallCategory::File));
    assert_eq!(fg.category_of(read), Some(SyscallCategory::Network));
    assert_eq!(fg.category_of(close), Some(SyscallCategory::Network));

    assert_eq!(&fg.features(open).unwrap()[..3], &[1.0, 0.0, 0.0]);
    assert_eq!(&fg.features(read).unwrap()[..3], &[0.0, 1.0, 0.0]);
}

#[test]
fn test_filter_drops_irrelevant_calls() {
    let trace = write_trace("open(a)\nmmap(b)\nread(c)\n");
    let fg = encode_trace(trace.path(), true, &builtin()).unwrap();
    assert_eq!(fg.node_count(), 2);
    assert_eq!(fg.edge_weight("open", "read"), Some(1));
    assert_eq!(fg.index_of("mmap"), None);

    let fg = encode_trace(trace.path(), false, &builtin()).unwrap();
    assert_eq!(fg.node_count(), 3);
    assert_eq!(fg.edge_weight("open", "read"), None);
    assert_eq!(fg.category_of(fg.index_of("mmap").unwrap()), Some(SyscallCategory::Other));
}

#[test]
fn test_sample_trace() {
    let fg = encode_trace(SAMPLE, false, &builtin()).unwrap();
    assert_eq!(fg.node_count(), 17);
    assert_eq!(fg.total_weight(), 21);
    assert!(fg.index_of("+++ exited with 0 +++").is_some());

    let filtered = encode_trace(SAMPLE, true, &builtin()).unwrap();
    assert_eq!(filtered.node_count(), 11);
    assert_eq!(filtered.edge_count(), 15);
    assert_eq!(filtered.total_weight(), 15);
    assert_eq!(filtered.edge_weight("epoll_wait", "sendto"), Some(1));
}

#[test]
fn test_empty_file() {
    let trace = write_trace("");
    let fg = encode_trace(trace.path(), false, &builtin()).unwrap();
    assert!(fg.is_empty());
    assert_eq!(fg.edge_count(), 0);
}

#[test]
fn test_single_line() {
    let trace = write_trace("socket(AF_INET, SOCK_STREAM, 0) = 3\n");
    let fg = encode_trace(trace.path(), false, &builtin()).unwrap();
    assert_eq!(fg.node_count(), 1);
    assert_eq!(fg.edge_count(), 0);

    let row = fg.features(0).unwrap();
    assert_eq!(row[..3], [0.0, 1.0, 0.0]);
    // katz, betweenness, closeness, degree, eigenvector fall back to zero
    assert_eq!(row[3..8], [0.0; 5]);
    assert_eq!(row[8], 1.0);
}

#[test]
fn test_all_lines_filtered_out() {
    let trace = write_trace("mmap(a)\nbrk(b)\n");
    let fg = encode_trace(trace.path(), true, &builtin()).unwrap();
    assert!(fg.is_empty());
}

#[test]
fn test_missing_file() {
    let err = encode_trace("/nonexistent/strace.txt", false, &builtin()).unwrap_err();
    assert!(matches!(err, EncodeError::Trace(TraceError::Io { .. })));
}

#[test]
fn test_idempotent() {
    let config = builtin();
    let first = encode_trace(SAMPLE, false, &config).unwrap();
    let second = encode_trace(SAMPLE, false, &config).unwrap();
    assert_eq!(first, second);
}

fn assert_finite(fg: &stracegraph::FeatureGraph) {
    assert!(fg.feature_matrix().iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn test_self_loop_divergence_with_fixed_alpha() {
    let trace = write_trace(&"read(3, \"\", 1) = 0\n".repeat(30));

    let fg = encode_trace(trace.path(), false, &builtin()).unwrap();
    assert_eq!(fg.edge_weight("read", "read"), Some(29));
    assert_finite(&fg);

    let mut config = builtin();
    config.centrality.katz_adaptive = false;
    let err = encode_trace(trace.path(), false, &config).unwrap_err();
    assert!(matches!(
        err,
        EncodeError::Centrality(CentralityError::NotConverged { metric: "katz", .. })
    ));

    config.centrality.katz_alpha = 0.01;
    let fg = encode_trace(trace.path(), false, &config).unwrap();
    assert_eq!(fg.edge_weight("read", "read"), Some(29));
}

#[test]
fn test_read_loop_encodes_with_builtin() {
    let mut text = String::from("open(\"/etc/hosts\", O_RDONLY) = 3\n");
    text.push_str(&"read(3, \"x\", 1) = 1\n".repeat(11));
    text.push_str("close(3) = 0\n");
    let trace = write_trace(&text);

    let fg = encode_trace(trace.path(), true, &builtin()).unwrap();
    assert_eq!(fg.node_count(), 3);
    assert_eq!(fg.edge_weight("read", "read"), Some(10));
    assert_finite(&fg);
}

#[test]
fn test_request_reply_loop_encodes_with_builtin() {
    let text = "sendto(4, \"q\", 1, 0, NULL, 0) = 1\nrecvfrom(4, \"r\", 1, 0, NULL, NULL) = 1\n"
        .repeat(25);
    let trace = write_trace(&text);

    let fg = encode_trace(trace.path(), true, &builtin()).unwrap();
    assert_eq!(fg.edge_weight("sendto", "recvfrom"), Some(25));
    assert_eq!(fg.edge_weight("recvfrom", "sendto"), Some(24));
    assert_finite(&fg);
}

#[test]
fn test_repeated_sample_encodes_with_builtin() {
    let sample = std::fs::read_to_string(SAMPLE).unwrap();
    let trace = write_trace(&sample.repeat(20));

    let single = encode_trace(SAMPLE, false, &builtin()).unwrap();
    let fg = encode_trace(trace.path(), false, &builtin()).unwrap();
    assert_eq!(fg.node_count(), single.node_count());
    assert_eq!(fg.total_weight() + 1, 20 * (single.total_weight() + 1));
    assert_finite(&fg);
}

#[test]
fn test_custom_sets() {
    let config = EncoderConfig::with_sets(SyscallSets::new(
        &["openat"],
        &["sendmsg"],
        &["openat", "sendmsg"],
    ));
    let trace = write_trace("openat(x)\nfutex(y)\nsendmsg(z)\n");
    let fg = encode_trace(trace.path(), true, &config).unwrap();
    assert_eq!(fg.node_count(), 2);
    assert_eq!(fg.category_of(fg.index_of("openat").unwrap()), Some(SyscallCategory::File));
}

#[test]
fn test_feature_names_cover_matrix() {
    let fg = encode_trace(SAMPLE, true, &builtin()).unwrap();
    for row in fg.feature_matrix() {
        assert_eq!(row.len(), FEATURE_NAMES.len());
        assert!(row.iter().all(|v| v.is_finite()));
    }
}
