#![no_main]

use libfuzzer_sys::fuzz_target;
use stracegraph::trace_reader::parse_trace;
use stracegraph::{encode_calls, EncodeError, EncoderConfig};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let Ok(config) = EncoderConfig::builtin() else {
        return;
    };

    for filter in [false, true] {
        let calls = parse_trace(&text, filter, &config.syscalls);
        match encode_calls(&calls, &config) {
            Ok(graph) => {
                assert_eq!(graph.total_weight() as usize, calls.len().saturating_sub(1));
                assert!(graph.feature_matrix().iter().flatten().all(|v| v.is_finite()));
            }
            Err(EncodeError::Centrality(_)) => {}
            Err(err) => panic!("builder defect: {}", err),
        }
    }
});
