//! Node and edge tables for an encoded trace

use crate::features::{FeatureGraph, FEATURE_NAMES};
use std::fmt::Write as _;

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Aligned text tables: one row per node, then one row per edge
pub fn render_text(graph: &FeatureGraph) -> String {
    let mut out = String::new();
    let width = graph
        .names()
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("name".len());

    let _ = writeln!(out, "Nodes: {}", graph.node_count());
    let _ = write!(out, "{:>5}  {:<width$}  {:<8}", "index", "name", "category");
    for column in &FEATURE_NAMES[3..] {
        let _ = write!(out, "  {:>11}", column);
    }
    out.push('\n');

    for (node, row) in graph.feature_matrix().iter().enumerate() {
        let name = graph.name_of(node).unwrap_or_default();
        let category = graph
            .category_of(node)
            .map(|c| c.label())
            .unwrap_or_default();
        let _ = write!(out, "{:>5}  {:<width$}  {:<8}", node, name, category);
        for value in &row[3..] {
            let _ = write!(out, "  {:>11.6}", value);
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "\nEdges: {} (total weight {})",
        graph.edge_count(),
        graph.total_weight()
    );
    for (src, dst, weight) in graph.weighted_edges() {
        let _ = writeln!(out, "  {:<width$} -> {:<width$}  {:>6}", src, dst, weight);
    }

    out
}

/// Node feature matrix as CSV, header included
pub fn nodes_csv(graph: &FeatureGraph) -> String {
    let mut out = String::from("index,name");
    for column in FEATURE_NAMES {
        out.push(',');
        out.push_str(column);
    }
    out.push('\n');

    for (node, row) in graph.feature_matrix().iter().enumerate() {
        let name = graph.name_of(node).unwrap_or_default();
        let _ = write!(out, "{},{}", node, escape_field(name));
        for value in row {
            let _ = write!(out, ",{}", value);
        }
        out.push('\n');
    }
    out
}

/// Edge list as CSV, header included
pub fn edges_csv(graph: &FeatureGraph) -> String {
    let mut out = String::from("src,dst,src_name,dst_name,weight\n");
    for (&(src, dst), &weight) in graph.edges().iter().zip(graph.weights()) {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            src,
            dst,
            escape_field(graph.name_of(src).unwrap_or_default()),
            escape_field(graph.name_of(dst).unwrap_or_default()),
            weight
        );
    }
    out
}
