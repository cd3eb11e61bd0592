//! SVG rendering of an encoded trace graph
//!
//! Nodes sit on a circle in index order and are coloured by category; edges
//! carry arrow heads and their transition counts. The circle grows with the
//! node count so neighbouring nodes never overlap. The markup is built as a
//! string, the same way the HTML report is, so no drawing backend is needed.

use crate::classify::SyscallCategory;
use crate::features::FeatureGraph;
use anyhow::{Context, Result};
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const MIN_LAYOUT_RADIUS: f64 = 320.0;
const NODE_RADIUS: f64 = 22.0;
/// Space outside the circle for labels and self-loops
const MARGIN: f64 = 130.0;

/// Square drawing area sized for a node count
#[derive(Debug, Clone, Copy, PartialEq)]
struct Canvas {
    size: f64,
    radius: f64,
}

impl Canvas {
    /// Circumference of at least 1.5 node diameters per node
    fn for_nodes(nodes: usize) -> Self {
        let radius = MIN_LAYOUT_RADIUS.max(nodes as f64 * NODE_RADIUS * 1.5 / PI);
        Self {
            size: (2.0 * (radius + MARGIN)).ceil(),
            radius,
        }
    }

    fn center(&self) -> (f64, f64) {
        (self.size / 2.0, self.size / 2.0)
    }
}

/// Fill colour for a node category
pub fn category_color(category: SyscallCategory) -> &'static str {
    match category {
        SyscallCategory::File => "#3366CC",
        SyscallCategory::Network => "#DC3912",
        SyscallCategory::Other => "#FF9900",
    }
}

/// Escape XML special characters in labels
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Node centres on a circle, starting at twelve o'clock
fn circular_layout(canvas: &Canvas, nodes: usize) -> Vec<(f64, f64)> {
    let (cx, cy) = canvas.center();
    if nodes == 1 {
        return vec![(cx, cy)];
    }
    (0..nodes)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / nodes as f64 - PI / 2.0;
            (cx + canvas.radius * angle.cos(), cy + canvas.radius * angle.sin())
        })
        .collect()
}

/// Output file name: `<input>.svg` or `<input>_filtered.svg`
pub fn plot_path(input: &Path, filtered: bool) -> PathBuf {
    let suffix = if filtered { "_filtered.svg" } else { ".svg" };
    let mut name = input.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Render the graph as a standalone SVG document
pub fn render_svg(graph: &FeatureGraph) -> String {
    let canvas = Canvas::for_nodes(graph.node_count());
    let positions = circular_layout(&canvas, graph.node_count());
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ),
        w = canvas.size,
        h = canvas.size
    );
    svg.push_str(concat!(
        r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" "#,
        r#"markerWidth="8" markerHeight="8" orient="auto-start-reverse">"#,
        r##"<path d="M 0 0 L 10 5 L 0 10 z" fill="#555"/></marker></defs>"##,
        "\n"
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    svg.push_str("<g class=\"edges\">\n");
    for (&(src, dst), &weight) in graph.edges().iter().zip(graph.weights()) {
        write_edge(&mut svg, positions[src], positions[dst], src == dst, weight);
    }
    svg.push_str("</g>\n");

    svg.push_str("<g class=\"nodes\">\n");
    for (node, &(x, y)) in positions.iter().enumerate() {
        let category = graph.category_of(node).unwrap_or(SyscallCategory::Other);
        let name = graph.name_of(node).unwrap_or_default();
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="{}" fill="{}" stroke="black"/>"#,
            x,
            y,
            NODE_RADIUS,
            category_color(category)
        );
        let _ = writeln!(
            svg,
            concat!(
                r#"<text x="{:.1}" y="{:.1}" font-size="12" "#,
                r#"text-anchor="middle" font-family="sans-serif">{}</text>"#
            ),
            x,
            y - NODE_RADIUS - 6.0,
            escape_xml(name)
        );
    }
    svg.push_str("</g>\n");

    write_legend(&mut svg, canvas.size);
    svg.push_str("</svg>\n");
    svg
}

fn write_edge(svg: &mut String, from: (f64, f64), to: (f64, f64), self_loop: bool, weight: u64) {
    if self_loop {
        let (x, y) = from;
        let top = y - NODE_RADIUS;
        let _ = writeln!(
            svg,
            concat!(
                r#"<path d="M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}" "#,
                r##"fill="none" stroke="#555" marker-end="url(#arrow)"/>"##
            ),
            x - 8.0,
            top,
            x - 40.0,
            top - 50.0,
            x + 40.0,
            top - 50.0,
            x + 8.0,
            top
        );
        write_weight_label(svg, x, top - 42.0, weight);
        return;
    }

    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if length > 0.0 {
        (dx / length, dy / length)
    } else {
        (0.0, 0.0)
    };
    // Overlapping circles get a centre-to-centre line instead of a trimmed one
    let trim = if length > 2.0 * NODE_RADIUS { NODE_RADIUS } else { 0.0 };
    let start = (from.0 + ux * trim, from.1 + uy * trim);
    let end = (to.0 - ux * trim, to.1 - uy * trim);

    let _ = writeln!(
        svg,
        concat!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" "#,
            r##"stroke="#555" marker-end="url(#arrow)"/>"##
        ),
        start.0,
        start.1,
        end.0,
        end.1
    );

    // Offset the label to the right of the direction of travel so a ⇄ b
    // pairs do not print on top of each other
    let mid = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
    write_weight_label(svg, mid.0 - uy * 10.0, mid.1 + ux * 10.0, weight);
}

fn write_weight_label(svg: &mut String, x: f64, y: f64, weight: u64) {
    let _ = writeln!(
        svg,
        concat!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle" "#,
            r##"fill="#222" font-family="sans-serif">{}</text>"##
        ),
        x, y, weight
    );
}

fn write_legend(svg: &mut String, width: f64) {
    let x = width - 150.0;
    let mut y = 30.0;
    for category in SyscallCategory::ALL {
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="7" fill="{}"/>"#,
            x,
            y,
            category_color(category)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="13" font-family="sans-serif">{}</text>"#,
            x + 14.0,
            y + 4.0,
            category.label()
        );
        y += 22.0;
    }
}

/// Render and write the plot next to the trace file
///
/// Returns the path written.
pub fn write_plot(graph: &FeatureGraph, input: &Path, filtered: bool) -> Result<PathBuf> {
    let output = plot_path(input, filtered);
    fs::write(&output, render_svg(graph))
        .with_context(|| format!("Failed to write plot: {}", output.display()))?;
    tracing::info!(path = %output.display(), "wrote graph plot");
    Ok(output)
}
