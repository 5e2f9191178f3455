use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::layout::{LayoutConfig, spring_layout};
use crate::relation_graph::RelationGraph;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const ARROW_LENGTH: f64 = 12.0;
const ARROW_ANGLE: f64 = 0.45;

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub node_radius: i32,
    pub font_size: u32,
    pub layout: LayoutConfig,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            node_radius: 28,
            font_size: 14,
            layout: LayoutConfig::default(),
        }
    }
}

/// Render the graph to `path`. SVG when the extension is `.svg`, PNG otherwise.
pub fn render_graph(graph: &RelationGraph, path: &Path, options: &PlotOptions) -> Result<()> {
    if graph.is_empty() {
        warn!("Rendering an empty relation graph");
    }

    let size = (options.width, options.height);
    let is_svg = path.extension().and_then(|e| e.to_str()) == Some("svg");

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_graph(&root, graph, options)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_graph(&root, graph, options)?;
    }

    info!(path = ?path, nodes = graph.node_count(), edges = graph.edge_count(), "Saved graph plot");
    Ok(())
}

fn draw_graph<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    graph: &RelationGraph,
    options: &PlotOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let radius = options.node_radius;
    let margin = radius + 24;
    let usable_w = (options.width as i32 - 2 * margin).max(1) as f64;
    let usable_h = (options.height as i32 - 2 * margin).max(1) as f64;

    let points: Vec<(i32, i32)> = spring_layout(graph, &options.layout)
        .into_iter()
        .map(|(x, y)| (margin + (x * usable_w) as i32, margin + (y * usable_h) as i32))
        .collect();

    let centered = Pos::new(HPos::Center, VPos::Center);
    let font_size = options.font_size as f64;
    let node_style = FontDesc::new(FontFamily::SansSerif, font_size, FontStyle::Bold)
        .color(&BLACK)
        .pos(centered);
    let label_size = (font_size - 2.0).max(8.0);
    let label_style = FontDesc::new(FontFamily::SansSerif, label_size, FontStyle::Normal)
        .color(&RED)
        .pos(centered);
    let label_gap = label_size + 4.0;

    let inner = graph.inner();
    let slots = label_slots(graph);
    for edge in inner.edge_indices() {
        let Some((a, b)) = inner.edge_endpoints(edge) else {
            continue;
        };
        let label = inner[edge].as_str();
        let slot = slots[edge.index()];
        let (from, to) = (points[a.index()], points[b.index()]);

        if a == b {
            let top = (from.0, from.1 - radius);
            root.draw(&Circle::new(top, radius / 2, BLACK.stroke_width(1)))?;
            let above = offset(top, 0.0, -1.0, radius as f64 + slot as f64 * label_gap);
            root.draw(&Text::new(label, above, label_style.clone()))?;
            continue;
        }

        let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
        let length = (dx * dx + dy * dy).sqrt().max(1.0);
        let (ux, uy) = (dx / length, dy / length);

        // Clip the line to the node circles so the arrowhead stays visible
        let start = offset(from, ux, uy, radius as f64);
        let end = offset(to, ux, uy, -(radius as f64));
        root.draw(&PathElement::new(vec![start, end], BLACK.stroke_width(1)))?;

        for side in [ARROW_ANGLE, -ARROW_ANGLE] {
            let (sin, cos) = side.sin_cos();
            let (bx, by) = (-(ux * cos - uy * sin), -(ux * sin + uy * cos));
            let barb = offset(end, bx, by, ARROW_LENGTH);
            root.draw(&PathElement::new(vec![end, barb], BLACK.stroke_width(1)))?;
        }

        // Normal taken on the lower-index to higher-index direction, so a->b and
        // b->a labels share one axis and their slots never coincide
        let (nx, ny) = if a.index() < b.index() { (-uy, ux) } else { (uy, -ux) };
        let mid = ((start.0 + end.0) / 2, (start.1 + end.1) / 2);
        let at = offset(mid, nx, ny, slot_shift(slot) * label_gap);
        root.draw(&Text::new(label, at, label_style.clone()))?;
    }

    for (idx, name) in graph.nodes().enumerate() {
        let center = points[idx];
        root.draw(&Circle::new(center, radius, SKY_BLUE.filled()))?;
        root.draw(&Text::new(name, center, node_style.clone()))?;
    }

    root.present()?;
    Ok(())
}

/// Position of each edge, by edge index, among the edges joining the same
/// pair of nodes in either direction.
fn label_slots(graph: &RelationGraph) -> Vec<usize> {
    let inner = graph.inner();
    let mut seen: HashMap<(usize, usize), usize> = HashMap::new();
    let mut slots = vec![0; inner.edge_count()];
    for edge in inner.edge_indices() {
        let Some((a, b)) = inner.edge_endpoints(edge) else {
            continue;
        };
        let key = (a.index().min(b.index()), a.index().max(b.index()));
        let count = seen.entry(key).or_insert(0);
        slots[edge.index()] = *count;
        *count += 1;
    }
    slots
}

/// Signed distance, in label heights, from the edge midpoint: 0, +1, -1, +2, -2, ...
fn slot_shift(slot: usize) -> f64 {
    let step = slot.div_ceil(2) as f64;
    if slot % 2 == 1 { step } else { -step }
}

fn offset(point: (i32, i32), ux: f64, uy: f64, distance: f64) -> (i32, i32) {
    (
        point.0 + (ux * distance).round() as i32,
        point.1 + (uy * distance).round() as i32,
    )
}
