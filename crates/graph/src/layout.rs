use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::relation_graph::RelationGraph;

/// Minimum distance used in force terms, keeps coincident nodes finite.
const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    pub seed: u64,
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            iterations: 50,
        }
    }
}

/// Fruchterman-Reingold spring layout. Returns one position per node, in
/// node order, scaled into the unit square.
pub fn spring_layout(graph: &RelationGraph, config: &LayoutConfig) -> Vec<(f64, f64)> {
    let n = graph.node_count();
    match n {
        0 => return Vec::new(),
        1 => return vec![(0.5, 0.5)],
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();

    let springs = undirected_pairs(graph);
    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![(0.0, 0.0); n];

        // Repulsion between every pair
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / dist;
                disp[i].0 += dx / dist * force;
                disp[i].1 += dy / dist * force;
            }
        }

        // Attraction along edges
        for &(a, b) in &springs {
            let (dx, dy) = (pos[a].0 - pos[b].0, pos[a].1 - pos[b].1);
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let force = dist * dist / k;
            disp[a].0 -= dx / dist * force;
            disp[a].1 -= dy / dist * force;
            disp[b].0 += dx / dist * force;
            disp[b].1 += dy / dist * force;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let length = (d.0 * d.0 + d.1 * d.1).sqrt().max(MIN_DISTANCE);
            let step = length.min(temperature);
            p.0 += d.0 / length * step;
            p.1 += d.1 / length * step;
        }

        temperature -= cooling;
    }

    rescale(pos)
}

fn undirected_pairs(graph: &RelationGraph) -> Vec<(usize, usize)> {
    let mut seen = HashSet::new();
    graph
        .inner()
        .edge_indices()
        .filter_map(|edge| graph.inner().edge_endpoints(edge))
        .map(|(a, b)| (a.index().min(b.index()), a.index().max(b.index())))
        .filter(|&(a, b)| a != b && seen.insert((a, b)))
        .collect()
}

fn rescale(pos: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let (min_x, max_x) = bounds(pos.iter().map(|p| p.0));
    let (min_y, max_y) = bounds(pos.iter().map(|p| p.1));

    let scale = |v: f64, min: f64, max: f64| {
        if max - min < f64::EPSILON {
            0.5
        } else {
            (v - min) / (max - min)
        }
    };

    pos.into_iter()
        .map(|(x, y)| (scale(x, min_x, max_x), scale(y, min_y, max_y)))
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
