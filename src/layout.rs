//! Force-directed layout used after bulk imports.
//!
//! Simple physics relaxation:
//! - Repulsion between all nodes (to prevent overlap)
//! - Attraction along edges (to keep connected nodes together)
//! - The result is re-centered on the pre-layout centroid so the graph does not drift

use crate::constants::{LAYOUT_ATTRACTION, LAYOUT_DAMPING, LAYOUT_ITERATIONS, LAYOUT_REPULSION};
use crate::types::{Edge, Node};
use std::collections::HashMap;

/// Extra space between node bounds so edges stay visible.
const SPACING_BUFFER: f32 = 10.0;

/// Angle in radians between successive tie-break directions.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Minimum distance between the centers of `a` and `b` before they count as overlapping.
fn min_distance(a: &Node, b: &Node) -> f32 {
    let width = (a.size.width + b.size.width) / 2.0;
    let height = (a.size.height + b.size.height) / 2.0;
    (width * width + height * height).sqrt() + SPACING_BUFFER * 2.0
}

/// Fixed direction used to push apart two nodes that share a position.
fn tie_break(i: usize, j: usize) -> (f32, f32) {
    let angle = (i * 31 + j) as f32 * GOLDEN_ANGLE;
    (angle.cos(), angle.sin())
}

fn centroid(nodes: &[Node]) -> (f32, f32) {
    let count = nodes.len() as f32;
    let (sx, sy) = nodes
        .iter()
        .fold((0.0, 0.0), |(x, y), n| (x + n.position.x, y + n.position.y));
    (sx / count, sy / count)
}

/// Relaxes node positions in place.
///
/// Edges whose endpoints are not in `nodes` are ignored.
pub fn force_directed(nodes: &mut [Node], edges: &[Edge]) {
    if nodes.len() < 2 {
        return;
    }

    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let springs: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|e| Some((*index.get(e.source.as_str())?, *index.get(e.target.as_str())?)))
        .filter(|(a, b)| a != b)
        .collect();

    let (start_x, start_y) = centroid(nodes);
    let mut velocities = vec![(0.0_f32, 0.0_f32); nodes.len()];

    for _ in 0..LAYOUT_ITERATIONS {
        let mut forces = vec![(0.0_f32, 0.0_f32); nodes.len()];

        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let mut dx = nodes[i].position.x - nodes[j].position.x;
                let mut dy = nodes[i].position.y - nodes[j].position.y;
                if dx == 0.0 && dy == 0.0 {
                    (dx, dy) = tie_break(i, j);
                }
                let distance = (dx * dx + dy * dy).sqrt().max(1.0);

                // Push twice as hard while overlapping
                let mut magnitude = LAYOUT_REPULSION / (distance * distance);
                if distance < min_distance(&nodes[i], &nodes[j]) {
                    magnitude *= 2.0;
                }

                let fx = (dx / distance) * magnitude;
                let fy = (dy / distance) * magnitude;
                forces[i].0 += fx;
                forces[i].1 += fy;
                forces[j].0 -= fx;
                forces[j].1 -= fy;
            }
        }

        for &(from, to) in &springs {
            let dx = nodes[to].position.x - nodes[from].position.x;
            let dy = nodes[to].position.y - nodes[from].position.y;
            let distance = (dx * dx + dy * dy).sqrt().max(1.0);

            let ideal = min_distance(&nodes[from], &nodes[to]) * 1.5;
            let displacement = distance - ideal;
            let fx = (dx / distance) * displacement * LAYOUT_ATTRACTION;
            let fy = (dy / distance) * displacement * LAYOUT_ATTRACTION;
            forces[from].0 += fx;
            forces[from].1 += fy;
            forces[to].0 -= fx;
            forces[to].1 -= fy;
        }

        for (i, node) in nodes.iter_mut().enumerate() {
            let velocity = &mut velocities[i];
            velocity.0 = (velocity.0 + forces[i].0) * LAYOUT_DAMPING;
            velocity.1 = (velocity.1 + forces[i].1) * LAYOUT_DAMPING;
            node.position.x += velocity.0;
            node.position.y += velocity.1;
        }
    }

    let (end_x, end_y) = centroid(nodes);
    for node in nodes.iter_mut() {
        node.position.x += start_x - end_x;
        node.position.y += start_y - end_y;
    }
    log::debug!("force-directed layout placed {} nodes", nodes.len());
}
