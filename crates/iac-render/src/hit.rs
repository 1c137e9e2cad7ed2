//! Hit testing: point → component or connection.
//!
//! Boxes win over connectors. Boxes are checked in reverse paint order
//! (last painted = topmost); connectors are hit within a tolerance band
//! around the segment.

use crate::scene::Scene;
use iac_core::ComponentId;
use kurbo::{ParamCurveNearest, Point};

/// What a pointer position landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Component(ComponentId),
    /// Index into the design's connection list.
    Connection(usize),
}

/// Find the topmost item at `(px, py)`. Returns `None` for empty canvas.
pub fn hit_test(scene: &Scene, px: f64, py: f64, tolerance: f64) -> Option<Hit> {
    let p = Point::new(px, py);

    if let Some(node) = scene.nodes.iter().rev().find(|n| n.rect.contains(p)) {
        return Some(Hit::Component(node.id));
    }

    let max_sq = tolerance * tolerance;
    scene
        .edges
        .iter()
        .rev()
        .find(|e| e.line.nearest(p, 1e-6).distance_sq <= max_sq)
        .map(|e| Hit::Connection(e.index))
}
