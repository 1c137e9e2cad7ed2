//! Design → scene projection.
//!
//! `render` is a pure function of the component and connection lists plus a
//! small overlay (selection, pending connect source). It owns no state and
//! may be called as often as the editor likes; the same inputs always give
//! the same scene.
//!
//! Connection endpoints are resolved against the component list on every
//! call: linked ends by id, dangling ends by name. A connection with an end
//! that does not resolve is left out of the scene, never reported.

use iac_core::{
    Component, ComponentId, Connection, DomainType, Endpoint, GridLayout, NodeSize, Selection,
};
use kurbo::{Line, Point, Rect, Size};
use std::collections::HashMap;

/// Geometry settings for projection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderOptions {
    pub node_size: NodeSize,
    /// Fallback placement for components that were never placed.
    pub grid: GridLayout,
}

/// Transient interaction state drawn on top of the design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlay {
    pub selection: Option<Selection>,
    pub connect_mode: bool,
    pub pending_source: Option<ComponentId>,
}

/// A component box.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub id: ComponentId,
    pub name: String,
    pub kind: String,
    pub domain: DomainType,
    pub technology: String,
    pub rect: Rect,
    pub selected: bool,
    /// First endpoint of an in-progress connect gesture.
    pub pending_source: bool,
}

/// A straight connector between two box centers.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeShape {
    /// Position of the connection in the design's connection list.
    pub index: usize,
    pub source: ComponentId,
    pub destination: ComponentId,
    pub line: Line,
    pub label: String,
    pub label_at: Point,
    pub selected: bool,
}

/// Everything the canvas needs to draw one frame. Nodes are in paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeShape>,
    pub edges: Vec<EdgeShape>,
    pub connect_mode: bool,
}

impl Scene {
    pub fn node(&self, id: ComponentId) -> Option<&NodeShape> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, index: usize) -> Option<&EdgeShape> {
        self.edges.iter().find(|e| e.index == index)
    }
}

/// Project the design into a scene.
pub fn render(
    components: &[Component],
    connections: &[Connection],
    overlay: &Overlay,
    options: &RenderOptions,
) -> Scene {
    let size = Size::new(options.node_size.width, options.node_size.height);

    let nodes: Vec<NodeShape> = components
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let pos = c.position.unwrap_or_else(|| options.grid.slot(i));
            NodeShape {
                id: c.id,
                name: c.name.clone(),
                kind: c.kind.to_string(),
                domain: c.domain_type,
                technology: c.technology.clone(),
                rect: Rect::from_origin_size(Point::new(pos.x, pos.y), size),
                selected: overlay.selection == Some(Selection::Component(c.id)),
                pending_source: overlay.pending_source == Some(c.id),
            }
        })
        .collect();

    let by_id: HashMap<ComponentId, usize> =
        nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    for (i, n) in nodes.iter().enumerate() {
        by_name.entry(n.name.as_str()).or_insert(i);
    }
    let resolve = |end: &Endpoint| match end {
        Endpoint::Linked(id) => by_id.get(id).copied(),
        Endpoint::Dangling(name) => by_name.get(name.as_str()).copied(),
    };

    let mut edges = Vec::with_capacity(connections.len());
    for (index, conn) in connections.iter().enumerate() {
        let (Some(s), Some(d)) = (resolve(&conn.source), resolve(&conn.destination)) else {
            log::trace!("connection {index} has an unresolved end; not drawn");
            continue;
        };
        if s == d {
            continue;
        }
        let from = nodes[s].rect.center();
        let to = nodes[d].rect.center();
        edges.push(EdgeShape {
            index,
            source: nodes[s].id,
            destination: nodes[d].id,
            line: Line::new(from, to),
            label: conn.label.clone(),
            label_at: from.midpoint(to),
            selected: overlay.selection == Some(Selection::Connection(index)),
        });
    }

    Scene {
        nodes,
        edges,
        connect_mode: overlay.connect_mode,
    }
}
