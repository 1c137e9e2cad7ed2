//! Default placement for components that have no coordinates yet.
//!
//! Components are laid out on a fixed-column grid indexed by their position
//! in the design's component sequence. Placement is written back into the
//! component, so it is decided once and then owned by drag interaction.

use crate::model::{Component, Position};

/// Fixed bounding-box size of every component on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

impl Default for NodeSize {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 60.0,
        }
    }
}

/// The grid used for default placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 5,
            cell_width: 150.0,
            cell_height: 100.0,
            origin_x: 40.0,
            origin_y: 40.0,
        }
    }
}

impl GridLayout {
    /// Top-left corner of the `index`-th cell, row-major.
    pub fn slot(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let col = index % columns;
        let row = index / columns;
        Position::new(
            self.origin_x + col as f64 * self.cell_width,
            self.origin_y + row as f64 * self.cell_height,
        )
    }
}

/// Give every unplaced component its grid slot. Already placed components
/// keep their coordinates. Returns how many components were placed.
pub fn assign_default_positions(components: &mut [Component], grid: &GridLayout) -> usize {
    let mut placed = 0;
    for (index, component) in components.iter_mut().enumerate() {
        if component.position.is_none() {
            let slot = grid.slot(index);
            log::trace!("place {} `{}` at ({}, {})", component.id, component.name, slot.x, slot.y);
            component.position = Some(slot);
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ComponentId;
    use crate::model::ComponentType;
    use pretty_assertions::assert_eq;

    fn comp(raw: u64) -> Component {
        Component::new(ComponentId::from_raw(raw), format!("c{raw}"), ComponentType::Lambda)
    }

    #[test]
    fn grid_wraps_after_five_columns() {
        let grid = GridLayout::default();
        assert_eq!(grid.slot(0), Position::new(40.0, 40.0));
        assert_eq!(grid.slot(4), Position::new(640.0, 40.0));
        assert_eq!(grid.slot(5), Position::new(40.0, 140.0));
        assert_eq!(grid.slot(7), Position::new(340.0, 140.0));
    }

    #[test]
    fn placement_only_touches_unplaced_components() {
        let mut components = vec![comp(0).at(500.0, 500.0), comp(1), comp(2)];
        let placed = assign_default_positions(&mut components, &GridLayout::default());
        assert_eq!(placed, 2);
        assert_eq!(components[0].position, Some(Position::new(500.0, 500.0)));
        assert_eq!(components[1].position, Some(Position::new(190.0, 40.0)));
        assert_eq!(components[2].position, Some(Position::new(340.0, 40.0)));
    }

    #[test]
    fn placement_is_stable_across_reorders() {
        let mut components = vec![comp(0), comp(1)];
        assign_default_positions(&mut components, &GridLayout::default());
        let second = components[1].position;

        components.remove(0);
        assert_eq!(assign_default_positions(&mut components, &GridLayout::default()), 0);
        assert_eq!(components[0].position, second);
    }
}
