//! Editor settings.

use iac_core::{GridLayout, NodeSize};
use iac_render::RenderOptions;
use serde::{Deserialize, Serialize};

/// What happens to a component's connections when it is renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePolicy {
    /// Connections follow the component; the saved record carries the new name.
    #[default]
    Follow,
    /// Legacy behavior: connections keep the old name and drop out of the
    /// canvas until a component with that name exists again.
    Detach,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub grid: GridLayout,
    pub node_size: NodeSize,
    /// Max distance in canvas units at which a click still selects a connector.
    pub hit_tolerance: f64,
    pub rename_policy: RenamePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid: GridLayout::default(),
            node_size: NodeSize::default(),
            hit_tolerance: 6.0,
            rename_policy: RenamePolicy::Follow,
        }
    }
}

impl EditorConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            node_size: self.node_size,
            grid: self.grid,
        }
    }
}
