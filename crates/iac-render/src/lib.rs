pub mod hit;
pub mod scene;

pub use hit::{Hit, hit_test};
pub use scene::{EdgeShape, NodeShape, Overlay, RenderOptions, Scene, render};
