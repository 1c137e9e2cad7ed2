pub mod emitter;
pub mod id;
pub mod layout;
pub mod model;
pub mod validate;

pub use emitter::emit_mermaid;
pub use id::{ComponentId, IdAllocator};
pub use layout::{GridLayout, NodeSize, assign_default_positions};
pub use model::*;
pub use validate::{Diagnostic, Severity, validate_record};
