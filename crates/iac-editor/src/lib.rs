pub mod config;
pub mod editor;
pub mod input;
pub mod interaction;
pub mod properties;
pub mod shortcuts;
pub mod store;

pub use config::{EditorConfig, RenamePolicy};
pub use editor::Editor;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::{Effect, Interaction, Notice};
pub use properties::{ComponentForm, ConnectionForm, PropertiesPanel};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{DesignMutation, DesignStore, StoreError};
