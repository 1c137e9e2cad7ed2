//! Interaction controller: the gesture state machine.
//!
//! Translates `InputEvent`s into `Effect`s for the editor to apply. The
//! controller reads the store but never writes it, so every change to the
//! design is visible as a `DesignMutation` in one place.
//!
//! ## Gestures
//!
//! | Mode | Pointer down on component | Pointer down on connector | Pointer down on canvas |
//! |------|---------------------------|---------------------------|------------------------|
//! | **Normal** | select + begin drag | select | clear selection |
//! | **Connect** | pick source, then destination | - | - |
//!
//! A context-menu request on empty canvas toggles connect-mode. Dragging is
//! suspended while connect-mode is on.

use crate::input::{InputEvent, PointerButton};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::store::{DesignMutation, DesignStore};
use iac_core::{ComponentId, ComponentType, Connection, Position, Selection};
use iac_render::Hit;
use serde::Serialize;

/// A user-visible message for the host to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Notice {
    Info(String),
    /// Asks the user to do something next (e.g. pick a destination).
    Prompt(String),
    Error(String),
    /// Asks the user to confirm deleting the named component. Answer with
    /// `InputEvent::Confirm`.
    ConfirmDelete(String),
}

/// What the controller wants done in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Mutate(DesignMutation),
    Select(Option<Selection>),
    Notify(Notice),
    /// The user asked to save; persistence belongs to the host.
    RequestSave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Dragging a component. The grab offset keeps the point under the
    /// cursor fixed relative to the box.
    Dragging {
        id: ComponentId,
        grab_dx: f64,
        grab_dy: f64,
    },
}

pub struct Interaction {
    gesture: Gesture,
    connect_mode: bool,
    /// First endpoint of a connect gesture.
    pending_source: Option<ComponentId>,
    /// Component waiting on a delete confirmation.
    pending_delete: Option<ComponentId>,
    /// Last number used for a palette-created name. Never goes back.
    name_counter: u64,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            connect_mode: false,
            pending_source: None,
            pending_delete: None,
            name_counter: 0,
        }
    }

    pub fn connect_mode(&self) -> bool {
        self.connect_mode
    }

    pub fn pending_source(&self) -> Option<ComponentId> {
        self.pending_source
    }

    pub fn pending_delete(&self) -> Option<ComponentId> {
        self.pending_delete
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    /// Drop any in-flight gesture state. Called when the design is replaced.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.connect_mode = false;
        self.pending_source = None;
        self.pending_delete = None;
    }

    /// Handle one event. `hit` is what the event's position landed on in
    /// the current scene, if it has a position.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<Hit>,
        store: &DesignStore,
    ) -> Vec<Effect> {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Primary,
            } => {
                if self.connect_mode {
                    self.connect_click(hit, store)
                } else {
                    self.select_click(*x, *y, hit, store)
                }
            }
            InputEvent::PointerDown { .. } => vec![],
            InputEvent::PointerMove { x, y } => match self.gesture {
                Gesture::Dragging { id, grab_dx, grab_dy } if !self.connect_mode => {
                    vec![Effect::Mutate(DesignMutation::MoveComponent {
                        id,
                        x: x - grab_dx,
                        y: y - grab_dy,
                    })]
                }
                _ => vec![],
            },
            InputEvent::PointerUp { .. } => {
                self.gesture = Gesture::Idle;
                vec![]
            }
            InputEvent::ContextMenu { .. } => {
                if hit.is_none() {
                    self.toggle_connect_mode()
                } else {
                    vec![]
                }
            }
            InputEvent::Drop { x, y, token } => self.drop_from_palette(*x, *y, token, store),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.shortcut(action, store),
                None => vec![],
            },
            InputEvent::Confirm { accepted } => self.confirm(*accepted, store),
        }
    }

    // ─── Normal mode ─────────────────────────────────────────────────────

    fn select_click(&mut self, x: f64, y: f64, hit: Option<Hit>, store: &DesignStore) -> Vec<Effect> {
        let selection = match hit {
            Some(Hit::Component(id)) => {
                let origin = store
                    .component(id)
                    .and_then(|c| c.position)
                    .unwrap_or(Position::new(x, y));
                self.gesture = Gesture::Dragging {
                    id,
                    grab_dx: x - origin.x,
                    grab_dy: y - origin.y,
                };
                Some(Selection::Component(id))
            }
            Some(Hit::Connection(index)) => Some(Selection::Connection(index)),
            None => None,
        };
        // A delete prompt only stands while its component stays selected.
        if self
            .pending_delete
            .is_some_and(|id| selection != Some(Selection::Component(id)))
        {
            self.pending_delete = None;
        }
        vec![Effect::Select(selection)]
    }

    // ─── Connect mode ────────────────────────────────────────────────────

    fn toggle_connect_mode(&mut self) -> Vec<Effect> {
        self.connect_mode = !self.connect_mode;
        self.pending_source = None;
        self.pending_delete = None;
        self.gesture = Gesture::Idle;
        let text = if self.connect_mode {
            "Connect mode: click the source component, then the destination."
        } else {
            "Connect mode off."
        };
        log::debug!("connect mode {}", if self.connect_mode { "on" } else { "off" });
        vec![Effect::Notify(Notice::Info(text.to_string()))]
    }

    fn connect_click(&mut self, hit: Option<Hit>, store: &DesignStore) -> Vec<Effect> {
        let Some(Hit::Component(id)) = hit else {
            return vec![];
        };
        let Some(clicked) = store.component(id) else {
            return vec![];
        };

        let Some(source_id) = self.pending_source.take() else {
            self.pending_source = Some(id);
            return vec![Effect::Notify(Notice::Prompt(format!(
                "Now click the destination for a connection from `{}`.",
                clicked.name
            )))];
        };

        if source_id == id {
            log::warn!("rejected self-connection on {id}");
            return vec![Effect::Notify(Notice::Error(
                "Cannot connect a component to itself.".to_string(),
            ))];
        }

        let Some(source) = store.component(source_id) else {
            // Source vanished between the two clicks; start over from here.
            self.pending_source = Some(id);
            return vec![];
        };
        self.connect_mode = false;
        vec![Effect::Mutate(DesignMutation::AddConnection {
            source: source_id,
            destination: id,
            label: Connection::default_label(&source.name, &clicked.name),
            technology: String::new(),
        })]
    }

    // ─── Palette ─────────────────────────────────────────────────────────

    fn drop_from_palette(&mut self, x: f64, y: f64, token: &str, store: &DesignStore) -> Vec<Effect> {
        let token = token.trim();
        if token.is_empty() {
            return vec![];
        }
        let kind = ComponentType::parse(token);
        let name = self.next_name(&kind, store);
        vec![Effect::Mutate(DesignMutation::AddComponent {
            name,
            kind,
            position: Some(Position::new(x, y)),
        })]
    }

    /// `"<Type> <N>"` with the next unused N. N is shared across types and
    /// skips numbers whose name is already taken.
    fn next_name(&mut self, kind: &ComponentType, store: &DesignStore) -> String {
        loop {
            self.name_counter += 1;
            let name = format!("{kind} {}", self.name_counter);
            if store.component_by_name(&name).is_none() {
                return name;
            }
        }
    }

    // ─── Keyboard & dialogs ──────────────────────────────────────────────

    fn shortcut(&mut self, action: ShortcutAction, store: &DesignStore) -> Vec<Effect> {
        match action {
            ShortcutAction::Delete => match store.selection() {
                Some(Selection::Component(id)) => match store.component(id) {
                    Some(c) => {
                        self.pending_delete = Some(id);
                        vec![Effect::Notify(Notice::ConfirmDelete(c.name.clone()))]
                    }
                    None => vec![],
                },
                Some(Selection::Connection(index)) => {
                    vec![Effect::Mutate(DesignMutation::RemoveConnection { index })]
                }
                None => vec![],
            },
            ShortcutAction::ToggleConnectMode => self.toggle_connect_mode(),
            ShortcutAction::Cancel => {
                if self.connect_mode {
                    self.toggle_connect_mode()
                } else if self.pending_delete.take().is_some() {
                    vec![]
                } else {
                    vec![Effect::Select(None)]
                }
            }
            ShortcutAction::Save => vec![Effect::RequestSave],
        }
    }

    fn confirm(&mut self, accepted: bool, store: &DesignStore) -> Vec<Effect> {
        let Some(id) = self.pending_delete.take() else {
            return vec![];
        };
        if !accepted || store.component(id).is_none() {
            return vec![];
        }
        if self.pending_source == Some(id) {
            self.pending_source = None;
        }
        if matches!(self.gesture, Gesture::Dragging { id: dragged, .. } if dragged == id) {
            self.gesture = Gesture::Idle;
        }
        vec![
            Effect::Mutate(DesignMutation::RemoveComponent { id }),
            Effect::Select(None),
        ]
    }
}
