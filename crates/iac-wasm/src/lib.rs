//! WASM bridge for the IaC Designer. Exposes the editor to the browser.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the canvas
//! element, the palette, the properties form, and all network calls; this
//! crate owns the design and turns DOM events into edits.
//!
//! Event handlers return `true` when the canvas needs repainting. Anything
//! the page has to show (prompts, errors, delete confirmations) is pulled
//! with `take_notices`.

mod render2d;

use iac_core::{ComponentType, DesignRecord, emit_mermaid};
use iac_editor::{Editor, EditorConfig, InputEvent, Modifiers, PointerButton, PropertiesPanel};
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct DesignCanvas {
    editor: Editor,
    width: f64,
    height: f64,
    dark_mode: bool,
}

#[wasm_bindgen]
impl DesignCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::new(EditorConfig::default()),
            width,
            height,
            dark_mode: false,
        }
    }

    // ─── Design I/O ──────────────────────────────────────────────────────

    /// Replace the open design with a record from the API.
    /// Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn load_json(&mut self, json: &str) -> String {
        match serde_json::from_str::<DesignRecord>(json) {
            Ok(record) => {
                self.editor.load_record(record);
                ok()
            }
            Err(e) => error(format!("Invalid design: {e}")),
        }
    }

    /// Start a new unsaved design.
    pub fn create(&mut self, name: &str) {
        self.editor.create(name);
    }

    /// The open design as the API expects it in a `PUT`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.editor.to_record()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    /// Call after the page's save request succeeded.
    pub fn mark_saved(&mut self) {
        self.editor.mark_saved();
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            render2d::CanvasTheme::dark()
        } else {
            render2d::CanvasTheme::light()
        };
        render2d::render_scene(ctx, self.editor.scene(), self.width, self.height, &theme);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f64, y: f64, secondary: bool) -> bool {
        let button = if secondary {
            PointerButton::Secondary
        } else {
            PointerButton::Primary
        };
        self.editor
            .dispatch(&InputEvent::PointerDown { x, y, button })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.editor.dispatch(&InputEvent::PointerMove { x, y })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.editor.dispatch(&InputEvent::PointerUp { x, y })
    }

    /// Right-click. The page should suppress the browser menu.
    pub fn handle_context_menu(&mut self, x: f64, y: f64) -> bool {
        self.editor.dispatch(&InputEvent::ContextMenu { x, y })
    }

    /// A palette item dropped on the canvas. `token` is the component type.
    pub fn handle_drop(&mut self, x: f64, y: f64, token: &str) -> bool {
        self.editor.dispatch(&InputEvent::Drop {
            x,
            y,
            token: token.to_string(),
        })
    }

    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        self.editor.dispatch(&InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    /// Answer the last delete confirmation.
    pub fn confirm(&mut self, accepted: bool) -> bool {
        self.editor.dispatch(&InputEvent::Confirm { accepted })
    }

    // ─── Host outputs ────────────────────────────────────────────────────

    /// Queued messages as a JSON array of `{"kind":..., "text":...}`.
    pub fn take_notices(&mut self) -> String {
        serde_json::to_string(&self.editor.take_notices()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Whether the user pressed the save shortcut since the last call.
    pub fn take_save_request(&mut self) -> bool {
        self.editor.take_save_request()
    }

    /// The properties form for the current selection as JSON. Returns
    /// `{"panel":"empty"}` when nothing is selected.
    pub fn get_properties(&self) -> String {
        serde_json::to_string(self.editor.panel()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Commit an edited properties form (same shape as `get_properties`).
    pub fn commit_properties(&mut self, json: &str) -> String {
        let form: PropertiesPanel = match serde_json::from_str(json) {
            Ok(form) => form,
            Err(e) => return error(format!("Invalid form: {e}")),
        };
        match self.editor.commit_properties(&form) {
            Ok(changed) => json!({ "ok": true, "changed": changed }).to_string(),
            Err(e) => error(e.to_string()),
        }
    }

    /// Structural findings for the open design as a JSON array.
    pub fn get_diagnostics(&self) -> String {
        serde_json::to_string(&self.editor.diagnostics()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn connect_mode(&self) -> bool {
        self.editor.interaction().connect_mode()
    }
}

fn ok() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error(message: String) -> String {
    json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("IaC Designer WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone helpers (no canvas needed) ───────────────────────────────

/// Palette entries with their defaults, as JSON for building the sidebar.
#[wasm_bindgen]
pub fn palette() -> String {
    let items: Vec<serde_json::Value> = ComponentType::BUILTIN
        .iter()
        .map(|kind| {
            json!({
                "type": kind.as_str(),
                "domain_type": kind.default_domain(),
                "technology": kind.default_technology(),
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// Offline Mermaid preview of a design record.
/// Returns `{"ok":true,"code":"..."}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn to_mermaid(json: &str) -> String {
    match serde_json::from_str::<DesignRecord>(json) {
        Ok(record) => json!({ "ok": true, "code": emit_mermaid(&record) }).to_string(),
        Err(e) => error(format!("Invalid design: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    #[test]
    fn palette_lists_builtin_types_with_defaults() {
        let items: Value = serde_json::from_str(&palette()).unwrap();
        assert_eq!(items.as_array().unwrap().len(), 6);
        assert_eq!(items[3]["type"], "Cache");
        assert_eq!(items[3]["domain_type"], "Data");
        assert_eq!(items[3]["technology"], "Redis");
    }

    #[test]
    fn properties_round_trip_through_json() {
        let mut canvas = DesignCanvas::new(800.0, 600.0);
        canvas.create("wasm");
        assert!(canvas.handle_drop(0.0, 0.0, "Lambda"));
        canvas.handle_pointer_down(10.0, 10.0, false);
        canvas.handle_pointer_up(10.0, 10.0);

        let mut form: Value = serde_json::from_str(&canvas.get_properties()).unwrap();
        assert_eq!(form["panel"], "component");
        assert_eq!(form["kind"], "Lambda");
        form["technology"] = "Cloud Run".into();
        let reply: Value =
            serde_json::from_str(&canvas.commit_properties(&form.to_string())).unwrap();
        assert_eq!(reply, json!({ "ok": true, "changed": true }));

        let record: Value = serde_json::from_str(&canvas.to_json()).unwrap();
        assert_eq!(record["components"][0]["technology"], "Cloud Run");
    }

    #[test]
    fn bad_input_is_reported_not_panicked() {
        let mut canvas = DesignCanvas::new(800.0, 600.0);
        let reply: Value = serde_json::from_str(&canvas.load_json("{not json")).unwrap();
        assert_eq!(reply["ok"], false);
        let reply: Value = serde_json::from_str(&to_mermaid("[]")).unwrap();
        assert_eq!(reply["ok"], false);
    }
}
