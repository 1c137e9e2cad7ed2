//! The editor: one owned context tying store, controller, and projection.
//!
//! Input arrives as typed events on a FIFO queue. Each event runs through
//! the interaction controller, the resulting effects are applied to the
//! store, and only then is the scene re-projected. Projection is explicit
//! and idempotent: `refresh` can be called any number of times.
//!
//! Hosts (the wasm canvas, the CLI replayer, tests) own an `Editor` and
//! pull notices, save requests, and the scene out of it. There is no
//! shared global state, so any number of editors can live side by side.

use crate::config::EditorConfig;
use crate::input::InputEvent;
use crate::interaction::{Effect, Interaction, Notice};
use crate::properties::PropertiesPanel;
use crate::store::{DesignStore, StoreError};
use iac_core::{DesignRecord, Diagnostic, validate_record};
use iac_render::{Hit, Overlay, Scene, render};
use std::collections::VecDeque;

pub struct Editor {
    store: DesignStore,
    interaction: Interaction,
    config: EditorConfig,
    scene: Scene,
    panel: PropertiesPanel,
    queue: VecDeque<InputEvent>,
    notices: Vec<Notice>,
    save_requested: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let mut editor = Self {
            store: DesignStore::new(config.rename_policy),
            interaction: Interaction::new(),
            config,
            scene: Scene::default(),
            panel: PropertiesPanel::Empty,
            queue: VecDeque::new(),
            notices: Vec::new(),
            save_requested: false,
        };
        editor.refresh();
        editor
    }

    // ─── Design lifecycle ────────────────────────────────────────────────

    /// Start a new, empty, unsaved design.
    pub fn create(&mut self, name: &str) {
        self.store.create(name);
        self.reset_transient();
    }

    /// Replace the open design with one from the server.
    pub fn load_record(&mut self, record: DesignRecord) {
        self.store.load(record);
        self.reset_transient();
    }

    /// Snapshot of the open design in wire form.
    pub fn to_record(&self) -> DesignRecord {
        self.store.to_record()
    }

    /// Record a successful save.
    pub fn mark_saved(&mut self) {
        self.store.clear_dirty();
    }

    /// Record a successful save, keeping the server's copy of its own
    /// fields (timestamps) for the next round trip.
    pub fn mark_saved_as(&mut self, saved: DesignRecord) {
        self.store.set_server_fields(saved.extra);
        self.mark_saved();
    }

    fn reset_transient(&mut self) {
        self.interaction.reset();
        self.queue.clear();
        self.panel = PropertiesPanel::Empty;
        self.refresh();
    }

    // ─── Event loop ──────────────────────────────────────────────────────

    pub fn enqueue(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Consume queued events one at a time. Returns whether any of them
    /// changed what is on screen.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.queue.pop_front() {
            changed |= self.dispatch(&event);
        }
        changed
    }

    /// Handle one event now. Returns whether the scene was re-projected.
    pub fn dispatch(&mut self, event: &InputEvent) -> bool {
        let hit = event.position().and_then(|(x, y)| self.hit_test(x, y));
        let overlay_before = self.overlay();

        let effects = self.interaction.handle(event, hit, &self.store);
        let mut changed = false;
        for effect in effects {
            match effect {
                Effect::Mutate(mutation) => match self.store.apply(mutation) {
                    Ok(did_change) => changed |= did_change,
                    Err(err) => {
                        log::warn!("rejected edit: {err}");
                        self.notices.push(Notice::Error(err.to_string()));
                    }
                },
                Effect::Select(selection) => {
                    self.store.select(selection);
                }
                Effect::Notify(notice) => self.notices.push(notice),
                Effect::RequestSave => self.save_requested = true,
            }
        }

        let overlay = self.overlay();
        if overlay.selection != overlay_before.selection {
            self.panel = PropertiesPanel::for_selection(&self.store);
        }
        if changed || overlay != overlay_before {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Re-project the design into the scene. Places unplaced components on
    /// the default grid first so they stay put from then on.
    pub fn refresh(&mut self) {
        let placed = self.store.place_unpositioned(&self.config.grid);
        if placed > 0 {
            log::debug!("placed {placed} component(s) on the default grid");
        }
        self.scene = render(
            self.store.components(),
            self.store.connections(),
            &self.overlay(),
            &self.config.render_options(),
        );
    }

    fn overlay(&self) -> Overlay {
        Overlay {
            selection: self.store.selection(),
            connect_mode: self.interaction.connect_mode(),
            pending_source: self.interaction.pending_source(),
        }
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<Hit> {
        iac_render::hit_test(&self.scene, x, y, self.config.hit_tolerance)
    }

    // ─── Properties ──────────────────────────────────────────────────────

    /// Write an edited form back into the selected entity.
    pub fn commit_properties(&mut self, form: &PropertiesPanel) -> Result<bool, StoreError> {
        let mutation = form.to_mutation(&self.store)?;
        let changed = self.store.apply(mutation)?;
        self.panel = PropertiesPanel::for_selection(&self.store);
        if changed {
            self.refresh();
        }
        Ok(changed)
    }

    // ─── Host outputs ────────────────────────────────────────────────────

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Whether the user asked to save since the last call.
    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.save_requested)
    }

    /// Structural problems in the open design (duplicate names, dangling
    /// connections). Advisory only.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        validate_record(&self.to_record())
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &DesignStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn panel(&self) -> &PropertiesPanel {
        &self.panel
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }
}
