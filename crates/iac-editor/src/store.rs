//! The design store: single owner of the open design.
//!
//! Holds the ordered component and connection lists, the selection, and the
//! dirty flag. Every mutation goes through here and every invariant is
//! checked here:
//!
//! - component names are non-empty and unique;
//! - connections never loop back to their source and only link components
//!   that exist;
//! - deleting a component removes every connection that references it;
//! - a dangling connection end never names an existing component: when a
//!   component takes that name, the end is bound to it;
//! - any deletion clears the selection.
//!
//! Connections point at components by `ComponentId`. Names are resolved only
//! when the store is serialized back into a `DesignRecord`.

use crate::config::RenamePolicy;
use iac_core::{
    Component, ComponentId, ComponentRecord, ComponentType, Connection, ConnectionRecord,
    DesignRecord, DomainType, Endpoint, GridLayout, IdAllocator, Position, Selection,
    assign_default_positions,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

/// A change to the design, produced by the interaction controller or the
/// properties editor.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignMutation {
    AddComponent {
        name: String,
        kind: ComponentType,
        position: Option<Position>,
    },
    /// Absolute placement; applying the same move twice is a no-op.
    MoveComponent { id: ComponentId, x: f64, y: f64 },
    UpdateComponent {
        id: ComponentId,
        name: String,
        domain_type: DomainType,
        technology: String,
    },
    RemoveComponent { id: ComponentId },
    AddConnection {
        source: ComponentId,
        destination: ComponentId,
        label: String,
        technology: String,
    },
    UpdateConnection {
        index: usize,
        label: String,
        technology: String,
    },
    RemoveConnection { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("component name must not be empty")]
    EmptyName,
    #[error("a component named `{0}` already exists")]
    DuplicateName(String),
    #[error("a component cannot be connected to itself")]
    SelfLoop,
    #[error("component {0} does not exist")]
    UnknownComponent(ComponentId),
    #[error("connection {0} does not exist")]
    UnknownConnection(usize),
    #[error("the properties form no longer matches the selection")]
    StaleForm,
}

pub struct DesignStore {
    /// `None` until the server has assigned an identity.
    design_id: Option<String>,
    name: String,
    components: Vec<Component>,
    connections: Vec<Connection>,
    selection: Option<Selection>,
    dirty: bool,
    ids: IdAllocator,
    rename_policy: RenamePolicy,
    /// Server-owned record fields, passed through on save.
    extra: Map<String, Value>,
}

impl DesignStore {
    pub fn new(rename_policy: RenamePolicy) -> Self {
        Self {
            design_id: None,
            name: String::new(),
            components: Vec::new(),
            connections: Vec::new(),
            selection: None,
            dirty: false,
            ids: IdAllocator::new(),
            rename_policy,
            extra: Map::new(),
        }
    }

    /// Start a fresh, unsaved design.
    pub fn create(&mut self, name: &str) {
        self.design_id = None;
        self.name = name.to_string();
        self.extra.clear();
        self.replace_all(Vec::new(), Vec::new());
        self.clear_dirty();
    }

    /// Replace the whole store with a record from the server.
    pub fn load(&mut self, record: DesignRecord) {
        log::debug!(
            "load design {} ({} components, {} connections)",
            record.design_id,
            record.components.len(),
            record.connections.len()
        );
        self.design_id = Some(record.design_id);
        self.name = record.name;
        self.extra = record.extra;
        self.replace_all(record.components, record.connections);
        self.clear_dirty();
    }

    /// Swap in new component and connection lists wholesale.
    ///
    /// Every component gets a fresh id. Connection ends are bound by name;
    /// names that match nothing are kept as dangling ends. Clears the
    /// selection. Does not touch the dirty flag.
    pub fn replace_all(
        &mut self,
        components: Vec<ComponentRecord>,
        connections: Vec<ConnectionRecord>,
    ) {
        self.components = components
            .into_iter()
            .map(|rec| {
                let position = rec.position();
                Component {
                    id: self.ids.allocate(),
                    name: rec.name,
                    kind: rec.kind,
                    domain_type: rec.domain_type,
                    technology: rec.technology,
                    position,
                }
            })
            .collect();

        // First definition wins, matching name lookup everywhere else.
        let mut by_name: HashMap<&str, ComponentId> = HashMap::new();
        for c in &self.components {
            match by_name.entry(c.name.as_str()) {
                Entry::Occupied(_) => {
                    log::warn!("design has more than one component named `{}`", c.name);
                }
                Entry::Vacant(slot) => {
                    slot.insert(c.id);
                }
            }
        }
        let bind = |name: String| match by_name.get(name.as_str()) {
            Some(id) => Endpoint::Linked(*id),
            None => Endpoint::Dangling(name),
        };

        self.connections = connections
            .into_iter()
            .map(|rec| Connection {
                source: bind(rec.source),
                destination: bind(rec.destination),
                label: rec.label,
                technology: rec.technology,
            })
            .collect();
        self.selection = None;
    }

    /// Serialize back into the wire shape, resolving ids to current names.
    pub fn to_record(&self) -> DesignRecord {
        DesignRecord {
            design_id: self.design_id.clone().unwrap_or_default(),
            name: self.name.clone(),
            components: self
                .components
                .iter()
                .map(|c| ComponentRecord {
                    name: c.name.clone(),
                    kind: c.kind.clone(),
                    domain_type: c.domain_type,
                    technology: c.technology.clone(),
                    x: c.position.map(|p| p.x),
                    y: c.position.map(|p| p.y),
                })
                .collect(),
            connections: self
                .connections
                .iter()
                .map(|conn| ConnectionRecord {
                    source: self.endpoint_name(&conn.source).to_string(),
                    destination: self.endpoint_name(&conn.destination).to_string(),
                    label: conn.label.clone(),
                    technology: conn.technology.clone(),
                })
                .collect(),
            extra: self.extra.clone(),
        }
    }

    /// Take over the server-owned fields of a record the server accepted.
    pub fn set_server_fields(&mut self, extra: Map<String, Value>) {
        self.extra = extra;
    }

    // ─── Read access ─────────────────────────────────────────────────────

    pub fn design_id(&self) -> Option<&str> {
        self.design_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    /// Display name of a connection end. Dangling ends show the name they
    /// were saved with.
    pub fn endpoint_name<'a>(&'a self, end: &'a Endpoint) -> &'a str {
        match end {
            Endpoint::Linked(id) => self.component(*id).map_or("", |c| c.name.as_str()),
            Endpoint::Dangling(name) => name,
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn rename_policy(&self) -> RenamePolicy {
        self.rename_policy
    }

    // ─── Flags & selection ───────────────────────────────────────────────

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Set the selection. Selecting something that does not exist clears
    /// it instead. Returns whether the selection changed.
    pub fn select(&mut self, selection: Option<Selection>) -> bool {
        let valid = selection.filter(|sel| match *sel {
            Selection::Component(id) => self.component(id).is_some(),
            Selection::Connection(index) => index < self.connections.len(),
        });
        let changed = valid != self.selection;
        self.selection = valid;
        changed
    }

    /// Put every unplaced component on its default grid slot. Placement is
    /// a rendering detail and does not dirty the design.
    pub fn place_unpositioned(&mut self, grid: &GridLayout) -> usize {
        assign_default_positions(&mut self.components, grid)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Apply a mutation. Returns whether anything changed; every change sets
    /// the dirty flag.
    pub fn apply(&mut self, mutation: DesignMutation) -> Result<bool, StoreError> {
        let changed = match mutation {
            DesignMutation::AddComponent {
                name,
                kind,
                position,
            } => {
                self.add_component(name, kind, position)?;
                true
            }
            DesignMutation::MoveComponent { id, x, y } => self.move_component(id, x, y)?,
            DesignMutation::UpdateComponent {
                id,
                name,
                domain_type,
                technology,
            } => self.update_component(id, name, domain_type, technology)?,
            DesignMutation::RemoveComponent { id } => {
                self.remove_component(id)?;
                true
            }
            DesignMutation::AddConnection {
                source,
                destination,
                label,
                technology,
            } => {
                self.add_connection(source, destination, label, technology)?;
                true
            }
            DesignMutation::UpdateConnection {
                index,
                label,
                technology,
            } => self.update_connection(index, label, technology)?,
            DesignMutation::RemoveConnection { index } => {
                self.remove_connection(index)?;
                true
            }
        };
        if changed {
            self.mark_dirty();
        }
        Ok(changed)
    }

    fn check_name(&self, name: &str, except: Option<ComponentId>) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self
            .components
            .iter()
            .any(|c| c.name == name && Some(c.id) != except)
        {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component, StoreError> {
        self.components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::UnknownComponent(id))
    }

    /// Add a component with its type's default domain and technology.
    pub fn add_component(
        &mut self,
        name: String,
        kind: ComponentType,
        position: Option<Position>,
    ) -> Result<ComponentId, StoreError> {
        self.check_name(&name, None)?;
        let mut component = Component::new(self.ids.allocate(), name, kind);
        component.position = position;
        let id = component.id;
        log::debug!("add component {id} `{}` ({})", component.name, component.kind);
        let name = component.name.clone();
        self.components.push(component);
        self.adopt_dangling(id, &name);
        self.mark_dirty();
        Ok(id)
    }

    /// Bind every dangling end that names `name` to component `id`, so the
    /// connection follows the component from now on.
    fn adopt_dangling(&mut self, id: ComponentId, name: &str) {
        let mut adopted = 0;
        for conn in &mut self.connections {
            for end in [&mut conn.source, &mut conn.destination] {
                if matches!(&*end, Endpoint::Dangling(n) if n == name) {
                    *end = Endpoint::Linked(id);
                    adopted += 1;
                }
            }
        }
        if adopted > 0 {
            log::debug!("bound {adopted} dangling connection end(s) to {id} `{name}`");
        }
    }

    pub fn move_component(&mut self, id: ComponentId, x: f64, y: f64) -> Result<bool, StoreError> {
        let component = self.component_mut(id)?;
        let target = Some(Position::new(x, y));
        if component.position == target {
            return Ok(false);
        }
        component.position = target;
        Ok(true)
    }

    /// Overwrite the editable fields of a component.
    pub fn update_component(
        &mut self,
        id: ComponentId,
        name: String,
        domain_type: DomainType,
        technology: String,
    ) -> Result<bool, StoreError> {
        self.check_name(&name, Some(id))?;
        let policy = self.rename_policy;
        let component = self.component_mut(id)?;
        let old_name = std::mem::replace(&mut component.name, name.clone());
        let renamed = old_name != name;
        let changed = renamed
            || component.domain_type != domain_type
            || component.technology != technology;
        component.domain_type = domain_type;
        component.technology = technology;

        if renamed && policy == RenamePolicy::Detach {
            let mut detached = 0;
            for conn in &mut self.connections {
                for end in [&mut conn.source, &mut conn.destination] {
                    if *end == Endpoint::Linked(id) {
                        *end = Endpoint::Dangling(old_name.clone());
                        detached += 1;
                    }
                }
            }
            log::debug!("rename of {id} detached {detached} connection end(s) from `{old_name}`");
        }
        if renamed {
            self.adopt_dangling(id, &name);
        }
        Ok(changed)
    }

    /// Remove a component and every connection that references it. Returns
    /// how many connections went with it.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<usize, StoreError> {
        let pos = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::UnknownComponent(id))?;
        let removed = self.components.remove(pos);
        let before = self.connections.len();
        self.connections.retain(|conn| !conn.references(&removed));
        let cascaded = before - self.connections.len();
        log::debug!(
            "remove component {id} `{}` and {cascaded} connection(s)",
            removed.name
        );
        self.selection = None;
        self.mark_dirty();
        Ok(cascaded)
    }

    /// Append a connection. Parallel connections between the same pair are
    /// allowed. Returns the new connection's index.
    pub fn add_connection(
        &mut self,
        source: ComponentId,
        destination: ComponentId,
        label: String,
        technology: String,
    ) -> Result<usize, StoreError> {
        if source == destination {
            return Err(StoreError::SelfLoop);
        }
        for id in [source, destination] {
            if self.component(id).is_none() {
                return Err(StoreError::UnknownComponent(id));
            }
        }
        self.connections.push(Connection {
            source: Endpoint::Linked(source),
            destination: Endpoint::Linked(destination),
            label,
            technology,
        });
        self.mark_dirty();
        Ok(self.connections.len() - 1)
    }

    /// Overwrite a connection's label and technology. Endpoints are fixed.
    pub fn update_connection(
        &mut self,
        index: usize,
        label: String,
        technology: String,
    ) -> Result<bool, StoreError> {
        let conn = self
            .connections
            .get_mut(index)
            .ok_or(StoreError::UnknownConnection(index))?;
        let changed = conn.label != label || conn.technology != technology;
        conn.label = label;
        conn.technology = technology;
        Ok(changed)
    }

    pub fn remove_connection(&mut self, index: usize) -> Result<Connection, StoreError> {
        if index >= self.connections.len() {
            return Err(StoreError::UnknownConnection(index));
        }
        let removed = self.connections.remove(index);
        self.selection = None;
        self.mark_dirty();
        Ok(removed)
    }
}
