//! Properties editor: an edit form for the current selection.
//!
//! The panel is a snapshot of the selected entity's editable fields. Hosts
//! bind it to their form widgets, let the user edit the copy, and hand it
//! back through `Editor::commit_properties`. Nothing is written until then.

use crate::store::{DesignMutation, DesignStore, StoreError};
use iac_core::{ComponentId, ComponentType, DomainType, Selection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentForm {
    pub id: ComponentId,
    pub name: String,
    /// Display-only.
    pub kind: ComponentType,
    pub domain_type: DomainType,
    pub technology: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionForm {
    pub index: usize,
    /// Display-only: endpoints change by delete and recreate.
    pub source: String,
    /// Display-only.
    pub destination: String,
    pub label: String,
    pub technology: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PropertiesPanel {
    #[default]
    Empty,
    Component(ComponentForm),
    Connection(ConnectionForm),
}

impl PropertiesPanel {
    /// Build the form for whatever is selected in `store`.
    pub fn for_selection(store: &DesignStore) -> Self {
        match store.selection() {
            Some(Selection::Component(id)) => match store.component(id) {
                Some(c) => Self::Component(ComponentForm {
                    id,
                    name: c.name.clone(),
                    kind: c.kind.clone(),
                    domain_type: c.domain_type,
                    technology: c.technology.clone(),
                }),
                None => Self::Empty,
            },
            Some(Selection::Connection(index)) => match store.connection(index) {
                Some(conn) => Self::Connection(ConnectionForm {
                    index,
                    source: store.endpoint_name(&conn.source).to_string(),
                    destination: store.endpoint_name(&conn.destination).to_string(),
                    label: conn.label.clone(),
                    technology: conn.technology.clone(),
                }),
                None => Self::Empty,
            },
            None => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The mutation that writes this form back. Fails with `StaleForm` if
    /// the form is not for the entity currently selected in `store`.
    pub fn to_mutation(&self, store: &DesignStore) -> Result<DesignMutation, StoreError> {
        match (self, store.selection()) {
            (Self::Component(form), Some(Selection::Component(id))) if form.id == id => {
                Ok(DesignMutation::UpdateComponent {
                    id,
                    name: form.name.trim().to_string(),
                    domain_type: form.domain_type,
                    technology: form.technology.clone(),
                })
            }
            (Self::Connection(form), Some(Selection::Connection(index)))
                if form.index == index =>
            {
                Ok(DesignMutation::UpdateConnection {
                    index,
                    label: form.label.clone(),
                    technology: form.technology.clone(),
                })
            }
            _ => Err(StoreError::StaleForm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenamePolicy;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_tracks_selection_kind() {
        let mut store = DesignStore::new(RenamePolicy::Follow);
        let a = store
            .add_component("API".into(), ComponentType::Gateway, None)
            .unwrap();
        let b = store
            .add_component("Jobs".into(), ComponentType::Lambda, None)
            .unwrap();
        store
            .add_connection(a, b, "API to Jobs".into(), "HTTPS".into())
            .unwrap();

        assert_eq!(PropertiesPanel::for_selection(&store), PropertiesPanel::Empty);

        store.select(Some(Selection::Component(a)));
        let PropertiesPanel::Component(form) = PropertiesPanel::for_selection(&store) else {
            panic!("expected a component form");
        };
        assert_eq!(form.name, "API");
        assert_eq!(form.technology, "API Gateway");

        store.select(Some(Selection::Connection(0)));
        assert_eq!(
            PropertiesPanel::for_selection(&store),
            PropertiesPanel::Connection(ConnectionForm {
                index: 0,
                source: "API".into(),
                destination: "Jobs".into(),
                label: "API to Jobs".into(),
                technology: "HTTPS".into(),
            })
        );
    }

    #[test]
    fn form_for_another_entity_is_stale() {
        let mut store = DesignStore::new(RenamePolicy::Follow);
        let a = store
            .add_component("A".into(), ComponentType::Cache, None)
            .unwrap();
        let b = store
            .add_component("B".into(), ComponentType::Cache, None)
            .unwrap();
        store.select(Some(Selection::Component(a)));
        let panel = PropertiesPanel::for_selection(&store);

        store.select(Some(Selection::Component(b)));
        assert_eq!(panel.to_mutation(&store), Err(StoreError::StaleForm));
        assert_eq!(PropertiesPanel::Empty.to_mutation(&store), Err(StoreError::StaleForm));
    }
}
