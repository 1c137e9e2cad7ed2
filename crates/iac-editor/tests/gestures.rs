//! Integration tests: event queue → controller → store → scene.
//!
//! Drives a full `Editor` through typed input events the way a host does
//! and checks both the store and the projected scene.

use iac_core::{ComponentRecord, ComponentType, ConnectionRecord, DesignRecord, DomainType};
use iac_editor::{
    ComponentForm, Editor, EditorConfig, InputEvent, Notice, PropertiesPanel, RenamePolicy,
};
use pretty_assertions::assert_eq;

fn component(name: &str, x: f64, y: f64) -> ComponentRecord {
    ComponentRecord {
        name: name.into(),
        kind: ComponentType::Container,
        domain_type: DomainType::Web,
        technology: "Docker".into(),
        x: Some(x),
        y: Some(y),
    }
}

fn connection(source: &str, destination: &str) -> ConnectionRecord {
    ConnectionRecord {
        source: source.into(),
        destination: destination.into(),
        label: format!("{source} to {destination}"),
        technology: String::new(),
    }
}

/// A at (0,0), B at (300,0), C at (600,0); boxes are 120×60.
fn abc(config: EditorConfig, connections: Vec<ConnectionRecord>) -> Editor {
    let mut record = DesignRecord::new("d-1", "abc");
    record.components = vec![
        component("A", 0.0, 0.0),
        component("B", 300.0, 0.0),
        component("C", 600.0, 0.0),
    ];
    record.connections = connections;
    let mut editor = Editor::new(config);
    editor.load_record(record);
    editor
}

fn click(editor: &mut Editor, x: f64, y: f64) {
    editor.dispatch(&InputEvent::pointer_down(x, y));
    editor.dispatch(&InputEvent::PointerUp { x, y });
}

fn enter_connect_mode(editor: &mut Editor) {
    editor.dispatch(&InputEvent::ContextMenu { x: 50.0, y: 500.0 });
    assert!(editor.interaction().connect_mode());
}

// ─── Palette ─────────────────────────────────────────────────────────────

#[test]
fn dropped_component_gets_type_defaults() {
    let mut editor = Editor::default();
    editor.create("palette");
    for token in ["Gateway", "Rdms", "Archive"] {
        editor.dispatch(&InputEvent::Drop {
            x: 100.0,
            y: 100.0,
            token: token.into(),
        });
    }

    let record = editor.to_record();
    let summary: Vec<(&str, DomainType, &str)> = record
        .components
        .iter()
        .map(|c| (c.name.as_str(), c.domain_type, c.technology.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Gateway 1", DomainType::Public, "API Gateway"),
            ("Rdms 2", DomainType::Data, "PostgreSQL"),
            ("Archive 3", DomainType::Data, "S3"),
        ]
    );
    assert_eq!(record.components[0].x, Some(100.0));
    assert!(editor.is_dirty());
}

#[test]
fn palette_numbers_are_not_reused_after_delete() {
    let mut editor = Editor::default();
    editor.create("palette");
    let drop = InputEvent::Drop {
        x: 0.0,
        y: 0.0,
        token: "Cache".into(),
    };
    editor.dispatch(&drop);
    click(&mut editor, 10.0, 10.0);
    editor.dispatch(&InputEvent::key("Delete"));
    editor.dispatch(&InputEvent::Confirm { accepted: true });
    assert!(editor.store().components().is_empty());

    editor.dispatch(&drop);
    assert_eq!(editor.store().components()[0].name, "Cache 2");
}

// ─── Connect mode ────────────────────────────────────────────────────────

#[test]
fn connect_gesture_adds_one_connection_and_leaves_connect_mode() {
    let mut editor = abc(EditorConfig::default(), vec![]);
    enter_connect_mode(&mut editor);

    click(&mut editor, 20.0, 20.0);
    assert!(matches!(editor.take_notices().last(), Some(Notice::Prompt(_))));
    click(&mut editor, 320.0, 20.0);

    let record = editor.to_record();
    assert_eq!(record.connections, vec![connection("A", "B")]);
    assert!(!editor.interaction().connect_mode());
    assert_eq!(editor.scene().edges.len(), 1);
}

#[test]
fn connecting_a_component_to_itself_changes_nothing() {
    let mut editor = abc(EditorConfig::default(), vec![]);
    enter_connect_mode(&mut editor);

    click(&mut editor, 20.0, 20.0);
    click(&mut editor, 25.0, 25.0);

    assert!(editor.store().connections().is_empty());
    assert!(editor.interaction().connect_mode());
    assert!(
        editor
            .take_notices()
            .iter()
            .any(|n| matches!(n, Notice::Error(_)))
    );
    assert!(!editor.is_dirty());
}

#[test]
fn dragging_is_suspended_in_connect_mode() {
    let mut editor = abc(EditorConfig::default(), vec![]);
    enter_connect_mode(&mut editor);
    editor.dispatch(&InputEvent::pointer_down(20.0, 20.0));
    editor.dispatch(&InputEvent::PointerMove { x: 220.0, y: 220.0 });

    assert_eq!(editor.to_record().components[0].x, Some(0.0));
}

// ─── Delete ──────────────────────────────────────────────────────────────

#[test]
fn deleting_a_component_cascades_to_its_connections() {
    let mut editor = abc(
        EditorConfig::default(),
        vec![connection("A", "B"), connection("B", "C")],
    );
    click(&mut editor, 320.0, 20.0);
    editor.dispatch(&InputEvent::key("Delete"));
    assert_eq!(
        editor.take_notices(),
        vec![Notice::ConfirmDelete("B".into())]
    );
    editor.dispatch(&InputEvent::Confirm { accepted: true });

    let record = editor.to_record();
    let names: Vec<&str> = record.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "C"]);
    assert!(record.connections.is_empty());
    assert!(editor.panel().is_empty());
    assert!(editor.scene().edges.is_empty());
}

#[test]
fn declined_delete_keeps_everything() {
    let mut editor = abc(EditorConfig::default(), vec![connection("A", "B")]);
    click(&mut editor, 20.0, 20.0);
    editor.dispatch(&InputEvent::key("Delete"));
    editor.dispatch(&InputEvent::Confirm { accepted: false });

    assert_eq!(editor.store().components().len(), 3);
    assert_eq!(editor.store().connections().len(), 1);
    assert!(!editor.is_dirty());
}

#[test]
fn clicking_a_connector_selects_and_deletes_it() {
    let mut editor = abc(
        EditorConfig::default(),
        vec![connection("A", "B"), connection("B", "C")],
    );
    // Midway between the A and B boxes, on the connector.
    click(&mut editor, 210.0, 31.0);
    let PropertiesPanel::Connection(form) = editor.panel().clone() else {
        panic!("expected a connection form, got {:?}", editor.panel());
    };
    assert_eq!((form.source.as_str(), form.destination.as_str()), ("A", "B"));

    editor.dispatch(&InputEvent::key("Delete"));
    assert_eq!(editor.to_record().connections, vec![connection("B", "C")]);
}

// ─── Drag ────────────────────────────────────────────────────────────────

#[test]
fn replaying_the_final_drag_position_is_idempotent() {
    let mut editor = abc(EditorConfig::default(), vec![connection("A", "B")]);
    editor.dispatch(&InputEvent::pointer_down(10.0, 10.0));
    let last = InputEvent::PointerMove { x: 110.0, y: 210.0 };
    editor.dispatch(&last);
    let first = editor.scene().clone();
    editor.dispatch(&last);
    editor.dispatch(&InputEvent::PointerUp { x: 110.0, y: 210.0 });

    assert_eq!(editor.scene(), &first);
    let a = &editor.to_record().components[0];
    assert_eq!((a.x, a.y), (Some(100.0), Some(200.0)));
    // Connector follows the moved box.
    assert_eq!(first.edges[0].line.p0, kurbo::Point::new(160.0, 230.0));
}

// ─── Properties & rename ─────────────────────────────────────────────────

fn rename_a(editor: &mut Editor, new_name: &str) {
    rename_at(editor, 20.0, 20.0, new_name);
}

fn rename_at(editor: &mut Editor, x: f64, y: f64, new_name: &str) {
    click(editor, x, y);
    let PropertiesPanel::Component(form) = editor.panel().clone() else {
        panic!("expected a component form");
    };
    let edited = ComponentForm {
        name: new_name.into(),
        ..form
    };
    editor
        .commit_properties(&PropertiesPanel::Component(edited))
        .unwrap();
}

#[test]
fn rename_keeps_connections_by_default() {
    let mut editor = abc(EditorConfig::default(), vec![connection("A", "B")]);
    rename_a(&mut editor, "A2");

    assert_eq!(editor.to_record().connections[0].source, "A2");
    assert_eq!(editor.scene().edges.len(), 1);
    assert!(editor.is_dirty());
}

#[test]
fn rename_detaches_connections_under_legacy_policy() {
    let config = EditorConfig {
        rename_policy: RenamePolicy::Detach,
        ..EditorConfig::default()
    };
    let mut editor = abc(config, vec![connection("A", "B")]);
    rename_a(&mut editor, "A2");

    assert_eq!(editor.to_record().connections[0].source, "A");
    assert!(editor.scene().edges.is_empty());
    assert_eq!(editor.diagnostics().len(), 1);
}

#[test]
fn connection_revived_by_rename_keeps_following_renames() {
    // A -> X where X does not exist yet; B is renamed to X, then to Z.
    let mut editor = abc(EditorConfig::default(), vec![connection("A", "X")]);
    assert!(editor.scene().edges.is_empty());

    rename_at(&mut editor, 320.0, 20.0, "X");
    assert_eq!(editor.scene().edges.len(), 1);

    rename_at(&mut editor, 320.0, 20.0, "Z");
    assert_eq!(editor.scene().edges.len(), 1);
    assert_eq!(editor.to_record().connections[0].destination, "Z");
    assert!(editor.diagnostics().is_empty());
}

#[test]
fn dropped_component_revives_dangling_connection() {
    let mut editor = abc(EditorConfig::default(), vec![connection("A", "Cache 1")]);
    editor.dispatch(&InputEvent::Drop {
        x: 300.0,
        y: 300.0,
        token: "Cache".into(),
    });
    assert_eq!(editor.store().components()[3].name, "Cache 1");
    assert_eq!(editor.scene().edges.len(), 1);

    rename_at(&mut editor, 320.0, 320.0, "Sessions");
    assert_eq!(editor.to_record().connections[0].destination, "Sessions");
    assert_eq!(editor.scene().edges.len(), 1);
}

#[test]
fn loaded_design_round_trips_unchanged() {
    let mut record = DesignRecord::new("d-9", "shop");
    record.components = vec![component("Web", 12.5, 40.0), component("Db", 300.0, 7.25)];
    record.connections = vec![connection("Web", "Db"), connection("Web", "Gone")];
    record
        .extra
        .insert("created_at".into(), "2024-05-01T10:00:00".into());

    let mut editor = Editor::default();
    editor.load_record(record.clone());
    assert_eq!(editor.to_record(), record);
    // The dangling connection stays in the record but is not drawn.
    assert_eq!(editor.scene().edges.len(), 1);
}
