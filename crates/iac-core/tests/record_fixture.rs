//! Integration tests: a stored design as the backend writes it.

use iac_core::*;
use pretty_assertions::assert_eq;

fn web_shop() -> DesignRecord {
    serde_json::from_str(include_str!("fixtures/web_shop.json")).unwrap()
}

#[test]
fn fixture_parses_with_every_component_type() {
    let record = web_shop();
    let kinds: Vec<&str> = record.components.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(
        kinds,
        vec!["Gateway", "Container", "Lambda", "Cache", "Rdms", "Archive", "Queue"]
    );
    assert_eq!(record.component("Orders").unwrap().position(), None);
    assert_eq!(
        record.component("Mailer").unwrap().kind,
        ComponentType::Other("Queue".into())
    );
}

#[test]
fn reserialized_record_matches_the_file() {
    let original: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/web_shop.json")).unwrap();
    let reserialized = serde_json::to_value(web_shop()).unwrap();
    assert_eq!(reserialized, original);
}

#[test]
fn summary_counts_and_timestamp() {
    let summary = DesignSummary::from(&web_shop());
    assert_eq!(summary.name, "Web Shop");
    assert_eq!(summary.component_count, 7);
    assert_eq!(summary.connection_count, 6);
    assert_eq!(summary.updated_at.as_deref(), Some("2024-03-04T17:40:12.654321"));
}

#[test]
fn only_the_missing_payment_service_is_reported() {
    let diags = validate_record(&web_shop());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, "dangling-endpoint");
    assert_eq!(diags[0].severity, Severity::Warning);
    assert_eq!(
        diags[0].message,
        "Connection 5 references non-existent destination: Payments"
    );
}

#[test]
fn mermaid_covers_resolvable_connections() {
    let text = emit_mermaid(&web_shop());
    let edges = text.lines().filter(|l| l.contains("-->")).count();
    assert_eq!(edges, 5);
    assert!(text.contains("c2 -->|writes PDFs| c5"));
    assert!(text.contains("c1 --> c3"));
    assert!(!text.contains("Payments"));
    assert!(text.contains("c6[\"Mailer<br/>Queue: SQS\"]"));
}

#[test]
fn unplaced_components_take_their_grid_slot() {
    let record = web_shop();
    let mut ids = IdAllocator::new();
    let mut components: Vec<Component> = record
        .components
        .iter()
        .map(|rec| Component {
            id: ids.allocate(),
            name: rec.name.clone(),
            kind: rec.kind.clone(),
            domain_type: rec.domain_type,
            technology: rec.technology.clone(),
            position: rec.position(),
        })
        .collect();

    let placed = assign_default_positions(&mut components, &GridLayout::default());
    assert_eq!(placed, 2);
    assert_eq!(components[2].position, Some(Position::new(340.0, 40.0)));
    assert_eq!(components[6].position, Some(Position::new(190.0, 140.0)));
}
