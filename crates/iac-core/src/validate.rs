//! Structural checks for design records.
//!
//! Reports problems without modifying the record. The editor surfaces these
//! next to the canvas; the CLI prints them when showing a design.

use crate::model::DesignRecord;
use serde::Serialize;
use std::collections::HashSet;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The server will reject or mis-generate this design.
    Error,
    /// Tolerated, but something is probably missing.
    Warning,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Component name or `connection N` the finding is about.
    pub subject: String,
    pub message: String,
    pub severity: Severity,
    /// Short rule identifier (e.g. "duplicate-name").
    pub rule: &'static str,
}

/// Run every rule over the record.
#[must_use]
pub fn validate_record(record: &DesignRecord) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    check_component_names(record, &mut diags);
    check_connections(record, &mut diags);
    diags
}

fn check_component_names(record: &DesignRecord, diags: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for (i, component) in record.components.iter().enumerate() {
        if component.name.trim().is_empty() {
            diags.push(Diagnostic {
                subject: format!("component {i}"),
                message: format!("Component {i} has an empty name."),
                severity: Severity::Error,
                rule: "empty-name",
            });
        } else if !seen.insert(component.name.as_str()) {
            diags.push(Diagnostic {
                subject: component.name.clone(),
                message: format!(
                    "Component `{}` is defined more than once; connections to it are ambiguous.",
                    component.name
                ),
                severity: Severity::Error,
                rule: "duplicate-name",
            });
        }
    }
}

fn check_connections(record: &DesignRecord, diags: &mut Vec<Diagnostic>) {
    let names: HashSet<&str> = record.components.iter().map(|c| c.name.as_str()).collect();
    for (i, conn) in record.connections.iter().enumerate() {
        if conn.source == conn.destination {
            diags.push(Diagnostic {
                subject: format!("connection {i}"),
                message: format!("Connection {i} connects `{}` to itself.", conn.source),
                severity: Severity::Error,
                rule: "self-loop",
            });
        }
        for (role, name) in [("source", &conn.source), ("destination", &conn.destination)] {
            if !names.contains(name.as_str()) {
                diags.push(Diagnostic {
                    subject: format!("connection {i}"),
                    message: format!("Connection {i} references non-existent {role}: {name}"),
                    severity: Severity::Warning,
                    rule: "dangling-endpoint",
                });
            }
        }
    }
}
