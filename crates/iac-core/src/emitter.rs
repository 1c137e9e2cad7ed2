//! Emitter: design record → Mermaid flowchart text.
//!
//! Components are grouped into one subgraph per domain, in zone order
//! (Public, Web, Application, Data). Node ids are positional (`c0`, `c1`, …)
//! so arbitrary display names never have to be escaped into identifiers.
//! Connections whose endpoints do not resolve are skipped, the same way the
//! canvas hides them.

use crate::model::{DesignRecord, DomainType};
use std::collections::HashMap;
use std::fmt::Write;

/// Render the record as a `graph TD` Mermaid diagram.
#[must_use]
pub fn emit_mermaid(record: &DesignRecord) -> String {
    let mut out = String::with_capacity(256);
    out.push_str("graph TD\n");

    let mut node_ids: HashMap<&str, String> = HashMap::new();
    for (i, component) in record.components.iter().enumerate() {
        // First definition wins when names collide.
        node_ids
            .entry(component.name.as_str())
            .or_insert_with(|| format!("c{i}"));
    }

    for domain in DomainType::ALL {
        let members: Vec<(usize, _)> = record
            .components
            .iter()
            .enumerate()
            .filter(|(_, c)| c.domain_type == domain)
            .collect();
        if members.is_empty() {
            continue;
        }
        let _ = writeln!(out, "    subgraph {domain}");
        for (i, component) in members {
            let mut label = escape(&component.name);
            let _ = write!(label, "<br/>{}", escape(component.kind.as_str()));
            if !component.technology.is_empty() {
                let _ = write!(label, ": {}", escape(&component.technology));
            }
            let _ = writeln!(out, "        c{i}[\"{label}\"]");
        }
        out.push_str("    end\n");
    }

    for conn in &record.connections {
        let (Some(src), Some(dst)) = (
            node_ids.get(conn.source.as_str()),
            node_ids.get(conn.destination.as_str()),
        ) else {
            log::debug!(
                "mermaid: skipping dangling connection {} -> {}",
                conn.source,
                conn.destination
            );
            continue;
        };
        if conn.label.is_empty() {
            let _ = writeln!(out, "    {src} --> {dst}");
        } else {
            let _ = writeln!(out, "    {src} -->|{}| {dst}", escape(&conn.label));
        }
    }

    out
}

fn escape(text: &str) -> String {
    text.replace('"', "#quot;").replace('|', "#124;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentRecord, ComponentType, ConnectionRecord};

    fn component(name: &str, kind: ComponentType, technology: &str) -> ComponentRecord {
        ComponentRecord {
            name: name.into(),
            domain_type: kind.default_domain(),
            kind,
            technology: technology.into(),
            x: None,
            y: None,
        }
    }

    #[test]
    fn emits_subgraphs_and_edges() {
        let mut record = DesignRecord::new("d", "Shop");
        record.components = vec![
            component("Web App", ComponentType::Container, "Docker"),
            component("API", ComponentType::Gateway, "Kong"),
            component("Users", ComponentType::Rdms, "PostgreSQL"),
        ];
        record.connections = vec![
            ConnectionRecord {
                source: "Web App".into(),
                destination: "API".into(),
                label: "Makes \"API\" calls".into(),
                technology: "HTTPS".into(),
            },
            ConnectionRecord {
                source: "API".into(),
                destination: "Users".into(),
                label: String::new(),
                technology: String::new(),
            },
        ];

        let text = emit_mermaid(&record);
        assert!(text.starts_with("graph TD\n"));
        // Public zone comes first even though the gateway is second.
        let public = text.find("subgraph Public").unwrap();
        let web = text.find("subgraph Web").unwrap();
        assert!(public < web);
        assert!(text.contains("c1[\"API<br/>Gateway: Kong\"]"));
        assert!(text.contains("c0 -->|Makes #quot;API#quot; calls| c1"));
        assert!(text.contains("c1 --> c2"));
    }

    #[test]
    fn skips_dangling_connections() {
        let mut record = DesignRecord::new("d", "Half");
        record.components = vec![component("A", ComponentType::Lambda, "")];
        record.connections = vec![ConnectionRecord {
            source: "A".into(),
            destination: "B".into(),
            label: "gone".into(),
            technology: String::new(),
        }];
        let text = emit_mermaid(&record);
        assert!(!text.contains("-->"));
        assert!(text.contains("c0[\"A<br/>Lambda\"]"));
    }
}
