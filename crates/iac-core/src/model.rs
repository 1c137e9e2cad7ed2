//! Core data model for infrastructure designs.
//!
//! Two layers live here. The editing model (`Component`, `Connection`) is
//! what the store mutates: edges point at store-assigned `ComponentId`s, so a
//! rename never breaks them. The wire records (`DesignRecord` and friends)
//! mirror the persisted JSON exactly, where edges point at component names.
//! Conversion between the two happens only at load and serialize time.

use crate::id::ComponentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ─── Component types ─────────────────────────────────────────────────────

/// The kind of infrastructure element a component stands for.
///
/// Serialized as its bare name (`"Gateway"`). Names outside the built-in
/// set are kept verbatim as `Other` so designs from newer palettes load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    Gateway,
    Container,
    Lambda,
    Cache,
    Rdms,
    Archive,
    Other(String),
}

impl ComponentType {
    /// The palette, in display order.
    pub const BUILTIN: [ComponentType; 6] = [
        ComponentType::Gateway,
        ComponentType::Container,
        ComponentType::Lambda,
        ComponentType::Cache,
        ComponentType::Rdms,
        ComponentType::Archive,
    ];

    pub fn parse(s: &str) -> Self {
        match s {
            "Gateway" => Self::Gateway,
            "Container" => Self::Container,
            "Lambda" => Self::Lambda,
            "Cache" => Self::Cache,
            "Rdms" => Self::Rdms,
            "Archive" => Self::Archive,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Gateway => "Gateway",
            Self::Container => "Container",
            Self::Lambda => "Lambda",
            Self::Cache => "Cache",
            Self::Rdms => "Rdms",
            Self::Archive => "Archive",
            Self::Other(name) => name,
        }
    }

    /// Domain assigned to a freshly created component of this type.
    pub fn default_domain(&self) -> DomainType {
        match self {
            Self::Gateway => DomainType::Public,
            Self::Container => DomainType::Web,
            Self::Lambda => DomainType::Application,
            Self::Cache | Self::Rdms | Self::Archive => DomainType::Data,
            Self::Other(_) => DomainType::Application,
        }
    }

    /// Technology label assigned to a freshly created component of this type.
    pub fn default_technology(&self) -> &'static str {
        match self {
            Self::Gateway => "API Gateway",
            Self::Container => "Docker",
            Self::Lambda => "AWS Lambda",
            Self::Cache => "Redis",
            Self::Rdms => "PostgreSQL",
            Self::Archive => "S3",
            Self::Other(_) => "",
        }
    }
}

impl From<String> for ComponentType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ComponentType> for String {
    fn from(kind: ComponentType) -> Self {
        match kind {
            ComponentType::Other(name) => name,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network zone a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DomainType {
    Public,
    Web,
    #[default]
    Application,
    Data,
}

impl DomainType {
    pub const ALL: [DomainType; 4] = [
        DomainType::Public,
        DomainType::Web,
        DomainType::Application,
        DomainType::Data,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Web => "Web",
            Self::Application => "Application",
            Self::Data => "Data",
        }
    }
}

impl FromStr for DomainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("invalid domain_type: {s}"))
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Editing model ───────────────────────────────────────────────────────

/// Top-left corner of a component's bounding box, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub kind: ComponentType,
    pub domain_type: DomainType,
    pub technology: String,
    /// `None` until the first render places it on the default grid.
    pub position: Option<Position>,
}

impl Component {
    /// A new component with the type's defaulted domain and technology.
    pub fn new(id: ComponentId, name: impl Into<String>, kind: ComponentType) -> Self {
        Self {
            id,
            name: name.into(),
            domain_type: kind.default_domain(),
            technology: kind.default_technology().to_string(),
            kind,
            position: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }
}

/// One end of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Bound to a live component.
    Linked(ComponentId),
    /// A name that matched no component when it was bound. Resolved by name
    /// again at render time, so the edge reappears if that name comes back.
    Dangling(String),
}

/// A directed edge between two components.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: Endpoint,
    pub destination: Endpoint,
    pub label: String,
    pub technology: String,
}

impl Connection {
    pub fn default_label(source: &str, destination: &str) -> String {
        format!("{source} to {destination}")
    }

    /// Whether either end refers to `component`, by id or by dangling name.
    pub fn references(&self, component: &Component) -> bool {
        [&self.source, &self.destination]
            .into_iter()
            .any(|end| match end {
                Endpoint::Linked(id) => *id == component.id,
                Endpoint::Dangling(name) => *name == component.name,
            })
    }
}

/// The single selected item, if any. Transient, never persisted.
///
/// Connections have no identity of their own, so they are selected by
/// position; any deletion clears the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Component(ComponentId),
    Connection(usize),
}

// ─── Wire records ────────────────────────────────────────────────────────

/// A design exactly as the API stores and returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRecord {
    pub design_id: String,
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    /// Server-owned fields (timestamps, deployment state) carried through
    /// load → save untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesignRecord {
    pub fn new(design_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            design_id: design_id.into(),
            name: name.into(),
            components: Vec::new(),
            connections: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentRecord> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub domain_type: DomainType,
    #[serde(default)]
    pub technology: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl ComponentRecord {
    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub technology: String,
}

/// One row of the design listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub design_id: String,
    pub name: String,
    #[serde(default)]
    pub component_count: usize,
    #[serde(default)]
    pub connection_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<&DesignRecord> for DesignSummary {
    fn from(record: &DesignRecord) -> Self {
        Self {
            design_id: record.design_id.clone(),
            name: record.name.clone(),
            component_count: record.components.len(),
            connection_count: record.connections.len(),
            updated_at: record
                .extra
                .get("updated_at")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

// ─── Generation ──────────────────────────────────────────────────────────

/// Output formats the generation endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateFormat {
    Mermaid,
    Pulumi,
    Cdk,
}

impl GenerateFormat {
    pub const ALL: [GenerateFormat; 3] = [
        GenerateFormat::Mermaid,
        GenerateFormat::Pulumi,
        GenerateFormat::Cdk,
    ];

    /// Path segment used in `/generate/{format}`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::Pulumi => "pulumi",
            Self::Cdk => "cdk",
        }
    }
}

impl FromStr for GenerateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown format `{s}` (expected mermaid, pulumi or cdk)"))
    }
}

impl fmt::Display for GenerateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated text returned by the generation endpoint. Display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_follow_type_table() {
        let c = Component::new(ComponentId::from_raw(0), "Session Cache", ComponentType::Cache);
        assert_eq!(c.domain_type, DomainType::Data);
        assert_eq!(c.technology, "Redis");
        assert!(c.position.is_none());

        let gw = Component::new(ComponentId::from_raw(1), "Edge", ComponentType::Gateway);
        assert_eq!(gw.domain_type, DomainType::Public);
        assert_eq!(gw.technology, "API Gateway");
    }

    #[test]
    fn unknown_component_type_is_preserved() {
        let kind: ComponentType = serde_json::from_str("\"Queue\"").unwrap();
        assert_eq!(kind, ComponentType::Other("Queue".into()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"Queue\"");
        assert_eq!(kind.default_domain(), DomainType::Application);
    }

    #[test]
    fn record_keeps_server_fields() {
        let json = r#"{
            "design_id": "d1",
            "name": "Shop",
            "components": [
                {"name": "API", "type": "Gateway", "domain_type": "Public", "technology": "Kong", "x": 10.0, "y": 20.0}
            ],
            "connections": [],
            "created_at": "2024-01-01T00:00:00",
            "component_states": {}
        }"#;
        let record: DesignRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.components[0].kind, ComponentType::Gateway);
        assert_eq!(record.components[0].position(), Some(Position::new(10.0, 20.0)));
        assert!(record.extra.contains_key("created_at"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["created_at"], "2024-01-01T00:00:00");
        assert_eq!(back["components"][0]["type"], "Gateway");
    }

    #[test]
    fn missing_coordinates_are_omitted_on_the_wire() {
        let record = ComponentRecord {
            name: "Jobs".into(),
            kind: ComponentType::Lambda,
            domain_type: DomainType::Application,
            technology: String::new(),
            x: None,
            y: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("x").is_none());
        assert_eq!(record.position(), None);
    }

    #[test]
    fn generate_format_parses_case_insensitively() {
        assert_eq!("CDK".parse::<GenerateFormat>(), Ok(GenerateFormat::Cdk));
        assert!("terraform".parse::<GenerateFormat>().is_err());
        assert_eq!(GenerateFormat::Pulumi.to_string(), "pulumi");
    }

    #[test]
    fn dangling_endpoint_matches_by_name() {
        let comp = Component::new(ComponentId::from_raw(3), "DB", ComponentType::Rdms);
        let conn = Connection {
            source: Endpoint::Dangling("DB".into()),
            destination: Endpoint::Linked(ComponentId::from_raw(9)),
            label: String::new(),
            technology: String::new(),
        };
        assert!(conn.references(&comp));
        assert_eq!(Connection::default_label("A", "B"), "A to B");
    }
}
