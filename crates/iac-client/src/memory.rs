//! In-process `DesignService`.
//!
//! Follows the backend's contract: unknown ids are 404, saves that fail
//! validation are 400 with `{"errors": [...]}` as the detail, every save
//! stamps `updated_at`, and generation reads the stored copy. Mermaid
//! output is built in; other formats need a registered generator and are
//! 501 otherwise.
//!
//! Validation rejects connections to components that do not exist, as the
//! backend does. It is stricter in one way: the structural errors of
//! `validate_record` (duplicate or empty names, self-loops) are rejected
//! too, where the backend would store them.

use crate::error::GatewayError;
use crate::service::DesignService;
use async_trait::async_trait;
use iac_core::{
    Artifact, DesignRecord, DesignSummary, GenerateFormat, Severity, emit_mermaid,
    validate_record,
};
use chrono::Utc;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Turns a stored design into generated text.
pub type Generator = fn(&DesignRecord) -> String;

/// Findings that make a save fail. Dangling ends are only a warning in the
/// editor, but the server refuses to store them.
fn save_errors(record: &DesignRecord) -> Vec<String> {
    validate_record(record)
        .into_iter()
        .filter(|d| d.severity == Severity::Error || d.rule == "dangling-endpoint")
        .map(|d| d.message)
        .collect()
}

/// UTC timestamp in the backend's format (`2024-01-02T03:04:05.678901`).
fn timestamp() -> Value {
    Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

struct Stored {
    record: DesignRecord,
    /// Save order; higher is more recent.
    revision: u64,
}

#[derive(Default)]
struct Inner {
    designs: BTreeMap<String, Stored>,
    next_id: u64,
    clock: u64,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

pub struct MemoryDesignService {
    inner: Mutex<Inner>,
    generators: HashMap<GenerateFormat, Generator>,
}

impl Default for MemoryDesignService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDesignService {
    pub fn new() -> Self {
        let mut generators: HashMap<GenerateFormat, Generator> = HashMap::new();
        generators.insert(GenerateFormat::Mermaid, emit_mermaid);
        Self {
            inner: Mutex::new(Inner::default()),
            generators,
        }
    }

    /// Register (or replace) the generator for `format`.
    pub fn with_generator(mut self, format: GenerateFormat, generator: Generator) -> Self {
        self.generators.insert(format, generator);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The stored copy of a design, bypassing the async interface.
    pub fn stored(&self, design_id: &str) -> Option<DesignRecord> {
        self.lock()
            .designs
            .get(design_id)
            .map(|stored| stored.record.clone())
    }
}

#[async_trait]
impl DesignService for MemoryDesignService {
    async fn create(&self, name: &str) -> Result<DesignRecord, GatewayError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let mut record = DesignRecord::new(format!("design-{}", inner.next_id), name);
        let now = timestamp();
        record.extra.insert("created_at".into(), now.clone());
        record.extra.insert("updated_at".into(), now);
        let revision = inner.tick();
        inner.designs.insert(
            record.design_id.clone(),
            Stored {
                record: record.clone(),
                revision,
            },
        );
        log::debug!("created design {} `{name}`", record.design_id);
        Ok(record)
    }

    async fn load(&self, design_id: &str) -> Result<DesignRecord, GatewayError> {
        self.stored(design_id)
            .ok_or_else(|| GatewayError::not_found(design_id))
    }

    async fn save(&self, record: &DesignRecord) -> Result<DesignRecord, GatewayError> {
        if record.design_id.is_empty() {
            return Err(GatewayError::NotCreated);
        }
        let errors = save_errors(record);
        if !errors.is_empty() {
            return Err(GatewayError::api(400, json!({ "errors": errors }).to_string()));
        }

        let mut inner = self.lock();
        let revision = inner.tick();
        let stored = inner
            .designs
            .get_mut(&record.design_id)
            .ok_or_else(|| GatewayError::not_found(&record.design_id))?;
        let mut saved = record.clone();
        saved.extra.insert("updated_at".into(), timestamp());
        stored.record = saved.clone();
        stored.revision = revision;
        Ok(saved)
    }

    async fn generate(
        &self,
        design_id: &str,
        format: GenerateFormat,
    ) -> Result<Artifact, GatewayError> {
        let record = self.load(design_id).await?;
        let generator = self.generators.get(&format).ok_or_else(|| {
            GatewayError::api(501, format!("Generation for {format} is not available"))
        })?;
        Ok(Artifact {
            code: generator(&record),
            format: Some(format.to_string()),
        })
    }

    async fn list(&self) -> Result<Vec<DesignSummary>, GatewayError> {
        let inner = self.lock();
        let mut stored: Vec<&Stored> = inner.designs.values().collect();
        stored.sort_by(|a, b| b.revision.cmp(&a.revision));
        Ok(stored
            .into_iter()
            .map(|s| DesignSummary::from(&s.record))
            .collect())
    }

    async fn delete(&self, design_id: &str) -> Result<(), GatewayError> {
        self.lock()
            .designs
            .remove(design_id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::not_found(design_id))
    }
}
