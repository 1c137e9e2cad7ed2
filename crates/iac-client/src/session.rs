//! An editor bound to a design service.
//!
//! The session is the only place where local editing and persistence meet.
//! Failed calls return the error and leave the editor exactly as it was, so
//! the user can retry; successful saves clear the dirty flag.

use crate::error::GatewayError;
use crate::service::DesignService;
use iac_core::{Artifact, GenerateFormat};
use iac_editor::{Editor, EditorConfig};

pub struct EditorSession<S> {
    editor: Editor,
    service: S,
}

impl<S: DesignService> EditorSession<S> {
    pub fn new(service: S, config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config),
            service,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Id of the open design, if it exists on the server.
    pub fn design_id(&self) -> Option<&str> {
        self.editor.store().design_id()
    }

    /// Create a design on the server and open it.
    pub async fn create(&mut self, name: &str) -> Result<(), GatewayError> {
        let record = self.service.create(name).await?;
        self.editor.load_record(record);
        Ok(())
    }

    /// Open a stored design, replacing whatever is in the editor.
    pub async fn open(&mut self, design_id: &str) -> Result<(), GatewayError> {
        let record = self.service.load(design_id).await?;
        self.editor.load_record(record);
        Ok(())
    }

    /// Save a snapshot of the open design.
    pub async fn save(&mut self) -> Result<(), GatewayError> {
        let snapshot = self.editor.to_record();
        if snapshot.design_id.is_empty() {
            return Err(GatewayError::NotCreated);
        }
        let saved = self.service.save(&snapshot).await?;
        self.editor.mark_saved_as(saved);
        Ok(())
    }

    /// Generate from the last saved state of the open design.
    pub async fn generate(&self, format: GenerateFormat) -> Result<Artifact, GatewayError> {
        let design_id = self.design_id().ok_or(GatewayError::NotCreated)?;
        if self.editor.is_dirty() {
            log::warn!("design {design_id} has unsaved changes; generating from the saved copy");
        }
        self.service.generate(design_id, format).await
    }

    /// Throw away local edits and load the saved copy again.
    pub async fn reload(&mut self) -> Result<(), GatewayError> {
        let design_id = self
            .design_id()
            .ok_or(GatewayError::NotCreated)?
            .to_string();
        self.open(&design_id).await
    }
}
