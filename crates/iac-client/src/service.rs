use crate::error::GatewayError;
use async_trait::async_trait;
use iac_core::{Artifact, DesignRecord, DesignSummary, GenerateFormat};

/// The design service contract. Each call is one round trip; a failed call
/// changes nothing on the caller's side.
#[async_trait]
pub trait DesignService: Send + Sync {
    /// Create an empty design and return it with its server-assigned id.
    async fn create(&self, name: &str) -> Result<DesignRecord, GatewayError>;

    async fn load(&self, design_id: &str) -> Result<DesignRecord, GatewayError>;

    /// Overwrite the stored design. Fails if the id is unknown.
    async fn save(&self, record: &DesignRecord) -> Result<DesignRecord, GatewayError>;

    /// Generate from the last *saved* copy of the design.
    async fn generate(
        &self,
        design_id: &str,
        format: GenerateFormat,
    ) -> Result<Artifact, GatewayError>;

    /// Summaries of every stored design, most recently saved first.
    async fn list(&self) -> Result<Vec<DesignSummary>, GatewayError>;

    async fn delete(&self, design_id: &str) -> Result<(), GatewayError>;
}
