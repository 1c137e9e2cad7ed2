//! `DesignService` over the backend's JSON API.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | POST   | `/api/designs` | `{name}` |
//! | GET    | `/api/designs` | - |
//! | GET    | `/api/designs/{id}` | - |
//! | PUT    | `/api/designs/{id}` | full design |
//! | DELETE | `/api/designs/{id}` | - |
//! | POST   | `/api/designs/{id}/generate/{format}` | - |

use crate::config::ClientConfig;
use crate::error::GatewayError;
use crate::service::DesignService;
use async_trait::async_trait;
use iac_core::{Artifact, DesignRecord, DesignSummary, GenerateFormat};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct DesignList {
    #[serde(default)]
    designs: Vec<DesignSummary>,
}

pub struct HttpDesignService {
    client: Client,
    config: ClientConfig,
}

impl HttpDesignService {
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn design_url(&self, design_id: &str) -> String {
        self.config.endpoint(&format!("/designs/{design_id}"))
    }

    /// Send the request and decode a success body as `T`. Non-success
    /// responses become `GatewayError::Api` carrying the `detail` field.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;
        if !status.is_success() {
            log::warn!("{url} answered {status}");
            return Err(GatewayError::from_body(status.as_u16(), &body));
        }
        log::debug!("{url} answered {status} ({} bytes)", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DesignService for HttpDesignService {
    async fn create(&self, name: &str) -> Result<DesignRecord, GatewayError> {
        log::info!("create design `{name}`");
        let request = self
            .client
            .post(self.config.endpoint("/designs"))
            .json(&CreateRequest { name });
        self.send(request).await
    }

    async fn load(&self, design_id: &str) -> Result<DesignRecord, GatewayError> {
        log::info!("load design {design_id}");
        self.send(self.client.get(self.design_url(design_id))).await
    }

    async fn save(&self, record: &DesignRecord) -> Result<DesignRecord, GatewayError> {
        if record.design_id.is_empty() {
            return Err(GatewayError::NotCreated);
        }
        log::info!(
            "save design {} ({} components, {} connections)",
            record.design_id,
            record.components.len(),
            record.connections.len()
        );
        let request = self
            .client
            .put(self.design_url(&record.design_id))
            .json(record);
        self.send(request).await
    }

    async fn generate(
        &self,
        design_id: &str,
        format: GenerateFormat,
    ) -> Result<Artifact, GatewayError> {
        log::info!("generate {format} for design {design_id}");
        let url = self
            .config
            .endpoint(&format!("/designs/{design_id}/generate/{format}"));
        self.send(self.client.post(url)).await
    }

    async fn list(&self) -> Result<Vec<DesignSummary>, GatewayError> {
        let list: DesignList = self
            .send(self.client.get(self.config.endpoint("/designs")))
            .await?;
        Ok(list.designs)
    }

    async fn delete(&self, design_id: &str) -> Result<(), GatewayError> {
        log::info!("delete design {design_id}");
        let _: serde_json::Value = self.send(self.client.delete(self.design_url(design_id))).await?;
        Ok(())
    }
}
