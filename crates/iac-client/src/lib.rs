//! Gateway to the design service, plus an editor session bound to it.
//!
//! `DesignService` is the request/response contract. `HttpDesignService`
//! talks to the real backend; `MemoryDesignService` keeps designs in
//! process with the same status codes, for tests and offline use.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod service;
pub mod session;

pub use config::ClientConfig;
pub use error::GatewayError;
pub use http::HttpDesignService;
pub use memory::{Generator, MemoryDesignService};
pub use service::DesignService;
pub use session::EditorSession;
