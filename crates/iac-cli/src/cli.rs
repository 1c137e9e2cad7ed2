use clap::{Parser, Subcommand};
use iac_client::ClientConfig;
use iac_client::config::DEFAULT_BASE_URL;
use iac_core::GenerateFormat;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "iac")]
#[command(about = "Inspect, edit and generate infrastructure designs")]
pub struct Cli {
    /// Base URL of the design service.
    #[arg(long, env = "IAC_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty design and print its id
    Create { name: String },
    /// List stored designs, most recently saved first
    List,
    /// Print a design's components, connections and findings
    Show { design_id: String },
    /// Delete a stored design
    Delete { design_id: String },
    /// Generate a diagram or code from the saved design
    Generate {
        design_id: String,
        /// mermaid, pulumi or cdk
        #[arg(long, short, default_value = "mermaid")]
        format: GenerateFormat,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Apply a JSON script of editor input events to a stored design
    Replay {
        design_id: String,
        /// JSON array of input events
        script: PathBuf,
        /// Save the result when the script finishes
        #[arg(long)]
        save: bool,
        /// Renaming a component leaves its connections on the old name
        #[arg(long)]
        detach_on_rename: bool,
    },
    /// Render a design file as Mermaid without contacting the service
    Export {
        /// Design record in JSON
        file: PathBuf,
    },
}
