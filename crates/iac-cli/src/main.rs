//! `iac`: command-line client for the IaC Designer service.
//!
//! Talks to the backend over HTTP (`--api-url` / `IAC_API_URL`). `export`
//! works offline on a design file. Logging goes to stderr and is controlled
//! with `RUST_LOG`.

mod cli;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use iac_client::{DesignService, HttpDesignService};
use iac_core::{DesignRecord, Severity, emit_mermaid, validate_record};
use iac_editor::RenamePolicy;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    // Building the client does not touch the network.
    let service = HttpDesignService::new(cli.client_config())?;
    log::debug!("using design service at {}", service.config().base_url);

    match cli.command {
        Commands::Create { name } => {
            let record = service.create(&name).await?;
            println!("{}", record.design_id);
        }
        Commands::List => {
            for summary in service.list().await? {
                println!(
                    "{}  {}  ({} components, {} connections){}",
                    summary.design_id,
                    summary.name,
                    summary.component_count,
                    summary.connection_count,
                    summary
                        .updated_at
                        .map(|t| format!("  updated {t}"))
                        .unwrap_or_default()
                );
            }
        }
        Commands::Show { design_id } => {
            let record = service.load(&design_id).await?;
            print_record(&record);
        }
        Commands::Delete { design_id } => {
            service.delete(&design_id).await?;
            println!("deleted {design_id}");
        }
        Commands::Generate {
            design_id,
            format,
            out,
        } => {
            let artifact = service.generate(&design_id, format).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, &artifact.code)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("wrote {format} output to {}", path.display());
                }
                None => print!("{}", artifact.code),
            }
        }
        Commands::Replay {
            design_id,
            script,
            save,
            detach_on_rename,
        } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read {}", script.display()))?;
            let events = replay::parse_script(&text)?;
            let policy = if detach_on_rename {
                RenamePolicy::Detach
            } else {
                RenamePolicy::Follow
            };
            let (session, report) = replay::replay(service, &design_id, events, policy, save).await?;
            for notice in &report.notices {
                eprintln!("{notice:?}");
            }
            print_record(&session.editor().to_record());
            println!(
                "replayed {} event(s); {}",
                report.events,
                if report.saved {
                    "saved"
                } else if report.dirty {
                    "unsaved changes discarded"
                } else {
                    "no changes"
                }
            );
        }
        Commands::Export { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let record: DesignRecord = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a design record", file.display()))?;
            print!("{}", emit_mermaid(&record));
        }
    }
    Ok(())
}

fn print_record(record: &DesignRecord) {
    println!("{} ({})", record.name, record.design_id);
    for c in &record.components {
        let at = match c.position() {
            Some(p) => format!(" @ ({}, {})", p.x, p.y),
            None => String::new(),
        };
        println!("  [{}] {} : {} / {}{at}", c.domain_type, c.name, c.kind, c.technology);
    }
    for conn in &record.connections {
        println!("  {} -> {}  {}", conn.source, conn.destination, conn.label);
    }
    for diag in validate_record(record) {
        let level = match diag.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("  {level}[{}]: {}", diag.rule, diag.message);
    }
}
