use std::path::{Path, PathBuf};

use anyhow::Context;
use brandmap_core::{BrandDescriptor, BrandMapRequest};
use brandmap_pipeline::BrandMapPipeline;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandmap-cli")]
#[command(about = "Brand map command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check a request file without contacting any service
    Validate { file: PathBuf },
    /// Build the brand map for a request file and print it as JSON
    Run {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => {
            let descriptor = load_descriptor(&file)?;
            println!(
                "{}: valid request for '{}' across {} target countries",
                file.display(),
                descriptor.brand_name(),
                descriptor.target_countries().len()
            );
        }
        Commands::Run { file, pretty } => {
            let config = brandmap_core::load_app_config()?;
            // Logs go to stderr so stdout carries only the brand map.
            let env_filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();

            let descriptor = load_descriptor(&file)?;
            let pipeline = BrandMapPipeline::from_config(&config)?;
            let brand_map = pipeline.run(descriptor).await;

            let rendered = if pretty {
                serde_json::to_string_pretty(&brand_map)?
            } else {
                serde_json::to_string(&brand_map)?
            };
            println!("{rendered}");
        }
    }

    Ok(())
}

fn load_descriptor(path: &Path) -> anyhow::Result<BrandDescriptor> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_descriptor(&raw).with_context(|| format!("invalid request in {}", path.display()))
}

fn parse_descriptor(raw: &str) -> anyhow::Result<BrandDescriptor> {
    let request: BrandMapRequest =
        serde_json::from_str(raw).context("request is not valid JSON")?;
    Ok(request.validate()?)
}
