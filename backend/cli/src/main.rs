mod config;
mod input;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use filepost_client::{HttpTransport, UploadAction};
use filepost_core::{FileSelection, UploadOutcome};

use config::Config;
use input::PathInput;

#[derive(Parser)]
#[command(name = "filepost")]
#[command(about = "filepost — multipart file uploader")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files in a single multipart POST
    Upload {
        /// Files to upload, sent in the order given
        files: Vec<PathBuf>,
        /// Server origin
        #[arg(long)]
        base_url: Option<String>,
        /// Upload path on the server
        #[arg(long)]
        endpoint: Option<String>,
        /// Log a placeholder instead of reading failure bodies
        #[arg(long)]
        unawaited_diagnostics: bool,
        /// Fail with an error when the server cannot be reached
        #[arg(long)]
        propagate_transport_errors: bool,
        /// Print the outcome as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    filepost_logging::init_logger(config.log_dir.as_deref(), &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            files,
            base_url,
            endpoint,
            unawaited_diagnostics,
            propagate_transport_errors,
            json,
        } => {
            let config = Config {
                base_url: base_url.unwrap_or(config.base_url),
                endpoint: endpoint.unwrap_or(config.endpoint),
                await_body_diagnostics: config.await_body_diagnostics && !unawaited_diagnostics,
                propagate_transport_errors: config.propagate_transport_errors
                    || propagate_transport_errors,
                ..config
            };
            let outcome = run_upload(&config, &files).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_upload(config: &Config, files: &[PathBuf]) -> Result<UploadOutcome> {
    info!(
        base_url = %config.base_url,
        endpoint = %config.endpoint,
        files = files.len(),
        "Starting upload"
    );

    let input = PathInput::read(files).await?;
    let selection = FileSelection::from_input(Some(&input));

    let transport = Arc::new(HttpTransport::new(config.base_url.clone()));
    let action = UploadAction::new(transport)
        .with_endpoint(config.endpoint.clone())
        .with_options(config.upload_options());

    Ok(action.upload_files(&selection).await?)
}
