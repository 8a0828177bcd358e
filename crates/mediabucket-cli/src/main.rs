//! mediabucket CLI
//!
//! Drives the upload provider from environment configuration.
//! Run with: GCS_SERVICE_ACCOUNT_PATH=key.json GCS_BUCKET_NAME=xxx mediabucket upload photo.jpg

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use mediabucket_cli::{file_upload_from_path, mime_for_extension, provider_from_env, report_error};
use mediabucket_core::{FileUpload, ProviderConfig};
use mediabucket_provider::UploadProvider;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediabucket")]
#[command(about = "Upload media to a Google Cloud Storage bucket", long_about = None)]
struct Cli {
    /// Use a directory under this path as the bucket instead of GCS
    #[arg(long, global = true)]
    local_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider's configuration fields as JSON
    Schema,
    /// Validate configuration and make sure the bucket exists
    Check,
    /// Upload a file and print the resulting URLs
    Upload {
        path: PathBuf,
        /// Parent reference the file is attached to
        #[arg(long = "ref")]
        parent_ref: Option<String>,
    },
    /// Delete every object stored for a file
    Delete {
        hash: String,
        /// Extension, with or without the leading dot
        ext: String,
        #[arg(long = "ref")]
        parent_ref: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        report_error(&e);
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let local_dir = cli.local_dir.as_deref();

    match cli.command {
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&ProviderConfig::schema())?);
        }
        Commands::Check => {
            let provider = provider_from_env(local_dir).await?;
            let config = provider.config();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "bucket": config.bucket_name,
                    "location": config.bucket_location,
                    "baseUrl": config.base_url,
                    "project": config.service_account.project_id,
                }))?
            );
        }
        Commands::Upload { path, parent_ref } => {
            let provider = provider_from_env(local_dir).await?;
            let mut file = file_upload_from_path(&path, parent_ref.as_deref())?;
            provider
                .upload(&mut file)
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&file)?);
        }
        Commands::Delete {
            hash,
            ext,
            parent_ref,
        } => {
            let provider = provider_from_env(local_dir).await?;
            let mime = mime_for_extension(ext.trim_start_matches('.'));
            let mut file = FileUpload::new(Bytes::new(), hash, ext, mime);
            if let Some(parent) = parent_ref {
                file = file.with_related(parent);
            }
            provider.delete(&file).await.context("Failed to delete file")?;
            tracing::info!(hash = %file.hash, "File deleted");
        }
    }

    Ok(())
}
