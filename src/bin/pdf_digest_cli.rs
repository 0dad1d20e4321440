//! Offline entrypoint: digest a local PDF with the same pipeline the HTTP server uses.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pdfdigest::{
    config::Config,
    logging,
    processing::{DocumentDigest, DocumentService, UploadedDocument},
};

#[derive(Parser)]
#[command(
    name = "pdf-digest-cli",
    about = "Summarize a local PDF and list its detected topics"
)]
struct Cli {
    /// PDF file to digest.
    path: PathBuf,
    /// Print the same JSON body the HTTP endpoint returns.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_cli_tracing();
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("failed to load config from environment")?;
    let service = DocumentService::from_config(&config)
        .context("failed to initialize summarization client")?;

    let filename = cli
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    service.check_filename(&filename)?;
    let bytes = std::fs::read(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;

    let digest = service
        .process_upload(UploadedDocument::new(filename, bytes))
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
    } else {
        print!("{}", render_text(&digest));
    }
    Ok(())
}

fn render_text(digest: &DocumentDigest) -> String {
    let topics = if digest.topics.is_empty() {
        "(none)".to_string()
    } else {
        digest.topics.join(", ")
    };
    format!(
        "File: {}\nCharacters: {}\nTopics: {}\n\n{}\n",
        digest.filename, digest.text_length, topics, digest.summary
    )
}
