use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use image_recognition::{
    config::{Settings, DEFAULT_SERVER_URL},
    server, ConsoleSurface, HttpDetectClient, SelectedFile, UploadController,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "image-recognition", about = "Upload images for classification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the detect server.
    Serve,
    /// Submit one image to a running server and print the predictions.
    Classify {
        path: PathBuf,
        #[arg(long, env = "DETECT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Serve => {
            let settings = Settings::load()?;
            server::serve(settings).await
        }
        Command::Classify { path, server } => classify(path, &server).await,
    }
}

async fn classify(path: PathBuf, server_url: &str) -> anyhow::Result<()> {
    let file = SelectedFile::from_path(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let client = HttpDetectClient::new(server_url)
        .with_context(|| format!("invalid server url: {server_url}"))?;
    let controller = UploadController::new(client, ConsoleSurface);

    controller.on_file_selected(file).await;
    controller.on_submit().await?;
    Ok(())
}
