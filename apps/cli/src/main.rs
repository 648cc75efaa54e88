use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ClientController, FaceSwapClient, SelectedImage};
use shared::domain::{ImageSlot, Readiness};
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use crate::{config::Settings, view::TerminalView};

#[derive(Parser, Debug)]
#[command(name = "faceswap", version, about = "Client for the face-swap processing service")]
struct Cli {
    /// Processing service base url; overrides faceswap.toml and APP__SERVER_URL.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wait for the service's models to load and report the status.
    Status {
        /// Check once instead of polling while models load.
        #[arg(long)]
        once: bool,
    },
    /// Put the face from SOURCE onto the face in TARGET.
    Swap {
        #[arg(long)]
        source: PathBuf,
        #[arg(long)]
        target: PathBuf,
        /// Where to save the result; defaults to faceswap_result.jpg.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn build_controller(settings: &Settings) -> Result<ClientController> {
    let server_url = config::normalize_server_url(&settings.server_url)?;
    let client = match settings.request_timeout() {
        Some(timeout) => FaceSwapClient::with_timeout(&server_url, timeout)?,
        None => FaceSwapClient::new(&server_url)?,
    };
    tracing::info!(server_url = client.server_url(), "using processing service");
    Ok(
        ClientController::new(Arc::new(client), Arc::new(TerminalView::default()))
            .with_poll_interval(settings.poll_interval()),
    )
}

async fn wait_until_ready(controller: ClientController) -> Result<Arc<ClientController>> {
    let (controller, poll) = controller.launch();
    let outcome = poll.join().await.context("readiness poll task failed")?;
    tracing::debug!(retries = outcome.retries, "readiness poll finished");
    if outcome.readiness != Readiness::Ready {
        bail!(
            "processing service is not ready ({})",
            outcome.readiness.status_text()
        );
    }
    Ok(controller)
}

async fn swap(
    controller: Arc<ClientController>,
    source: PathBuf,
    target: PathBuf,
    output: Option<PathBuf>,
) -> Result<()> {
    for (slot, path) in [(ImageSlot::Source, source), (ImageSlot::Target, target)] {
        let image = SelectedImage::from_path(&path).await?;
        controller
            .handle_file_selection(slot, image)
            .with_context(|| format!("cannot use {} as the {slot} image", path.display()))?
            .await
            .context("preview task failed")?;
    }

    let result = controller.process_face_swap().await?;
    let decoded = result.decode().context("service returned an unreadable image")?;
    let output = output.unwrap_or_else(|| PathBuf::from(result.download_filename()));
    tokio::fs::write(&output, &decoded.bytes)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Saved {} ({}, {} bytes)",
        output.display(),
        decoded.media_type,
        decoded.bytes.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    let controller = build_controller(&settings)?;

    match cli.command {
        Command::Status { once: true } => {
            let readiness = controller.check_readiness().await;
            if readiness == Readiness::Error {
                bail!("processing service is unreachable");
            }
        }
        Command::Status { once: false } => {
            wait_until_ready(controller).await?;
        }
        Command::Swap {
            source,
            target,
            output,
        } => {
            let controller = wait_until_ready(controller).await?;
            swap(controller, source, target, output).await?;
        }
    }

    Ok(())
}
