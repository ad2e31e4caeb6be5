//! `rti download <url>` – run the download manager on one concrete URL.

use anyhow::{Context, Result};
use rti_core::config::RtiConfig;
use rti_core::control::InterruptToken;
use rti_core::download::{download_image, DownloadOptions, Outcome};

pub async fn run_download(
    cfg: &RtiConfig,
    url: &str,
    label: &str,
    destination: Option<String>,
) -> Result<()> {
    let options = DownloadOptions {
        destination: destination.or_else(|| cfg.destination.clone()),
        long_names: cfg.long_names,
        retry: cfg.retry_policy(),
    };

    let interrupt = InterruptToken::new();
    let on_signal = interrupt.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.trigger();
        }
    });

    let url = url.to_string();
    let label = label.to_string();
    let outcome =
        tokio::task::spawn_blocking(move || download_image(&url, &label, &options, &interrupt, None))
            .await
            .context("download task panicked")??;

    match outcome {
        Outcome::Downloaded { path, bytes } => {
            println!("saved {} ({} KiB)", path.display(), bytes / 1024);
        }
        Outcome::AlreadyDownloaded { path } => {
            println!("{} already downloaded", path.display());
        }
    }
    Ok(())
}
