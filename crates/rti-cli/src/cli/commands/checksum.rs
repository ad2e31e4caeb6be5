//! `rti checksum <path>` – SHA-256 of a downloaded file.

use anyhow::{Context, Result};
use rti_core::checksum;
use std::path::{Path, PathBuf};

pub async fn run_checksum(path: &Path) -> Result<()> {
    let owned: PathBuf = path.to_path_buf();
    let digest = tokio::task::spawn_blocking(move || checksum::sha256_file(&owned))
        .await
        .context("checksum task panicked")??;
    println!("{digest}  {}", path.display());
    Ok(())
}
