//! Idempotent download manager.
//!
//! Materializes one concrete image URL to disk at most once. The filesystem
//! is the only record of what has been downloaded: if the target path exists
//! the fetch is skipped entirely. Bytes stream into a `.part` file and are
//! renamed into place only after a complete, verified transfer, so the final
//! path never holds a truncated image.

pub mod target;

use anyhow::{Context, Result};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::str;
use std::time::{Duration, Instant};

use crate::control::InterruptToken;
use crate::fetch::USER_AGENT;
use crate::progress::ProgressStats;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::storage::{self, PartFile};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const HARD_TIMEOUT: Duration = Duration::from_secs(3600);

/// Knobs for one download call.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Destination directory override; see [`target::resolve_destination`].
    pub destination: Option<String>,
    /// Name files by the full URL segment instead of the 10-char tail.
    pub long_names: bool,
    /// Retry policy for transient fetch failures.
    pub retry: RetryPolicy,
}

/// What a download call did.
#[derive(Debug)]
pub enum Outcome {
    /// Fetched and renamed into place.
    Downloaded { path: PathBuf, bytes: u64 },
    /// The target already existed; no network request was made.
    AlreadyDownloaded { path: PathBuf },
}

/// Download `url` into the resolved destination under a `{label}_{tail}`
/// filename. Returns without any network traffic when the target exists.
pub fn download_image(
    url: &str,
    label: &str,
    opts: &DownloadOptions,
    interrupt: &InterruptToken,
    progress: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<Outcome> {
    let dir = target::resolve_destination(opts.destination.as_deref())?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create download directory {}", dir.display()))?;

    let file_name = target::derive_filename(label, url, opts.long_names);
    let final_path = dir.join(&file_name);
    if final_path.exists() {
        tracing::debug!(path = %final_path.display(), "target present, skipping fetch");
        return Ok(Outcome::AlreadyDownloaded { path: final_path });
    }

    let temp_path = storage::part_path(&final_path);
    tracing::info!(url, path = %final_path.display(), "downloading");

    let (part, bytes) = run_with_retry(&opts.retry, || {
        fetch_to_part(url, &temp_path, &file_name, interrupt, progress)
    })
    .with_context(|| format!("download {url}"))?;

    part.sync().context("sync downloaded file")?;
    part.finalize(&final_path)?;

    Ok(Outcome::Downloaded {
        path: final_path,
        bytes,
    })
}

/// One GET attempt: stream the body into a fresh `.part` file.
///
/// Returns the open part file and the byte count; the caller finalizes.
/// The write callback aborts the transfer on interrupt or storage failure.
fn fetch_to_part(
    url: &str,
    temp_path: &std::path::Path,
    file_name: &str,
    interrupt: &InterruptToken,
    progress: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<(PartFile, u64), FetchError> {
    let part = PartFile::create(temp_path).map_err(FetchError::Storage)?;
    let started = Instant::now();
    let total = Cell::new(0u64);
    let written = Cell::new(0u64);
    let storage_error: RefCell<Option<std::io::Error>> = RefCell::new(None);

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.useragent(USER_AGENT)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(CONNECT_TIMEOUT)?;
    // Abort if throughput drops below 1 KiB/s for 60s rather than waiting for
    // the hard timeout.
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(HARD_TIMEOUT)?;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(line) = str::from_utf8(data) {
                // A new status line means a redirect hop; forget its length.
                if line.starts_with("HTTP/") {
                    total.set(0);
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        if let Ok(n) = value.trim().parse::<u64>() {
                            total.set(n);
                        }
                    }
                }
            }
            true
        })?;
        transfer.write_function(|data| {
            if interrupt.is_triggered() {
                return Ok(0); // abort transfer
            }
            if let Err(e) = part.append(data) {
                *storage_error.borrow_mut() = Some(e);
                return Ok(0);
            }
            let done = written.get() + data.len() as u64;
            written.set(done);
            if let Some(tx) = progress {
                let _ = tx.try_send(ProgressStats {
                    file: file_name.to_string(),
                    bytes_done: done,
                    total_bytes: total.get(),
                    elapsed_secs: started.elapsed().as_secs_f64(),
                });
            }
            Ok(data.len())
        })?;
        transfer.perform()
    };

    if let Some(io_err) = storage_error.borrow_mut().take() {
        return Err(FetchError::Storage(io_err));
    }
    if interrupt.is_triggered() {
        return Err(FetchError::Interrupted);
    }
    perform_result?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    let expected = total.get();
    let received = written.get();
    if expected > 0 && received != expected {
        return Err(FetchError::PartialBody { expected, received });
    }

    Ok((part, received))
}
