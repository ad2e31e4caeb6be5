//! `rti top` – fetch top posts and download their images.

use anyhow::Result;
use rti_core::config::RtiConfig;
use rti_core::control::InterruptToken;
use rti_core::download::DownloadOptions;
use rti_core::feed::{FeedQuery, FeedSource, RedditFeed, TimeWindow};
use rti_core::progress::ProgressStats;
use rti_core::runner::{run_batch, BatchOptions};
use std::sync::Arc;
use std::time::Instant;

pub async fn run_top(
    cfg: &RtiConfig,
    subreddits: Vec<String>,
    period: Option<TimeWindow>,
    limit: Option<u32>,
    destination: Option<String>,
    jobs: Option<usize>,
    long_names: bool,
) -> Result<()> {
    let subreddits = if subreddits.is_empty() {
        cfg.default_subreddits.clone()
    } else {
        subreddits
    };
    let window = period.unwrap_or(cfg.default_window);
    let limit = limit.unwrap_or(cfg.default_limit);
    let destination = destination.or_else(|| cfg.destination.clone());
    let jobs = jobs.unwrap_or(cfg.jobs).max(1);

    let queries: Vec<FeedQuery> = subreddits
        .iter()
        .map(|s| FeedQuery {
            subreddit: s.clone(),
            limit,
            window,
        })
        .collect();
    let options = BatchOptions {
        jobs,
        download: DownloadOptions {
            destination,
            long_names: long_names || cfg.long_names,
            retry: cfg.retry_policy(),
        },
    };

    let interrupt = InterruptToken::new();
    let on_signal = interrupt.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupt received, stopping...");
            on_signal.trigger();
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressStats>(16);
    const PROGRESS_INTERVAL_MS: u64 = 500;
    let progress_handle = tokio::spawn(async move {
        let mut last_print = Instant::now();
        while let Some(stats) = progress_rx.recv().await {
            let now = Instant::now();
            let finished = stats.total_bytes > 0 && stats.bytes_done >= stats.total_bytes;
            if now.duration_since(last_print).as_millis() as u64 >= PROGRESS_INTERVAL_MS || finished
            {
                if stats.kib_total() > 0 {
                    println!(
                        "\r  {}: {} / {} KiB ({:.0}%)",
                        stats.file,
                        stats.kib_done(),
                        stats.kib_total(),
                        stats.fraction() * 100.0
                    );
                } else {
                    println!("\r  {}: {} KiB", stats.file, stats.kib_done());
                }
                last_print = now;
            }
        }
    });

    let feed: Arc<dyn FeedSource> = Arc::new(RedditFeed::new());
    let report = run_batch(feed, queries, options, interrupt, Some(progress_tx)).await?;
    let _ = progress_handle.await;

    println!(
        "{} downloaded, {} already present, {} posts without images, {} failed",
        report.downloaded, report.already_present, report.empty_posts, report.failed
    );
    if report.feed_errors > 0 {
        println!("{} feed listing(s) could not be fetched", report.feed_errors);
    }
    Ok(())
}
