//! Batch orchestration: feed → resolve → download.
//!
//! Subreddits are processed in order; within one subreddit, posts are handed
//! to a bounded worker pool (`jobs = 1` reproduces strictly sequential
//! behavior). Every per-post and per-image failure is contained: it is
//! logged, counted, and the batch moves on. Only an interrupt stops the run.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::control::InterruptToken;
use crate::download::{self, DownloadOptions, Outcome};
use crate::feed::{FeedQuery, FeedSource, Post};
use crate::progress::ProgressStats;
use crate::resolve::{self, Resolution};

/// Knobs for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Posts processed concurrently per subreddit (0 and 1 mean sequential).
    pub jobs: usize,
    pub download: DownloadOptions,
}

/// Counts of what a batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Posts taken from the feeds.
    pub posts: usize,
    /// Concrete image URLs the resolver produced.
    pub images: usize,
    /// Images fetched and written.
    pub downloaded: usize,
    /// Images skipped because the target already existed.
    pub already_present: usize,
    /// Posts that resolved to nothing.
    pub empty_posts: usize,
    /// Image downloads that failed after retries.
    pub failed: usize,
    /// Feed listings that could not be fetched or decoded.
    pub feed_errors: usize,
}

impl BatchReport {
    fn merge(&mut self, other: &BatchReport) {
        self.posts += other.posts;
        self.images += other.images;
        self.downloaded += other.downloaded;
        self.already_present += other.already_present;
        self.empty_posts += other.empty_posts;
        self.failed += other.failed;
        self.feed_errors += other.feed_errors;
    }
}

/// Run a batch on the blocking pool. The sender half of `progress` is dropped
/// when the batch ends, which closes the consumer loop.
pub async fn run_batch(
    feed: Arc<dyn FeedSource>,
    queries: Vec<FeedQuery>,
    options: BatchOptions,
    interrupt: InterruptToken,
    progress: Option<tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<BatchReport> {
    tokio::task::spawn_blocking(move || {
        run_batch_blocking(feed.as_ref(), &queries, &options, &interrupt, progress.as_ref())
    })
    .await
    .context("batch worker panicked")?
}

/// Blocking batch run; drives all network and disk work.
pub fn run_batch_blocking(
    feed: &dyn FeedSource,
    queries: &[FeedQuery],
    options: &BatchOptions,
    interrupt: &InterruptToken,
    progress: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for query in queries {
        if interrupt.is_triggered() {
            tracing::info!(subreddit = %query.subreddit, "interrupted before subreddit");
            break;
        }

        let posts = match feed.top_posts(query) {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!(subreddit = %query.subreddit, error = %format!("{e:#}"), "feed fetch failed");
                println!("r/{}: feed fetch failed: {e:#}", query.subreddit);
                report.feed_errors += 1;
                continue;
            }
        };

        println!(
            "r/{}: {} posts from the top-of-{} feed",
            query.subreddit,
            posts.len(),
            query.window
        );
        process_posts(&query.subreddit, posts, options, interrupt, progress, &mut report);
    }

    Ok(report)
}

/// Process one subreddit's posts, sequentially or through a worker pool.
fn process_posts(
    label: &str,
    posts: Vec<Post>,
    options: &BatchOptions,
    interrupt: &InterruptToken,
    progress: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
    report: &mut BatchReport,
) {
    let workers = options.jobs.clamp(1, posts.len().max(1));

    if workers <= 1 {
        for post in posts {
            if interrupt.is_triggered() {
                break;
            }
            let item = process_post(label, &post, &options.download, interrupt, progress);
            report.merge(&item);
        }
        return;
    }

    let work: Mutex<VecDeque<Post>> = Mutex::new(posts.into());
    let (tx, rx) = mpsc::channel::<BatchReport>();
    std::thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let work = &work;
            s.spawn(move || loop {
                if interrupt.is_triggered() {
                    break;
                }
                let Some(post) = work.lock().unwrap().pop_front() else {
                    break;
                };
                let item = process_post(label, &post, &options.download, interrupt, progress);
                let _ = tx.send(item);
            });
        }
        drop(tx);
        while let Ok(item) = rx.recv() {
            report.merge(&item);
        }
    });
}

/// Resolve one post and download whatever it yields.
fn process_post(
    label: &str,
    post: &Post,
    download_opts: &DownloadOptions,
    interrupt: &InterruptToken,
    progress: Option<&tokio::sync::mpsc::Sender<ProgressStats>>,
) -> BatchReport {
    let mut report = BatchReport {
        posts: 1,
        ..Default::default()
    };

    match resolve::resolve(&post.url) {
        Resolution::Empty(reason) => {
            tracing::info!(url = %post.url, %reason, "no image for post");
            report.empty_posts += 1;
        }
        Resolution::Images(urls) => {
            report.images += urls.len();
            for image_url in urls {
                if interrupt.is_triggered() {
                    break;
                }
                match download::download_image(&image_url, label, download_opts, interrupt, progress)
                {
                    Ok(Outcome::Downloaded { path, bytes }) => {
                        println!("saved {} ({} KiB)", path.display(), bytes / 1024);
                        report.downloaded += 1;
                    }
                    Ok(Outcome::AlreadyDownloaded { path }) => {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.display().to_string());
                        println!("{name} already downloaded");
                        report.already_present += 1;
                    }
                    Err(e) => {
                        tracing::warn!(url = %image_url, error = %format!("{e:#}"), "image download failed");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    report
}
