//! CLI for the rti top-image downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use rti_core::config;
use rti_core::feed::TimeWindow;
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_download, run_resolve, run_top};

/// Top-level CLI for the rti downloader.
#[derive(Debug, Parser)]
#[command(name = "rti")]
#[command(about = "Download top images from any subreddit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a subreddit's top posts and download their images.
    Top {
        /// Subreddit names (defaults to the configured list).
        #[arg(short = 's', long = "subreddits", num_args = 1.., value_name = "NAME")]
        subreddits: Vec<String>,

        /// Ranking window: [h]our, [d]ay, [w]eek, [m]onth, [y]ear or [a]ll.
        #[arg(short = 'p', long, value_name = "WINDOW")]
        period: Option<TimeWindow>,

        /// Maximum posts per subreddit.
        #[arg(short = 'l', long, value_name = "N")]
        limit: Option<u32>,

        /// Destination path. By default images land in $HOME/reddit_pics.
        #[arg(short = 'd', long, value_name = "PATH")]
        destination: Option<String>,

        /// Process up to N posts concurrently (default 1, strictly in feed order).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Name files by the full URL segment instead of the short tail.
        #[arg(long)]
        long_names: bool,
    },

    /// Resolve one post URL to its concrete image URLs.
    Resolve {
        /// Post URL to classify and resolve.
        url: String,
    },

    /// Download one concrete image URL.
    Download {
        /// Direct image URL (must carry a recognized extension).
        url: String,

        /// Label prepended to the filename (typically a subreddit name).
        #[arg(long, default_value = "image")]
        label: String,

        /// Destination path. By default images land in $HOME/reddit_pics.
        #[arg(short = 'd', long, value_name = "PATH")]
        destination: Option<String>,
    },

    /// Compute SHA-256 of a downloaded file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Emit a shell completion script on stdout.
    Completions {
        /// Shell to generate for.
        shell: Shell,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Top {
                subreddits,
                period,
                limit,
                destination,
                jobs,
                long_names,
            } => {
                run_top(&cfg, subreddits, period, limit, destination, jobs, long_names).await?;
            }
            CliCommand::Resolve { url } => run_resolve(&url).await?,
            CliCommand::Download {
                url,
                label,
                destination,
            } => run_download(&cfg, &url, &label, destination).await?,
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
