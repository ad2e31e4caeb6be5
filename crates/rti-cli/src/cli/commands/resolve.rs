//! `rti resolve <url>` – classify and resolve one post URL.

use anyhow::{Context, Result};
use rti_core::resolve::{self, Resolution};

pub async fn run_resolve(url: &str) -> Result<()> {
    let post_url = url.to_string();
    let resolution = tokio::task::spawn_blocking(move || resolve::resolve(&post_url))
        .await
        .context("resolver task panicked")?;

    match resolution {
        Resolution::Images(urls) => {
            for url in urls {
                println!("{url}");
            }
        }
        Resolution::Empty(reason) => println!("no image: {reason}"),
    }
    Ok(())
}
