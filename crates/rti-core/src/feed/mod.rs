//! Feed source: ranked posts from a subreddit's "top" listing.
//!
//! The engine only consumes `Post.url`; ranking and scoring belong to the
//! platform. The `FeedSource` trait is the collaborator seam so tests can
//! substitute a canned feed.

mod listing;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fetch;
use listing::Listing;

/// Public endpoint serving subreddit listings as JSON.
const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// The platform caps a single listing page at 100 items.
const LISTING_PAGE_CAP: u32 = 100;

/// One ranked content item. Only `url` drives the pipeline.
#[derive(Debug, Clone)]
pub struct Post {
    pub url: String,
    pub title: String,
    pub score: i64,
}

/// Ranking window for a "top" listing; maps to the feed's `t=` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Hour,
    Day,
    #[default]
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    /// Value for the listing's `t=` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    /// Accepts the single-letter codes (`h d w m y a`) as well as the full
    /// window names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h" | "hour" => Ok(TimeWindow::Hour),
            "d" | "day" => Ok(TimeWindow::Day),
            "w" | "week" => Ok(TimeWindow::Week),
            "m" | "month" => Ok(TimeWindow::Month),
            "y" | "year" => Ok(TimeWindow::Year),
            "a" | "all" => Ok(TimeWindow::All),
            other => Err(format!(
                "unknown time window '{other}' (expected one of: h, d, w, m, y, a)"
            )),
        }
    }
}

/// Parameters for one listing request.
#[derive(Debug, Clone)]
pub struct FeedQuery {
    pub subreddit: String,
    pub limit: u32,
    pub window: TimeWindow,
}

/// Collaborator that returns ranked posts for a query.
pub trait FeedSource: Send + Sync {
    fn top_posts(&self, query: &FeedQuery) -> Result<Vec<Post>>;
}

/// Production feed source: fetches and decodes the public listing JSON.
#[derive(Debug, Clone)]
pub struct RedditFeed {
    base_url: String,
}

impl Default for RedditFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl RedditFeed {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the feed at a different host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn listing_url(&self, query: &FeedQuery) -> String {
        let limit = query.limit.min(LISTING_PAGE_CAP);
        if limit < query.limit {
            tracing::debug!(
                requested = query.limit,
                "listing limit clamped to the platform page cap"
            );
        }
        format!(
            "{}/r/{}/top.json?t={}&limit={}",
            self.base_url,
            query.subreddit,
            query.window.as_query(),
            limit
        )
    }
}

impl FeedSource for RedditFeed {
    fn top_posts(&self, query: &FeedQuery) -> Result<Vec<Post>> {
        let url = self.listing_url(query);
        tracing::debug!(%url, "fetching listing");
        let body = fetch::get_text(&url)
            .with_context(|| format!("fetch top listing for r/{}", query.subreddit))?;
        let listing: Listing = serde_json::from_str(&body)
            .with_context(|| format!("decode listing JSON for r/{}", query.subreddit))?;
        Ok(listing.into_posts())
    }
}
