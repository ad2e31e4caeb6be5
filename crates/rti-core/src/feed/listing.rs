//! Serde types mirroring the listing wire format.
//!
//! A listing is `{"data": {"children": [{"data": {...post...}}, ...]}}`.
//! Only the fields the engine reads are modeled; everything else is ignored.

use serde::Deserialize;

use super::Post;

#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingChild {
    pub data: ChildData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChildData {
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub score: i64,
}

impl Listing {
    /// Posts in listing (ranking) order; children without a URL are dropped.
    pub(crate) fn into_posts(self) -> Vec<Post> {
        self.data
            .children
            .into_iter()
            .filter_map(|child| {
                let data = child.data;
                data.url.map(|url| Post {
                    url,
                    title: data.title,
                    score: data.score,
                })
            })
            .collect()
    }
}
