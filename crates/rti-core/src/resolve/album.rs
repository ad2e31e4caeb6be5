//! Album/gallery expansion: extract image URLs from an imgur album page.
//!
//! The page markup wraps each picture in a post-image container whose `img`
//! carries a scheme-relative `src` (`//host/id`). Nodes without a usable
//! `src` are skipped; partial extraction is expected, not an error.

use scraper::{Html, Selector};

use super::{EmptyReason, Resolution};
use crate::fetch;

/// Container markup for one picture on an album page.
const POST_IMAGE_SELECTOR: &str = "div.post-image img";

/// Fetch an album page and expand it to image URLs in document order.
pub fn expand(album_url: &str) -> Resolution {
    let html = match fetch::get_text(album_url) {
        Ok(html) => html,
        Err(e) => {
            tracing::debug!(url = album_url, error = %e, "album page fetch failed");
            return Resolution::Empty(EmptyReason::AlbumFetchFailed(format!("{e:#}")));
        }
    };

    let links = image_links(&html);
    if links.is_empty() {
        Resolution::Empty(EmptyReason::NoAlbumImages)
    } else {
        Resolution::Images(links)
    }
}

/// Extract normalized image URLs from album page markup, in document order.
pub fn image_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(POST_IMAGE_SELECTOR).expect("valid post-image selector");
    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(normalize_src)
        .collect()
}

/// Prefix scheme-relative sources with `https:`; pass absolute URLs through;
/// anything else is unusable.
fn normalize_src(src: &str) -> Option<String> {
    if src.starts_with("//") {
        Some(format!("https:{src}"))
    } else if src.starts_with("http://") || src.starts_with("https://") {
        Some(src.to_string())
    } else {
        None
    }
}
