//! URL resolution: turn one post URL into zero or more concrete image URLs.
//!
//! A post URL is classified once, and exactly one strategy runs per kind:
//!
//! 1. `DirectImage`: the URL already ends in a recognized extension; it is
//!    yielded unchanged with no network traffic.
//! 2. `AlbumLike`: an imgur album/gallery page; the HTML is fetched and
//!    every post-image node's `src` is extracted.
//! 3. `Unknown`: anything else; a `.jpg` candidate is probed and the
//!    declared content-type decides the real extension.
//!
//! Resolution never fails with an error: a post that cannot be resolved
//! produces `Resolution::Empty` with a reason, so one bad post cannot stop
//! the rest of the feed.

pub mod album;
pub mod sniff;

use std::fmt;
use url::Url;

/// Extensions accepted as image content, and the only ones ever yielded.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Shape-based classification of a post URL. First match wins; the order is
/// fixed (suffix check, then album markers, then fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Ends with a recognized image extension token.
    DirectImage,
    /// Imgur host with an `/a/` or `/gallery/` path marker.
    AlbumLike,
    /// Neither; the sniffing fallback applies.
    Unknown,
}

impl UrlKind {
    /// Classify a post URL.
    ///
    /// The extension check is a literal, case-sensitive suffix match on the
    /// extension token; no dot is required before it.
    pub fn classify(url: &str) -> UrlKind {
        if IMAGE_EXTENSIONS.iter().any(|ext| url.ends_with(ext)) {
            return UrlKind::DirectImage;
        }
        if let Ok(parsed) = Url::parse(url) {
            let imgur_host = parsed
                .host_str()
                .map(|h| h.contains("imgur"))
                .unwrap_or(false);
            let path = parsed.path();
            if imgur_host && (path.contains("/a/") || path.contains("/gallery/")) {
                return UrlKind::AlbumLike;
            }
        }
        UrlKind::Unknown
    }
}

/// Why a post produced no images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The sniff completed and the declared content-type is not an image.
    NotAnImage,
    /// The sniff probe failed (non-2xx, timeout, transport error);
    /// nothing could be determined about the URL.
    SniffFailed(String),
    /// The album page was fetched and parsed but exposed no usable images.
    NoAlbumImages,
    /// The album page could not be fetched.
    AlbumFetchFailed(String),
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NotAnImage => write!(f, "not an image"),
            EmptyReason::SniffFailed(e) => write!(f, "sniff failed: {e}"),
            EmptyReason::NoAlbumImages => write!(f, "album exposed no images"),
            EmptyReason::AlbumFetchFailed(e) => write!(f, "album fetch failed: {e}"),
        }
    }
}

/// Result of resolving one post URL. `Images` URLs are guaranteed by this
/// module's contract to end in one of [`IMAGE_EXTENSIONS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Images(Vec<String>),
    Empty(EmptyReason),
}

impl Resolution {
    /// The resolved URLs, empty when there are none.
    pub fn images(&self) -> &[String] {
        match self {
            Resolution::Images(urls) => urls,
            Resolution::Empty(_) => &[],
        }
    }
}

/// Resolve one post URL. Performs network traffic only for the album and
/// sniffing branches; re-resolving repeats it.
pub fn resolve(post_url: &str) -> Resolution {
    match UrlKind::classify(post_url) {
        UrlKind::DirectImage => Resolution::Images(vec![post_url.to_string()]),
        UrlKind::AlbumLike => album::expand(post_url),
        UrlKind::Unknown => sniff::sniff(post_url),
    }
}
