//! Extension sniffing: probe a URL with no recognizable extension.
//!
//! A `.jpg` candidate is probed with a HEAD request; the declared
//! content-type subtype, not the guessed extension, determines what gets
//! appended to the original URL. A failed probe is inconclusive, never an
//! error: the post simply yields nothing.

use super::{EmptyReason, Resolution, IMAGE_EXTENSIONS};
use crate::fetch;

/// Extension appended to build the probe candidate.
const CANDIDATE_EXTENSION: &str = "jpg";

/// Probe `url + ".jpg"` and yield `url + "." + declared subtype` when the
/// subtype is a recognized image extension.
pub fn sniff(url: &str) -> Resolution {
    let candidate = format!("{url}.{CANDIDATE_EXTENSION}");
    let probe = match fetch::probe(&candidate) {
        Ok(probe) => probe,
        Err(e) => {
            tracing::debug!(url, error = %e, "sniff probe failed");
            return Resolution::Empty(EmptyReason::SniffFailed(format!("{e:#}")));
        }
    };

    let subtype = match probe.content_type.as_deref().and_then(subtype_of) {
        Some(subtype) => subtype.to_string(),
        None => {
            tracing::debug!(url, "sniff response had no usable content-type");
            return Resolution::Empty(EmptyReason::SniffFailed(
                "no content-type in response".to_string(),
            ));
        }
    };

    if IMAGE_EXTENSIONS.contains(&subtype.as_str()) {
        Resolution::Images(vec![format!("{url}.{subtype}")])
    } else {
        tracing::debug!(url, subtype, "sniffed content-type is not an image");
        Resolution::Empty(EmptyReason::NotAnImage)
    }
}

/// The subtype of a content-type value: `image/png; charset=x` → `png`.
fn subtype_of(content_type: &str) -> Option<&str> {
    let essence = content_type.split(';').next().unwrap_or(content_type).trim();
    let (_, subtype) = essence.split_once('/')?;
    Some(subtype)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_plain() {
        assert_eq!(subtype_of("image/png"), Some("png"));
        assert_eq!(subtype_of("image/jpeg"), Some("jpeg"));
    }

    #[test]
    fn subtype_with_parameters() {
        assert_eq!(subtype_of("image/gif; charset=binary"), Some("gif"));
    }

    #[test]
    fn subtype_without_slash() {
        assert_eq!(subtype_of("png"), None);
    }

    #[test]
    fn unrecognized_subtypes_are_not_images() {
        for ct in ["text/html", "image/svg+xml", "application/json"] {
            let subtype = subtype_of(ct).unwrap();
            assert!(!IMAGE_EXTENSIONS.contains(&subtype));
        }
    }
}
