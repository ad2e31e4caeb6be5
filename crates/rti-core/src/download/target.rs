//! Download target derivation: filename and destination directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default directory under `$HOME` when no destination is configured.
pub const DEFAULT_SUBDIR: &str = "reddit_pics";

/// Characters in a URL tail that must not reach the filesystem.
const RESERVED: [char; 2] = ['?', '&'];

/// How many trailing characters of the URL's final segment to keep.
const TAIL_LEN: usize = 10;

/// Derive the target filename for a concrete image URL.
///
/// The tail is the last `/`-separated segment of the raw URL (a query string,
/// if any, stays in the segment), truncated to its last 10 characters unless
/// `long_names` is set. `?` and `&` become `_`. The label (typically the
/// subreddit) is prepended with an underscore.
///
/// Two URLs sharing a label and a 10-character tail collide; the second is
/// then treated as already downloaded. This is the accepted trade-off of the
/// short scheme; `long_names` widens the identifier to the whole segment.
pub fn derive_filename(label: &str, url: &str, long_names: bool) -> String {
    let segment = url.rsplit('/').next().unwrap_or(url);
    let tail = if long_names {
        segment
    } else {
        last_chars(segment, TAIL_LEN)
    };
    let cleaned: String = tail
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();
    format!("{label}_{cleaned}")
}

/// The last `n` characters of `s` (the whole string when shorter).
fn last_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Resolve the destination directory.
///
/// With a destination string: `~` expands to `$HOME`, absolute paths are used
/// as-is, and relative paths are joined under `$HOME`. Without one, the
/// default is `$HOME/reddit_pics`.
pub fn resolve_destination(destination: Option<&str>) -> Result<PathBuf> {
    // Absolute overrides do not touch $HOME at all.
    if let Some(dst) = destination {
        if Path::new(dst).is_absolute() {
            return Ok(PathBuf::from(dst));
        }
    }
    let home = home_dir()?;
    Ok(resolve_destination_in(&home, destination))
}

fn resolve_destination_in(home: &Path, destination: Option<&str>) -> PathBuf {
    match destination {
        None | Some("") => home.join(DEFAULT_SUBDIR),
        Some("~") => home.to_path_buf(),
        Some(dst) => {
            if let Some(rest) = dst.strip_prefix("~/") {
                home.join(rest)
            } else {
                let path = Path::new(dst);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    home.join(path)
                }
            }
        }
    }
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .context("HOME is not set; cannot resolve the download directory")
}
