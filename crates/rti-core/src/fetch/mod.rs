//! HTTP plumbing over the curl crate (libcurl).
//!
//! Two blocking primitives: `probe` (a HEAD request returning status plus the
//! content-type/content-length headers, used for extension sniffing) and
//! `get_text` (a bounded GET returning the body as text, used for feed
//! listings and album pages). Both run in the current thread; call from
//! `spawn_blocking` when used from async code.

mod parse;

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;

pub(crate) use parse::parse_headers;

/// User-Agent sent on every request; feed hosts reject the default one.
pub const USER_AGENT: &str = concat!("rti/", env!("CARGO_PKG_VERSION"), " (get top images)");

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const TEXT_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a probe: status plus the headers the resolver cares about.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// HTTP status of the final response (after redirects).
    pub status: u32,
    /// `Content-Type` value if present (e.g. `image/png`).
    pub content_type: Option<String>,
    /// Size in bytes if `Content-Length` is present.
    pub content_length: Option<u64>,
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. Fails on transport errors and on non-2xx statuses;
/// callers treat both as "could not determine".
pub fn probe(url: &str) -> Result<ProbeResult> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.nobody(true)?; // HEAD request
    easy.useragent(USER_AGENT)?;
    easy.follow_location(true)?;
    easy.connect_timeout(CONNECT_TIMEOUT)?;
    easy.timeout(PROBE_TIMEOUT)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform().context("HEAD request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("HEAD {} returned HTTP {}", url, code);
    }

    let info = parse_headers(&headers);
    Ok(ProbeResult {
        status: code,
        content_type: info.content_type,
        content_length: info.content_length,
    })
}

/// Performs a GET request and returns the body as text (lossy UTF-8).
///
/// Follows redirects. Fails on transport errors and on non-2xx statuses.
pub fn get_text(url: &str) -> Result<String> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.useragent(USER_AGENT)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(CONNECT_TIMEOUT)?;
    easy.timeout(TEXT_TIMEOUT)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform().context("GET request failed")?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
