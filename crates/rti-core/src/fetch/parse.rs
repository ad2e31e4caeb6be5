//! Parse HTTP response header lines into the fields the resolver uses.

/// Header fields extracted from a response.
#[derive(Debug, Default)]
pub(crate) struct HeaderInfo {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

/// Parse collected header lines. With redirects the collected lines span
/// several responses; the last occurrence of a header wins, which matches
/// the response that actually carried the body.
pub(crate) fn parse_headers(lines: &[String]) -> HeaderInfo {
    let mut info = HeaderInfo::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                info.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    info.content_length = Some(n);
                }
            }
        }
    }

    info
}
