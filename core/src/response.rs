//! Splitting raw HTTP responses into status, headers and body.
//!
//! # Design
//! The transfer engine hands back the response exactly as it came off the
//! wire, header block included. [`split`] finds the first blank line, parses
//! the block before it and returns everything after it untouched as the
//! body. A block whose first line is not an `HTTP/x NNN` status line is not
//! a header block, so a response without one fails with
//! [`BgetError::HeadersNotExtractable`] just like a response without a blank
//! line. Nothing is returned on failure.
//!
//! libcurl writes every header block it receives: interim `1xx` replies,
//! followed redirects and proxy tunnel confirmations each precede the final
//! response. Such a block is skipped only when another header block follows
//! it, so a lone `103 Early Hints` or a `101` followed by upgraded bytes is
//! returned as the response itself.

use crate::error::BgetError;
use crate::headers::HeaderMap;

const BOUNDARY: &str = "\r\n\r\n";
const LINE_END: &str = "\r\n";

/// The parsed first line of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStatus {
    pub protocol: String,
    pub code: u16,
    pub status: String,
}

/// A raw response split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResponse {
    pub status: ResponseStatus,
    pub headers: HeaderMap,
    pub body: String,
}

/// Split `raw` into status line, headers and body, assuming the engine
/// followed redirects.
///
/// A `3xx` block followed by another header block is taken to be a followed
/// redirect and skipped. A redirect body that itself looks like a response
/// would be skipped too; use [`split_with_redirects`] with `false` when
/// redirects were not followed.
pub fn split(raw: &str) -> Result<SplitResponse, BgetError> {
    split_with_redirects(raw, true)
}

/// Split `raw`, skipping `3xx` blocks only when `followed_redirects` is set.
pub fn split_with_redirects(
    raw: &str,
    followed_redirects: bool,
) -> Result<SplitResponse, BgetError> {
    let (mut status, mut headers, mut body) = split_block(raw)?;
    while let Some((next_status, next_headers, next_body)) =
        following_block(&status, body, followed_redirects)
    {
        log::debug!(
            "skipping interim {} {} header block",
            status.code,
            status.status
        );
        status = next_status;
        headers = next_headers;
        body = next_body;
    }
    Ok(SplitResponse {
        status,
        headers,
        body: body.to_string(),
    })
}

/// Parse a request header echo (as written by the engine) into a map.
///
/// Only the last block counts: after a redirect the engine writes one block
/// per request and the last one is what produced the final response. The
/// request line of each block is not a header and is skipped.
pub fn parse_request_headers(echo: &str) -> HeaderMap {
    let block = echo
        .split(BOUNDARY)
        .filter(|block| !block.trim().is_empty())
        .last()
        .unwrap_or("");
    let mut headers = HeaderMap::new();
    for line in block.split(LINE_END).skip(1) {
        parse_header_line(&mut headers, line);
    }
    headers
}

fn split_block(raw: &str) -> Result<(ResponseStatus, HeaderMap, &str), BgetError> {
    let (head, body) = raw
        .split_once(BOUNDARY)
        .ok_or(BgetError::HeadersNotExtractable)?;
    let mut lines = head.split(LINE_END);
    let status = lines
        .next()
        .and_then(parse_status_line)
        .ok_or(BgetError::HeadersNotExtractable)?;
    let mut headers = HeaderMap::new();
    for line in lines {
        parse_header_line(&mut headers, line);
    }
    Ok((status, headers, body))
}

fn parse_status_line(line: &str) -> Option<ResponseStatus> {
    let (protocol, rest) = line.split_once(' ')?;
    if !protocol.starts_with("HTTP/") {
        return None;
    }
    let (code, status) = rest.split_once(' ').unwrap_or((rest, ""));
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(ResponseStatus {
        protocol: protocol.to_string(),
        code: code.parse().ok()?,
        status: status.to_string(),
    })
}

fn parse_header_line(headers: &mut HeaderMap, line: &str) {
    if line.starts_with([' ', '\t']) {
        // obsolete line folding
        if let Some(value) = headers.last_value_mut() {
            let folded = line.trim();
            if !folded.is_empty() {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(folded);
            }
            return;
        }
    }
    match line.split_once(':') {
        Some((name, value)) => headers.append(name.trim(), value.trim()),
        None if line.is_empty() => {}
        None => log::debug!("ignoring header line without a colon: {line:?}"),
    }
}

/// Parse the next block in `rest` when the block just parsed only precedes
/// the response the caller wants.
fn following_block<'a>(
    status: &ResponseStatus,
    rest: &'a str,
    followed_redirects: bool,
) -> Option<(ResponseStatus, HeaderMap, &'a str)> {
    let precedes_another = (100..200).contains(&status.code)
        || (followed_redirects && (300..400).contains(&status.code))
        || status.status.eq_ignore_ascii_case("connection established");
    if !precedes_another {
        return None;
    }
    split_block(rest).ok()
}
