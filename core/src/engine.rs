//! The transfer engine boundary.
//!
//! # Design
//! `Bget` never touches the network itself. It describes a transfer as a
//! `TransferRequest` and hands it to a `TransferEngine`, which returns the
//! raw response text plus metadata. `CurlEngine` is the production engine;
//! tests can substitute their own to stay deterministic.

use std::time::Duration;

use curl::easy::{Easy, Form, InfoType, List};

use crate::error::BgetError;
use crate::http::PostFields;
use crate::options::{CurlOption, OptionSet};

/// Body to send with a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestBody<'a> {
    None,
    /// Sent verbatim as the POST body.
    Raw(&'a [u8]),
    /// Sent as `multipart/form-data`.
    Form(&'a PostFields),
}

/// A transfer described as plain data.
#[derive(Debug, Clone)]
pub struct TransferRequest<'a> {
    pub uri: &'a str,
    pub options: &'a OptionSet,
    /// `Name: value` lines, added after any `HttpHeader` option lines.
    pub headers: Vec<String>,
    pub body: RequestBody<'a>,
}

/// What the engine observed during a transfer.
#[derive(Debug, Clone, Default)]
pub struct TransferResponse {
    /// Response header blocks and body, as received.
    pub raw: String,
    pub status: u32,
    pub effective_url: Option<String>,
    /// Request header blocks as written to the wire.
    pub sent_headers: String,
}

pub trait TransferEngine {
    fn perform(&mut self, request: &TransferRequest<'_>) -> Result<TransferResponse, BgetError>;
}

/// libcurl-backed engine. The handle is reset between transfers so that
/// connections can be reused without options leaking across requests.
pub struct CurlEngine {
    easy: Easy,
}

impl CurlEngine {
    pub fn new() -> Self {
        Self { easy: Easy::new() }
    }
}

impl Default for CurlEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CurlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurlEngine").finish_non_exhaustive()
    }
}

impl TransferEngine for CurlEngine {
    fn perform(&mut self, request: &TransferRequest<'_>) -> Result<TransferResponse, BgetError> {
        let easy = &mut self.easy;
        easy.reset();
        easy.url(request.uri)?;
        easy.show_header(true)?;
        // debug_function only receives data in verbose mode
        easy.verbose(true)?;

        let mut header_lines = Vec::new();
        for option in request.options.iter() {
            match option {
                CurlOption::HttpHeader(lines) => header_lines.extend(lines.iter().cloned()),
                CurlOption::PostFields(fields) => {
                    easy.httppost(build_form(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))?)?
                }
                other => apply_option(easy, other)?,
            }
        }
        header_lines.extend(request.headers.iter().cloned());
        if !header_lines.is_empty() {
            let mut list = List::new();
            for line in &header_lines {
                list.append(line)?;
            }
            easy.http_headers(list)?;
        }

        match request.body {
            RequestBody::None => {}
            RequestBody::Raw(data) => {
                easy.post(true)?;
                easy.post_fields_copy(data)?;
            }
            RequestBody::Form(fields) => easy.httppost(build_form(fields.iter())?)?,
        }

        let mut raw = Vec::new();
        let mut sent = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                raw.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.debug_function(|kind, data| {
                if matches!(kind, InfoType::HeaderOut) {
                    sent.extend_from_slice(data);
                }
            })?;
            transfer.perform()?;
        }

        Ok(TransferResponse {
            raw: String::from_utf8_lossy(&raw).into_owned(),
            status: easy.response_code()?,
            effective_url: easy.effective_url()?.map(str::to_string),
            sent_headers: String::from_utf8_lossy(&sent).into_owned(),
        })
    }
}

fn apply_option(easy: &mut Easy, option: &CurlOption) -> Result<(), curl::Error> {
    match option {
        CurlOption::AutoReferer(on) => easy.autoreferer(*on),
        CurlOption::UserAgent(agent) => easy.useragent(agent),
        CurlOption::UserPwd(credentials) => match credentials.split_once(':') {
            Some((user, pass)) => {
                easy.username(user)?;
                easy.password(pass)
            }
            None => easy.username(credentials),
        },
        CurlOption::HttpProxyTunnel(on) => easy.http_proxy_tunnel(*on),
        CurlOption::Proxy(proxy) => easy.proxy(proxy),
        CurlOption::FollowLocation(on) => easy.follow_location(*on),
        CurlOption::MaxRedirections(max) => easy.max_redirections(*max),
        CurlOption::Referer(referer) => easy.referer(referer),
        CurlOption::Cookie(cookie) => easy.cookie(cookie),
        CurlOption::Timeout(secs) => easy.timeout(Duration::from_secs(*secs)),
        CurlOption::ConnectTimeout(secs) => easy.connect_timeout(Duration::from_secs(*secs)),
        CurlOption::SslVerifyPeer(on) => easy.ssl_verify_peer(*on),
        CurlOption::SslVerifyHost(on) => easy.ssl_verify_host(*on),
        CurlOption::CustomRequest(method) => easy.custom_request(method),
        CurlOption::NoBody(on) => easy.nobody(*on),
        // handled by the caller, they need to be merged with request data
        CurlOption::HttpHeader(_) | CurlOption::PostFields(_) => Ok(()),
    }
}

fn build_form<'a>(fields: impl Iterator<Item = (&'a str, &'a str)>) -> Result<Form, BgetError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form.part(name).contents(value.as_bytes()).add()?;
    }
    Ok(form)
}
