//! HTTP layer over `Bget`: request headers, POST bodies and parsed responses.
//!
//! # Design
//! Request headers and POST fields have dedicated accessors, so the generic
//! option setter refuses `HttpHeader` and `PostFields` with a
//! [`BgetError::Config`] and leaves the client untouched.
//!
//! Before execution `request_header*` return the headers the caller declared.
//! After a successful execution they return what the engine actually wrote,
//! which includes headers it added itself (`Host`, multipart
//! `Content-Type`, ...).
//!
//! A raw POST body takes precedence over POST fields. The fields are kept,
//! so clearing the raw body sends them again as `multipart/form-data`.

use crate::client::Bget;
use crate::engine::{CurlEngine, RequestBody, TransferEngine};
use crate::error::{BgetError, ConfigErrorCode};
use crate::headers::HeaderMap;
use crate::options::{CurlOption, OptionKind, OptionSet};
use crate::response::{self, ResponseStatus, SplitResponse};

/// Ordered POST fields. Setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    fields: Vec<(String, String)>,
}

impl PostFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set `name` to `value`, or remove it when `value` is `None`.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        let position = self.fields.iter().position(|(existing, _)| existing == name);
        match (position, value) {
            (Some(i), Some(value)) => self.fields[i].1 = value.to_string(),
            (None, Some(value)) => self.fields.push((name.to_string(), value.to_string())),
            (Some(i), None) => {
                self.fields.remove(i);
            }
            (None, None) => {}
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for PostFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = PostFields::new();
        for (name, value) in iter {
            fields.set(name.as_ref(), Some(value.as_ref()));
        }
        fields
    }
}

#[derive(Debug)]
pub struct BgetHttp<E = CurlEngine> {
    inner: Bget<E>,
    declared_headers: HeaderMap,
    sent_headers: Option<HeaderMap>,
    post_fields: PostFields,
    raw_post_data: Option<String>,
    parsed: Option<SplitResponse>,
}

impl BgetHttp<CurlEngine> {
    pub fn new(uri: &str) -> Self {
        Self::with_engine(uri, CurlEngine::new())
    }
}

impl Default for BgetHttp<CurlEngine> {
    fn default() -> Self {
        Self::new("")
    }
}

fn check_option(option: &CurlOption) -> Result<(), BgetError> {
    match option.kind() {
        OptionKind::HttpHeader => Err(BgetError::Config(ConfigErrorCode::UseSetRequestHeader)),
        OptionKind::PostFields => Err(BgetError::Config(ConfigErrorCode::UseSetPostField)),
        _ => Ok(()),
    }
}

impl<E: TransferEngine> BgetHttp<E> {
    pub fn with_engine(uri: &str, engine: E) -> Self {
        Self {
            inner: Bget::with_engine(uri, engine),
            declared_headers: HeaderMap::new(),
            sent_headers: None,
            post_fields: PostFields::new(),
            raw_post_data: None,
            parsed: None,
        }
    }

    pub fn engine(&self) -> &E {
        self.inner.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.inner.engine_mut()
    }

    pub fn uri(&self) -> &str {
        self.inner.uri()
    }

    pub fn set_uri(&mut self, uri: &str) -> &mut Self {
        self.inner.set_uri(uri);
        self
    }

    pub fn option(&self, kind: OptionKind) -> Option<&CurlOption> {
        self.inner.option(kind)
    }

    pub fn options(&self) -> &OptionSet {
        self.inner.options()
    }

    pub fn set_option(&mut self, option: CurlOption) -> Result<&mut Self, BgetError> {
        check_option(&option)?;
        self.inner.set_option(option);
        Ok(self)
    }

    /// Set several options. Nothing is applied if any of them is refused.
    pub fn set_options(
        &mut self,
        options: impl IntoIterator<Item = CurlOption>,
    ) -> Result<&mut Self, BgetError> {
        let options: Vec<CurlOption> = options.into_iter().collect();
        options.iter().try_for_each(check_option)?;
        self.inner.set_options(options);
        Ok(self)
    }

    pub fn remove_option(&mut self, kind: OptionKind) -> Option<CurlOption> {
        self.inner.remove_option(kind)
    }

    // --- request headers ---

    fn request_header_map(&self) -> &HeaderMap {
        self.sent_headers.as_ref().unwrap_or(&self.declared_headers)
    }

    pub fn request_header(&self, name: &str) -> Option<&[String]> {
        self.request_header_map().get(name)
    }

    pub fn request_headers(&self) -> &HeaderMap {
        self.request_header_map()
    }

    /// Set `name` to a single value, replacing any earlier values.
    pub fn set_request_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.declared_headers.set(name, vec![value.to_string()]);
        self
    }

    pub fn set_request_header_values(&mut self, name: &str, values: Vec<String>) -> &mut Self {
        self.declared_headers.set(name, values);
        self
    }

    /// Replace every header named in `headers`; others are kept.
    pub fn set_request_headers(&mut self, headers: HeaderMap) -> &mut Self {
        self.declared_headers.extend_replacing(headers);
        self
    }

    pub fn remove_request_header(&mut self, name: &str) -> &mut Self {
        self.declared_headers.remove(name);
        self
    }

    // --- POST data ---

    pub fn post_field(&self, name: &str) -> Option<&str> {
        self.post_fields.get(name)
    }

    pub fn post_fields(&self) -> &PostFields {
        &self.post_fields
    }

    /// Set a POST field, or remove it when `value` is `None`.
    pub fn set_post_field(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.post_fields.set(name, value);
        self
    }

    pub fn set_post_fields<K: AsRef<str>, V: AsRef<str>>(
        &mut self,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self {
        for (name, value) in fields {
            self.post_fields.set(name.as_ref(), Some(value.as_ref()));
        }
        self
    }

    pub fn raw_post_data(&self) -> Option<&str> {
        self.raw_post_data.as_deref()
    }

    pub fn set_raw_post_data(&mut self, data: Option<&str>) -> &mut Self {
        self.raw_post_data = data.map(str::to_string);
        self
    }

    // --- execution and response ---

    pub fn raw_response(&self) -> &str {
        self.inner.raw_response()
    }

    /// Replace the raw response. Any earlier parse result is discarded.
    pub fn set_raw_response(&mut self, raw: impl Into<String>) -> &mut Self {
        self.inner.set_raw_response(raw);
        self.parsed = None;
        self
    }

    pub fn response_code(&self) -> Option<u32> {
        self.inner.response_code()
    }

    pub fn effective_url(&self) -> Option<&str> {
        self.inner.effective_url()
    }

    /// Send the request and parse the response.
    pub fn execute(&mut self) -> Result<&mut Self, BgetError> {
        let body = match (&self.raw_post_data, self.post_fields.is_empty()) {
            (Some(data), _) => RequestBody::Raw(data.as_bytes()),
            (None, false) => RequestBody::Form(&self.post_fields),
            (None, true) => RequestBody::None,
        };
        let response = self.inner.perform(self.declared_headers.to_lines(), body)?;
        self.sent_headers = Some(response::parse_request_headers(&response.sent_headers));
        self.parsed = None;
        self.split_response()
    }

    /// Parse the current raw response into status, headers and body.
    ///
    /// `3xx` header blocks are only skipped as followed redirects when
    /// `FollowLocation(true)` is set.
    pub fn split_response(&mut self) -> Result<&mut Self, BgetError> {
        self.parsed = None;
        let followed = matches!(
            self.inner.option(OptionKind::FollowLocation),
            Some(CurlOption::FollowLocation(true))
        );
        self.parsed = Some(response::split_with_redirects(
            self.inner.raw_response(),
            followed,
        )?);
        Ok(self)
    }

    pub fn response_status(&self) -> Option<&ResponseStatus> {
        self.parsed.as_ref().map(|parsed| &parsed.status)
    }

    pub fn response_headers(&self) -> Option<&HeaderMap> {
        self.parsed.as_ref().map(|parsed| &parsed.headers)
    }

    pub fn response_header(&self, name: &str) -> Option<&[String]> {
        self.response_headers()?.get(name)
    }

    pub fn response_body(&self) -> Option<&str> {
        self.parsed.as_ref().map(|parsed| parsed.body.as_str())
    }
}
