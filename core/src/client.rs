//! Generic transfer client: a URI, engine options and the last raw response.
//!
//! # Design
//! `Bget` forwards options to the engine verbatim and keeps the raw response
//! it got back. It does not interpret the response; `BgetHttp` builds on it
//! for that. Setters return `&mut Self` so calls can be chained.

use crate::engine::{CurlEngine, RequestBody, TransferEngine, TransferRequest, TransferResponse};
use crate::error::BgetError;
use crate::options::{CurlOption, OptionKind, OptionSet};

#[derive(Debug)]
pub struct Bget<E = CurlEngine> {
    uri: String,
    options: OptionSet,
    raw_response: String,
    response_code: Option<u32>,
    effective_url: Option<String>,
    engine: E,
}

impl Bget<CurlEngine> {
    pub fn new(uri: &str) -> Self {
        Self::with_engine(uri, CurlEngine::new())
    }
}

impl Default for Bget<CurlEngine> {
    /// A client with no URI; executing it fails with a malformed-URL error.
    fn default() -> Self {
        Self::new("")
    }
}

impl<E: TransferEngine> Bget<E> {
    pub fn with_engine(uri: &str, engine: E) -> Self {
        Self {
            uri: uri.to_string(),
            options: OptionSet::new(),
            raw_response: String::new(),
            response_code: None,
            effective_url: None,
            engine,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: &str) -> &mut Self {
        self.uri = uri.to_string();
        self
    }

    pub fn option(&self, kind: OptionKind) -> Option<&CurlOption> {
        self.options.get(kind)
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn set_option(&mut self, option: CurlOption) -> &mut Self {
        self.options.set(option);
        self
    }

    pub fn set_options(&mut self, options: impl IntoIterator<Item = CurlOption>) -> &mut Self {
        for option in options {
            self.options.set(option);
        }
        self
    }

    pub fn remove_option(&mut self, kind: OptionKind) -> Option<CurlOption> {
        self.options.remove(kind)
    }

    pub fn raw_response(&self) -> &str {
        &self.raw_response
    }

    /// Replace the raw response, e.g. to parse a captured response offline.
    pub fn set_raw_response(&mut self, raw: impl Into<String>) -> &mut Self {
        self.raw_response = raw.into();
        self
    }

    /// Status code reported by the engine for the last execution.
    pub fn response_code(&self) -> Option<u32> {
        self.response_code
    }

    /// Final URL after any redirects the engine followed.
    pub fn effective_url(&self) -> Option<&str> {
        self.effective_url.as_deref()
    }

    /// Run the transfer with no extra headers and no body.
    pub fn execute(&mut self) -> Result<&mut Self, BgetError> {
        self.perform(Vec::new(), RequestBody::None)?;
        Ok(self)
    }

    /// Run a transfer and record its outcome. Returns the full engine
    /// response so `BgetHttp` can read the request header echo.
    pub(crate) fn perform(
        &mut self,
        headers: Vec<String>,
        body: RequestBody<'_>,
    ) -> Result<TransferResponse, BgetError> {
        let request = TransferRequest {
            uri: &self.uri,
            options: &self.options,
            headers,
            body,
        };
        log::debug!("executing transfer for {:?}", self.uri);
        let response = match self.engine.perform(&request) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("transfer for {:?} failed: {e}", self.uri);
                return Err(e);
            }
        };
        log::debug!(
            "transfer for {:?} finished with status {} ({} bytes)",
            self.uri,
            response.status,
            response.raw.len()
        );
        self.raw_response = response.raw.clone();
        self.response_code = Some(response.status);
        self.effective_url = response.effective_url.clone();
        Ok(response)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Engine that replays a canned response and records what it was asked.
    #[derive(Debug, Default)]
    pub(crate) struct FakeEngine {
        pub response: TransferResponse,
        pub fail_with: Option<i32>,
        pub seen_headers: Vec<String>,
        pub seen_body: Option<String>,
        pub calls: usize,
    }

    impl TransferEngine for FakeEngine {
        fn perform(&mut self, request: &TransferRequest<'_>) -> Result<TransferResponse, BgetError> {
            self.calls += 1;
            if let Some(code) = self.fail_with {
                return Err(BgetError::Transfer {
                    code,
                    message: "fake failure".to_string(),
                });
            }
            if request.uri.is_empty() {
                return Err(BgetError::Transfer {
                    code: 3,
                    message: "URL using bad/illegal format or missing URL".to_string(),
                });
            }
            self.seen_headers = request.headers.clone();
            self.seen_body = match request.body {
                RequestBody::None => None,
                RequestBody::Raw(data) => Some(String::from_utf8_lossy(data).into_owned()),
                RequestBody::Form(fields) => Some(
                    fields
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join("&"),
                ),
            };
            Ok(self.response.clone())
        }
    }

    fn client() -> Bget<FakeEngine> {
        Bget::with_engine("http://localhost/", FakeEngine::default())
    }

    #[test]
    fn uri_from_constructor_and_setter() {
        let mut bg = client();
        assert_eq!(bg.uri(), "http://localhost/");
        assert_eq!(bg.set_uri("http://localhost/foo").uri(), "http://localhost/foo");
    }

    #[test]
    fn single_options_are_chained_and_read_back() {
        let mut bg = client();
        bg.set_option(CurlOption::AutoReferer(true))
            .set_option(CurlOption::UserAgent("Better Getter".to_string()));
        assert_eq!(
            bg.option(OptionKind::UserAgent),
            Some(&CurlOption::UserAgent("Better Getter".to_string()))
        );
        let all: Vec<&CurlOption> = bg.options().iter().collect();
        assert_eq!(
            all,
            vec![
                &CurlOption::AutoReferer(true),
                &CurlOption::UserAgent("Better Getter".to_string())
            ]
        );
    }

    #[test]
    fn bulk_options_match_what_was_set() {
        let opts = vec![
            CurlOption::AutoReferer(true),
            CurlOption::UserAgent("Better Getter".to_string()),
            CurlOption::UserPwd("foo:bar".to_string()),
            CurlOption::HttpProxyTunnel(false),
        ];
        let mut bg = client();
        bg.set_options(opts.clone());
        assert_eq!(bg.options(), &opts.into_iter().collect::<OptionSet>());
    }

    #[test]
    fn generic_client_accepts_any_option() {
        let mut bg = client();
        bg.set_option(CurlOption::HttpHeader(vec!["X-Foo: Bar".to_string()]));
        assert!(bg.option(OptionKind::HttpHeader).is_some());
        assert!(bg.remove_option(OptionKind::HttpHeader).is_some());
        assert!(bg.options().is_empty());
    }

    #[test]
    fn execute_stores_raw_response_and_metadata() {
        let mut bg = client();
        bg.engine.response = TransferResponse {
            raw: "HTTP/1.1 200 OK\r\n\r\nhello".to_string(),
            status: 200,
            effective_url: Some("http://localhost/".to_string()),
            sent_headers: String::new(),
        };
        bg.execute().unwrap();
        assert_eq!(bg.raw_response(), "HTTP/1.1 200 OK\r\n\r\nhello");
        assert_eq!(bg.response_code(), Some(200));
        assert_eq!(bg.effective_url(), Some("http://localhost/"));
    }

    #[test]
    fn execute_without_uri_fails_with_code_3() {
        let mut bg = Bget::with_engine("", FakeEngine::default());
        let err = bg.execute().unwrap_err();
        assert!(matches!(err, BgetError::Transfer { code: 3, .. }));
        assert_eq!(bg.response_code(), None);
    }

    #[test]
    fn failed_execute_keeps_previous_response() {
        let mut bg = client();
        bg.set_raw_response("previous");
        bg.engine.fail_with = Some(7);
        assert!(bg.execute().is_err());
        assert_eq!(bg.raw_response(), "previous");
    }
}
