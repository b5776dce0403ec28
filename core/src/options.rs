//! Typed transfer-engine options.
//!
//! # Design
//! Each `CurlOption` variant corresponds to one libcurl option and carries
//! its value. An `OptionSet` keeps at most one value per option, keyed by
//! `OptionKind`, so setting an option twice replaces the first value.
//! Options serialize as `{"option": "user_agent", "value": "..."}`, which
//! is the shape configuration files use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single transfer option and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "option", content = "value", rename_all = "snake_case")]
pub enum CurlOption {
    AutoReferer(bool),
    UserAgent(String),
    /// `user:password` for server authentication.
    UserPwd(String),
    HttpProxyTunnel(bool),
    Proxy(String),
    FollowLocation(bool),
    MaxRedirections(u32),
    Referer(String),
    Cookie(String),
    /// Whole-transfer timeout in seconds.
    Timeout(u64),
    /// Connection phase timeout in seconds.
    ConnectTimeout(u64),
    SslVerifyPeer(bool),
    SslVerifyHost(bool),
    CustomRequest(String),
    NoBody(bool),
    /// Raw `Name: value` request header lines.
    HttpHeader(Vec<String>),
    /// Multipart form fields.
    PostFields(Vec<(String, String)>),
}

/// Identifies an option independently of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKind {
    AutoReferer,
    UserAgent,
    UserPwd,
    HttpProxyTunnel,
    Proxy,
    FollowLocation,
    MaxRedirections,
    Referer,
    Cookie,
    Timeout,
    ConnectTimeout,
    SslVerifyPeer,
    SslVerifyHost,
    CustomRequest,
    NoBody,
    HttpHeader,
    PostFields,
}

impl CurlOption {
    pub fn kind(&self) -> OptionKind {
        match self {
            CurlOption::AutoReferer(_) => OptionKind::AutoReferer,
            CurlOption::UserAgent(_) => OptionKind::UserAgent,
            CurlOption::UserPwd(_) => OptionKind::UserPwd,
            CurlOption::HttpProxyTunnel(_) => OptionKind::HttpProxyTunnel,
            CurlOption::Proxy(_) => OptionKind::Proxy,
            CurlOption::FollowLocation(_) => OptionKind::FollowLocation,
            CurlOption::MaxRedirections(_) => OptionKind::MaxRedirections,
            CurlOption::Referer(_) => OptionKind::Referer,
            CurlOption::Cookie(_) => OptionKind::Cookie,
            CurlOption::Timeout(_) => OptionKind::Timeout,
            CurlOption::ConnectTimeout(_) => OptionKind::ConnectTimeout,
            CurlOption::SslVerifyPeer(_) => OptionKind::SslVerifyPeer,
            CurlOption::SslVerifyHost(_) => OptionKind::SslVerifyHost,
            CurlOption::CustomRequest(_) => OptionKind::CustomRequest,
            CurlOption::NoBody(_) => OptionKind::NoBody,
            CurlOption::HttpHeader(_) => OptionKind::HttpHeader,
            CurlOption::PostFields(_) => OptionKind::PostFields,
        }
    }
}

/// At most one value per `OptionKind`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: BTreeMap<OptionKind, CurlOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `option`, returning the value it replaced.
    pub fn set(&mut self, option: CurlOption) -> Option<CurlOption> {
        self.options.insert(option.kind(), option)
    }

    pub fn get(&self, kind: OptionKind) -> Option<&CurlOption> {
        self.options.get(&kind)
    }

    pub fn remove(&mut self, kind: OptionKind) -> Option<CurlOption> {
        self.options.remove(&kind)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurlOption> {
        self.options.values()
    }
}

impl FromIterator<CurlOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = CurlOption>>(iter: I) -> Self {
        let mut set = OptionSet::new();
        for option in iter {
            set.set(option);
        }
        set
    }
}
