//! Better Getter: a small HTTP client over libcurl.
//!
//! # Overview
//! `Bget` forwards typed options to the transfer engine and keeps the raw
//! response. `BgetHttp` adds request headers, POST bodies and splitting of
//! the raw response into status line, headers and body.
//!
//! # Design
//! - The network sits behind the `TransferEngine` trait; `CurlEngine` is the
//!   libcurl implementation, tests plug in their own.
//! - Response splitting is a pure function over text (`response::split`) and
//!   can be used on captured responses without a client.
//! - All failures are variants of `BgetError`.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod headers;
pub mod http;
pub mod options;
pub mod response;

pub use client::Bget;
pub use config::BgetConfig;
pub use engine::{CurlEngine, RequestBody, TransferEngine, TransferRequest, TransferResponse};
pub use error::{BgetError, ConfigErrorCode};
pub use headers::HeaderMap;
pub use http::{BgetHttp, PostFields};
pub use options::{CurlOption, OptionKind, OptionSet};
pub use response::{ResponseStatus, SplitResponse};
