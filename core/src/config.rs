//! JSON configuration for `BgetHttp`.
//!
//! ```json
//! {
//!   "uri": "http://localhost:3000/",
//!   "options": [{"option": "user_agent", "value": "Bget"}],
//!   "headers": {"X-Foo": ["Bar", "Baz"]},
//!   "post_fields": {"foo": "bar"}
//! }
//! ```
//!
//! Everything is applied through the same setters a caller would use, so a
//! header smuggled in through `options` is refused exactly as it would be at
//! runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::TransferEngine;
use crate::error::BgetError;
use crate::http::BgetHttp;
use crate::options::CurlOption;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgetConfig {
    pub uri: String,
    #[serde(default)]
    pub options: Vec<CurlOption>,
    #[serde(default)]
    pub headers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub post_fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_post_data: Option<String>,
}

impl BgetConfig {
    pub fn from_json(json: &str) -> Result<Self, BgetError> {
        serde_json::from_str(json).map_err(|e| BgetError::Deserialization(e.to_string()))
    }
}

impl<E: TransferEngine> BgetHttp<E> {
    /// Build a client from `config`, running on `engine`.
    pub fn from_config_with_engine(config: BgetConfig, engine: E) -> Result<Self, BgetError> {
        let mut client = BgetHttp::with_engine(&config.uri, engine);
        client.set_options(config.options)?;
        for (name, values) in config.headers {
            client.set_request_header_values(&name, values);
        }
        client.set_post_fields(config.post_fields);
        client.set_raw_post_data(config.raw_post_data.as_deref());
        Ok(client)
    }
}

impl BgetHttp {
    pub fn from_config(config: BgetConfig) -> Result<Self, BgetError> {
        Self::from_config_with_engine(config, crate::engine::CurlEngine::new())
    }
}
