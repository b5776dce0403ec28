//! Error types for the Better Getter client.
//!
//! # Design
//! Every failure is a variant of one enum so callers branch with `match`
//! instead of inspecting error types. Each variant maps to a stable numeric
//! code via [`BgetError::code`]. For `Transfer` that is libcurl's own
//! `CURLcode` (3 is a malformed or empty URL); every other variant has a
//! symbolic code from 1000 up, clear of libcurl's range.

use std::fmt;

/// Options that must go through a dedicated accessor on `BgetHttp` rather
/// than the generic option setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    /// `HttpHeader` was passed to `set_option`; use `set_request_header`.
    UseSetRequestHeader,

    /// `PostFields` was passed to `set_option`; use `set_post_field`.
    UseSetPostField,
}

impl ConfigErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ConfigErrorCode::UseSetRequestHeader => 1001,
            ConfigErrorCode::UseSetPostField => 1002,
        }
    }
}

/// Errors returned by `Bget` and `BgetHttp`.
#[derive(Debug)]
pub enum BgetError {
    /// The transfer engine failed (DNS, connect, TLS, malformed URI).
    Transfer { code: i32, message: String },

    /// A disallowed option was set through the generic setter.
    Config(ConfigErrorCode),

    /// No HTTP header block could be found in the raw response.
    HeadersNotExtractable,

    /// A JSON configuration could not be deserialized.
    Deserialization(String),

    /// libcurl refused a multipart form part. `code` is a `CURLFORMcode`,
    /// not a `CURLcode`.
    Form { code: i32, message: String },
}

impl BgetError {
    /// Numeric code for the failure, stable across releases.
    pub fn code(&self) -> i32 {
        match self {
            BgetError::Transfer { code, .. } => *code,
            BgetError::Config(code) => code.code(),
            BgetError::HeadersNotExtractable => 1003,
            BgetError::Deserialization(_) => 1004,
            BgetError::Form { .. } => 1005,
        }
    }
}

impl fmt::Display for BgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BgetError::Transfer { code, message } => {
                write!(f, "transfer failed ({code}): {message}")
            }
            BgetError::Config(ConfigErrorCode::UseSetRequestHeader) => {
                write!(f, "request headers must be set with set_request_header()")
            }
            BgetError::Config(ConfigErrorCode::UseSetPostField) => {
                write!(f, "POST fields must be set with set_post_field()")
            }
            BgetError::HeadersNotExtractable => {
                write!(f, "HTTP headers could not be extracted from the response")
            }
            BgetError::Deserialization(msg) => {
                write!(f, "configuration could not be read: {msg}")
            }
            BgetError::Form { code, message } => {
                write!(f, "multipart form rejected ({code}): {message}")
            }
        }
    }
}

impl std::error::Error for BgetError {}

impl From<curl::Error> for BgetError {
    fn from(e: curl::Error) -> Self {
        let message = match e.extra_description() {
            Some(extra) => format!("{}: {extra}", e.description()),
            None => e.description().to_string(),
        };
        BgetError::Transfer {
            code: e.code() as i32,
            message,
        }
    }
}

impl From<curl::FormError> for BgetError {
    fn from(e: curl::FormError) -> Self {
        BgetError::Form {
            code: e.code() as i32,
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_codes_are_distinct() {
        let header = BgetError::Config(ConfigErrorCode::UseSetRequestHeader);
        let post = BgetError::Config(ConfigErrorCode::UseSetPostField);
        assert_ne!(header.code(), post.code());
    }

    #[test]
    fn transfer_code_is_passed_through() {
        let err = BgetError::Transfer {
            code: 6,
            message: "Couldn't resolve host name".to_string(),
        };
        assert_eq!(err.code(), 6);
        assert_eq!(err.to_string(), "transfer failed (6): Couldn't resolve host name");
    }

    #[test]
    fn symbolic_codes_do_not_collide_with_curl_codes() {
        let symbolic = [
            BgetError::Config(ConfigErrorCode::UseSetRequestHeader),
            BgetError::Config(ConfigErrorCode::UseSetPostField),
            BgetError::HeadersNotExtractable,
            BgetError::Deserialization(String::new()),
            BgetError::Form {
                code: 3,
                message: String::new(),
            },
        ];
        let malformed_url: BgetError = curl::Error::new(3).into();
        for err in &symbolic {
            assert!(err.code() >= 1000, "{err}");
            assert_ne!(err.code(), malformed_url.code());
        }
    }

    #[test]
    fn form_error_keeps_its_own_variant() {
        let err: BgetError = curl::FormError::new(1).into();
        assert!(matches!(err, BgetError::Form { code: 1, .. }));
        assert_eq!(err.code(), 1005);
    }

    #[test]
    fn curl_error_keeps_native_code() {
        let err: BgetError = curl::Error::new(3).into();
        assert!(matches!(err, BgetError::Transfer { code: 3, .. }));
    }
}
