//
//  wwt-api-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common Error Types for the WWT Web Services
//!
//! This module provides the error taxonomy shared by every request family in
//! the crate: the core WWT endpoints, the Communities endpoints and the
//! Constellations endpoints.
//!
//! # Overview
//!
//! | Variant | Raised when | Recoverable |
//! |---------|-------------|-------------|
//! | `InvalidRequest` | A request fails validation; no I/O has happened | Yes |
//! | `ApiResponse` | The server answered with a failure status | No |
//! | `Decode` | A successful response body could not be decoded | No |
//! | `Authentication` | A client could not complete its login/refresh protocol | No |
//! | `Configuration` | Base URLs could not be determined | No |
//! | `Transport` | The HTTP exchange itself failed | No |
//!
//! # Example
//!
//! ```rust
//! use wwt_api_client::api::common::Error;
//!
//! fn describe(err: &Error) -> &'static str {
//!     match err {
//!         Error::InvalidRequest(_) => "fix the request and try again",
//!         Error::ApiResponse { .. } => "the server refused the request",
//!         _ => "something else went wrong",
//!     }
//! }
//!
//! let err = Error::InvalidRequest("\"name\" must be a string".to_string());
//! assert_eq!(describe(&err), "fix the request and try again");
//! assert!(err.is_recoverable());
//! ```
//!
//! # Notes
//!
//! - Nothing in this crate retries or downgrades an error to a default value
//! - Transport, I/O and URL errors convert automatically via `?`

use reqwest::StatusCode;
use thiserror::Error;

/// Unified error type for all WWT API operations.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::common::Error;
///
/// let err = Error::Configuration("set NUXT_PUBLIC_API_URL".to_string());
/// assert!(err.to_string().contains("NUXT_PUBLIC_API_URL"));
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A request's fields failed validation.
    ///
    /// Carries the reason reported for the first failing field. No network
    /// traffic was generated.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered with a non-success HTTP status.
    ///
    /// # Fields
    ///
    /// - `status` - The HTTP status returned by the server
    /// - `body` - The exact response body, kept for diagnostics
    #[error("API error ({status}): {body}")]
    ApiResponse {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body text.
        body: String,
    },

    /// A successful response could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] DecodeError),

    /// Authentication could not be established.
    ///
    /// Raised while constructing an authenticated client: missing client
    /// secret, a rejected refresh, a failed code exchange, or an interactive
    /// login that the caller did not allow.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Required settings could not be determined.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A network-level failure from the HTTP stack.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A filesystem failure while reading or writing persisted state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the caller can fix the problem and try again.
    ///
    /// Only validation failures are recoverable; everything else is final for
    /// the operation that produced it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Returns the response body for [`Error::ApiResponse`] errors.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::ApiResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Failures while decoding an otherwise successful response body.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The body was not valid JSON, or did not match the expected record.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body was not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The body parsed but did not have the expected shape.
    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
