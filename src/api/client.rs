//
//  wwt-api-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Session for the WWT Web Services
//!
//! This module provides [`Client`], the session object every request is issued
//! from. A client owns:
//!
//! - The base URL of the WWT web services (overridable for testing or for
//!   alternative deployments)
//! - The text encoding used to judge and render textual parameters
//! - One lazily-created `reqwest` blocking connection handle, reused by all
//!   requests created from the client
//!
//! ## Features
//!
//! - Factory methods returning pre-populated, mutable request objects
//! - Request logging at `debug` level (method and URL, never credentials)
//! - Custom User-Agent header

use once_cell::sync::OnceCell;
use reqwest::blocking::Response;
use reqwest::header::COOKIE;
use tracing::debug;

use crate::api::common::Result;
use crate::api::request::{RequestBody, TransportRequest};
use crate::api::validate::{FieldValue, TextEncoding};
use crate::api::wwt::{LoginRequest, ShowImageRequest, TileImageRequest};

/// The production base URL of the WWT web services.
pub const DEFAULT_API_BASE: &str = "http://www.worldwidetelescope.org";

/// A session against the WWT web services.
///
/// Creating a client performs no I/O. The underlying HTTP connection handle is
/// built on first use and shared by every request created from this client.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::validate::TextEncoding;
/// use wwt_api_client::{Client, DEFAULT_API_BASE};
///
/// let client = Client::new();
/// assert_eq!(client.base_url(), DEFAULT_API_BASE);
///
/// let local = Client::with_base("http://localhost:7000").with_encoding(TextEncoding::Ascii);
/// assert_eq!(local.base_url(), "http://localhost:7000");
/// assert_eq!(local.encoding(), TextEncoding::Ascii);
/// ```
#[derive(Debug)]
pub struct Client {
    /// The base URL requests are issued against
    base_url: String,
    /// Encoding used for textual parameters
    encoding: TextEncoding,
    /// The shared HTTP client, created on first use
    http: OnceCell<reqwest::blocking::Client>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client for the production WWT web services.
    pub fn new() -> Self {
        Self::with_base(DEFAULT_API_BASE)
    }

    /// Creates a client for the services rooted at `base_url`.
    ///
    /// # Parameters
    ///
    /// * `base_url` - Scheme, host and optional path prefix, e.g.
    ///   `http://localhost:7000`
    pub fn with_base(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            encoding: TextEncoding::default(),
            http: OnceCell::new(),
        }
    }

    /// Sets the text encoding used to validate and render textual parameters.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the text encoding.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Returns the shared HTTP client, creating it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::api::common::Error::Transport) if
    /// the TLS backend cannot be initialized.
    pub fn http(&self) -> Result<&reqwest::blocking::Client> {
        let http = self.http.get_or_try_init(|| {
            debug!(base = %self.base_url, "creating HTTP session");
            reqwest::blocking::Client::builder()
                .user_agent(format!("wwt-api-client/{}", crate::VERSION))
                .build()
        })?;
        Ok(http)
    }

    /// Sends a transport request on the shared connection.
    ///
    /// The status is not checked here; see
    /// [`check_status`](crate::api::request::check_status).
    pub fn dispatch(&self, request: &TransportRequest) -> Result<Response> {
        let url = request.full_url();
        debug!(method = request.method.as_str(), url = %url, "sending request");

        let mut builder = self.http()?.request(request.method.to_reqwest(), url);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(cookies) = request.cookie_header() {
            builder = builder.header(COOKIE, cookies);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(fields) => builder.form(fields),
        };

        Ok(builder.send()?)
    }

    /// Creates a request that builds a WTML folder around a single sky image.
    ///
    /// All geometry starts at its default (centered at RA 0, Dec 0, unit
    /// scale, no rotation or offsets).
    ///
    /// # Parameters
    ///
    /// * `image_url` - Absolute URL of the image
    /// * `name` - Display name of the image
    ///
    /// # Example
    ///
    /// ```rust
    /// use wwt_api_client::api::request::ApiRequest;
    /// use wwt_api_client::Client;
    ///
    /// let client = Client::new();
    /// let req = client.show_image("http://localhost/image.jpg", "name");
    /// assert_eq!(req.invalidity_reason(), None);
    /// ```
    pub fn show_image(
        &self,
        image_url: impl Into<FieldValue>,
        name: impl Into<FieldValue>,
    ) -> ShowImageRequest<'_> {
        ShowImageRequest::new(self, image_url.into(), name.into())
    }

    /// Creates a request that tiles an image for display in WWT.
    ///
    /// # Parameters
    ///
    /// * `image_url` - Absolute URL of the image
    pub fn tile_image(&self, image_url: impl Into<FieldValue>) -> TileImageRequest<'_> {
        TileImageRequest::new(self, image_url.into())
    }

    /// Creates a login request with the default user GUID and client version.
    pub fn login(&self) -> LoginRequest<'_> {
        LoginRequest::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base() {
        assert_eq!(Client::default().base_url(), DEFAULT_API_BASE);
        assert_eq!(Client::new().encoding(), TextEncoding::Utf8);
    }

    #[test]
    fn test_http_handle_is_reused() {
        let client = Client::with_base("http://localhost:1");
        let first = client.http().unwrap() as *const _;
        let second = client.http().unwrap() as *const _;
        assert_eq!(first, second);
    }
}
