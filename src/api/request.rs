//
//  wwt-api-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Requests
//!
//! Every remote call is a value implementing [`ApiRequest`]. A request holds
//! its parameters as public, freely mutable [`FieldValue`]s plus a reference
//! to the [`Client`] that created it. Sending a request always walks the same
//! pipeline:
//!
//! 1. **Validate**: [`ApiRequest::invalidity_reason`] checks every field
//!    against the endpoint schema. A failure becomes
//!    [`Error::InvalidRequest`] and no I/O happens.
//! 2. **Build**: [`ApiRequest::make_request`] renders the fields into a
//!    [`TransportRequest`] (method, URL, ordered query, headers, cookies,
//!    body).
//! 3. **Dispatch**: the owning client's shared HTTP connection sends it.
//! 4. **Check**: a non-success status becomes [`Error::ApiResponse`] with the
//!    exact response body.
//! 5. **Decode**: [`ApiRequest::process_response`] turns the body into the
//!    endpoint's output type, following the descriptor's
//!    [`ResponseKind`](crate::api::endpoint::ResponseKind).
//!
//! Validation is re-run on every send, so a request may be mutated and sent
//! again.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wwt_api_client::api::request::ApiRequest;
//! use wwt_api_client::Client;
//!
//! let client = Client::new();
//! let mut req = client.show_image("http://localhost/image.jpg", "M31");
//! req.dec_deg = 41.27.into();
//! req.ra_deg = 10.68.into();
//!
//! assert_eq!(req.invalidity_reason(), None);
//! let wtml = req.send()?;
//! println!("{}", wtml.name);
//! # Ok::<(), wwt_api_client::api::common::Error>(())
//! ```

use reqwest::blocking::Response;
use reqwest::StatusCode;
use url::Url;

use crate::api::client::Client;
use crate::api::common::{Error, Result};
use crate::api::endpoint::{EndpointDescriptor, HttpMethod};
use crate::api::response::FromResponse;
use crate::api::validate::{
    check_fields, encode_wire_text, format_exponential, FieldValue, TextEncoding,
};

/// The body of a transport request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A JSON document.
    Json(serde_json::Value),
    /// A `application/x-www-form-urlencoded` form.
    Form(Vec<(String, String)>),
}

/// A fully-rendered HTTP request, ready to be dispatched.
///
/// Query parameters keep their insertion order; optional parameters that are
/// unset are never added.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The URL without query parameters.
    pub url: Url,
    /// Ordered query parameters.
    pub query: Vec<(String, String)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// Cookies, sent as a single `Cookie` header.
    pub cookies: Vec<(String, String)>,
    /// The request body.
    pub body: RequestBody,
}

impl TransportRequest {
    /// Creates a request with no parameters, headers or body.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends a query parameter if `value` is set.
    pub fn query_opt(self, key: impl Into<String>, value: Option<String>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Adds a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Adds a cookie.
    pub fn cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((key.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Sets a form body.
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Returns the URL with the query parameters applied.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }

    /// Returns the value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the cookies as a `Cookie` header value.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        Some(
            self.cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// A validate-then-send unit of work against one endpoint.
///
/// Implementors supply the descriptor, the field values (in the schema's
/// declaration order), the request builder and the response decoder; the
/// provided methods implement the shared pipeline.
pub trait ApiRequest {
    /// The decoded result of a successful call.
    type Output: FromResponse;

    /// The endpoint this request targets.
    fn descriptor(&self) -> &'static EndpointDescriptor;

    /// The client whose connection carries this request.
    fn session(&self) -> &Client;

    /// The current field values, aligned with `descriptor().params`.
    fn field_values(&self) -> Vec<&FieldValue> {
        Vec::new()
    }

    /// Non-fatal conditions the server would silently correct.
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns the reason the request is invalid, or `None` if it may be sent.
    ///
    /// Pure apart from logging any [`warnings`](ApiRequest::warnings); never
    /// touches the network.
    fn invalidity_reason(&self) -> Option<String> {
        let descriptor = self.descriptor();

        for warning in self.warnings() {
            tracing::warn!(endpoint = descriptor.id, "{warning}");
        }

        check_fields(
            descriptor.params,
            &self.field_values(),
            self.session().encoding(),
        )
    }

    /// Renders the current fields into a transport request.
    fn make_request(&self) -> Result<TransportRequest>;

    /// Decodes a successful response body the way the descriptor declares.
    fn process_response(&self, _status: StatusCode, body: &str) -> Result<Self::Output> {
        Self::Output::from_response(self.descriptor().response, body)
    }

    /// Validates, builds, dispatches and status-checks the request, returning
    /// the raw response.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if validation fails (nothing is sent)
    /// - [`Error::ApiResponse`] for a non-success HTTP status
    /// - [`Error::Transport`] for network failures
    fn send_raw(&self) -> Result<Response> {
        if let Some(reason) = self.invalidity_reason() {
            return Err(Error::InvalidRequest(reason));
        }

        let request = self.make_request()?;
        let response = self.session().dispatch(&request)?;
        check_status(response)
    }

    /// Sends the request and decodes the response.
    fn send(&self) -> Result<Self::Output> {
        let response = self.send_raw()?;
        let status = response.status();
        let body = response.text()?;
        self.process_response(status, &body)
    }
}

/// Passes successful responses through; turns any other status into
/// [`Error::ApiResponse`] carrying the body text.
pub fn check_status(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text()?;
    tracing::debug!(%status, "request failed");
    Err(Error::ApiResponse { status, body })
}

/// Reads a numeric field as a finite float.
pub(crate) fn scalar_value(name: &str, value: &FieldValue) -> Result<f64> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidRequest(format!("\"{name}\" must be a finite number")))
}

/// Renders a numeric field in the fixed exponential wire format.
pub(crate) fn wire_scalar(name: &str, value: &FieldValue) -> Result<String> {
    scalar_value(name, value).map(format_exponential)
}

/// Like [`wire_scalar`], but unset values are skipped.
pub(crate) fn wire_scalar_opt(name: &str, value: &FieldValue) -> Result<Option<String>> {
    if value.is_none() {
        return Ok(None);
    }
    wire_scalar(name, value).map(Some)
}

/// Renders a text field as strict-ASCII wire text.
pub(crate) fn wire_text(
    name: &str,
    value: &FieldValue,
    encoding: TextEncoding,
    escape_quote: bool,
) -> Result<String> {
    value
        .to_text(encoding)
        .map(|text| encode_wire_text(&text, escape_quote))
        .ok_or_else(|| Error::InvalidRequest(format!("\"{name}\" must be a string")))
}

/// Renders a URL field; URLs are ASCII on the wire.
pub(crate) fn wire_url(name: &str, value: &FieldValue) -> Result<Option<String>> {
    if value.is_none() {
        return Ok(None);
    }

    value
        .to_text(TextEncoding::Ascii)
        .map(Some)
        .ok_or_else(|| Error::InvalidRequest(format!("\"{name}\" must be an absolute URL")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TransportRequest {
        TransportRequest::new(
            HttpMethod::Get,
            Url::parse("http://localhost/WWTWeb/ShowImage.aspx").unwrap(),
        )
    }

    #[test]
    fn test_full_url_keeps_query_order() {
        let req = base().query("name", "a b").query("ra", "1").query("wtml", "true");
        assert_eq!(
            req.full_url().as_str(),
            "http://localhost/WWTWeb/ShowImage.aspx?name=a+b&ra=1&wtml=true"
        );
    }

    #[test]
    fn test_query_opt_skips_unset() {
        let req = base()
            .query_opt("thumb", None)
            .query_opt("credits", Some("c".to_string()));
        assert_eq!(req.query_value("thumb"), None);
        assert_eq!(req.query_value("credits"), Some("c"));
        assert_eq!(req.query.len(), 1);
    }

    #[test]
    fn test_cookie_header() {
        assert_eq!(base().cookie_header(), None);

        let req = base().cookie("access_token", "a").cookie("refresh_token", "r");
        assert_eq!(
            req.cookie_header().as_deref(),
            Some("access_token=a; refresh_token=r")
        );
    }

    #[test]
    fn test_wire_helpers() {
        assert_eq!(
            wire_scalar("scale", &FieldValue::from(1)).unwrap(),
            "1.000000000000000000e+00"
        );
        assert!(wire_scalar("scale", &FieldValue::from(f64::NAN)).is_err());
        assert_eq!(wire_scalar_opt("ra", &FieldValue::None).unwrap(), None);

        let text = wire_text("name", &FieldValue::from("\"é\""), TextEncoding::Utf8, true).unwrap();
        assert_eq!(text, "&quot;&#233;&quot;");

        assert_eq!(
            wire_url("thumb", &FieldValue::from(&b"http://x/y"[..])).unwrap().as_deref(),
            Some("http://x/y")
        );
    }
}
