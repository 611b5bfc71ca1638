//
//  wwt-api-client
//  api/wwt/login.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Login
//!
//! The legacy client "login" ping. Desktop clients call it at startup to
//! report their version; the server answers with a short text message.

use crate::api::client::Client;
use crate::api::common::Result;
use crate::api::endpoint::{catalog, EndpointDescriptor};
use crate::api::request::{wire_text, ApiRequest, TransportRequest};
use crate::api::validate::FieldValue;

/// The user GUID sent when none is supplied.
pub const DEFAULT_USER_GUID: &str = "00000000-0000-0000-0000-000000000000";

/// The client version sent when none is supplied.
pub const DEFAULT_CLIENT_VERSION: &str = "6.0.0.0";

/// A request to `login.aspx`.
#[derive(Debug, Clone)]
pub struct LoginRequest<'a> {
    client: &'a Client,

    /// The user GUID.
    pub user_guid: FieldValue,
    /// The reported client version.
    pub client_version: FieldValue,
    /// Whether the client uses equinox coordinates. Default `true`.
    pub equinox: FieldValue,
}

impl<'a> LoginRequest<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            user_guid: DEFAULT_USER_GUID.into(),
            client_version: DEFAULT_CLIENT_VERSION.into(),
            equinox: true.into(),
        }
    }
}

impl ApiRequest for LoginRequest<'_> {
    type Output = String;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::LOGIN
    }

    fn session(&self) -> &Client {
        self.client
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![&self.user_guid, &self.client_version, &self.equinox]
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let encoding = self.client.encoding();
        let endpoint = self.descriptor();
        let url = endpoint.url(self.client.base_url(), &[])?;

        let mut request = TransportRequest::new(endpoint.method, url)
            .query(
                endpoint.wire_name("user_guid"),
                wire_text("user_guid", &self.user_guid, encoding, false)?,
            )
            .query(
                endpoint.wire_name("client_version"),
                wire_text("client_version", &self.client_version, encoding, false)?,
            );

        if self.equinox.as_bool() == Some(true) {
            request = request.query(endpoint.wire_name("equinox"), "true");
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = Client::with_base("http://localhost:7000");
        let built = client.login().make_request().unwrap();

        assert_eq!(built.url.path(), "/WWTWeb/login.aspx");
        assert_eq!(built.query_value("user"), Some(DEFAULT_USER_GUID));
        assert_eq!(built.query_value("Version"), Some("6.0.0.0"));
        assert_eq!(built.query_value("Equinox"), Some("true"));

        let keys: Vec<&str> = built.query.iter().map(|(k, _)| k.as_str()).collect();
        let declared: Vec<&str> = catalog::LOGIN.params.iter().map(|p| p.wire_name()).collect();
        assert_eq!(keys, declared);
    }

    #[test]
    fn test_equinox_false_is_omitted() {
        let client = Client::with_base("http://localhost:7000");
        let mut req = client.login();
        req.equinox = false.into();
        assert_eq!(req.make_request().unwrap().query_value("Equinox"), None);
    }

    #[test]
    fn test_equinox_must_be_bool() {
        let client = Client::with_base("http://localhost:7000");
        let mut req = client.login();
        req.equinox = 1.into();
        assert_eq!(req.invalidity_reason().as_deref(), Some("\"equinox\" must be a bool"));
    }
}
