//
//  wwt-api-client
//  constellations/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # WWT Constellations
//!
//! "Constellations" (abbreviated "CX") is the modernized WWT web service with a
//! social-media-style interface. Its APIs speak JSON, wrap every response in
//! an envelope with an `error` flag, and authenticate with OpenID Connect
//! bearer tokens (see [`oidc`]).
//!
//! ## Choosing an instance
//!
//! [`ClientConfig::new_default`] reads the environment so code can switch
//! between a local testing instance and the development environment without
//! changes; [`CxClient::from_env`] also falls back to the `[constellations]`
//! table of the configuration file. Set `NUXT_PUBLIC_API_URL` to one of:
//!
//! - `http://localhost:7000` for a standard local testing environment
//! - `https://api.wwtelescope.dev/` for the development environment
//!
//! ## Example
//!
//! ```rust,no_run
//! use wwt_api_client::constellations::{ClientConfig, CxClient};
//!
//! let cx = CxClient::new(ClientConfig::new_dev())?;
//! for scene in cx.get_home_timeline(0)? {
//!     println!("{}: {}", scene.handle.display_name, scene.text);
//! }
//! # Ok::<(), wwt_api_client::api::common::Error>(())
//! ```

pub mod data;
pub mod handles;
pub mod images;
pub mod oidc;
pub mod scenes;

pub use handles::{AddScenePlace, AddSceneRequest, HandleClient};
pub use images::ImageClient;
pub use oidc::OidcClient;
pub use scenes::{GetSceneResponse, SceneClient};

use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::client::Client;
use crate::api::common::{Error, Result};
use crate::api::endpoint::{catalog, EndpointDescriptor};
use crate::api::request::{check_status, TransportRequest};
use crate::api::response::decode_envelope;
use crate::api::validate::{check_fields, FieldValue};
use crate::auth::StateStore;
use crate::config::Config;
use data::{ImageSummary, SceneHydrated};

/// The client ID used when `WWT_API_CLIENT_ID` is not set.
pub const DEFAULT_CX_CLIENT_ID: &str = "cli-tool";

/// Which Constellations instance a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The Keycloak realm URL, e.g.
    /// `https://wwtelescope.dev/auth/realms/constellations`.
    pub id_provider_url: String,
    /// The OAuth client ID.
    pub client_id: String,
    /// The API base URL, without a trailing slash.
    pub api_url: String,
}

impl ClientConfig {
    /// Builds a configuration from the process environment.
    ///
    /// - `NUXT_PUBLIC_API_URL` gives the API base URL; it is required
    /// - `NUXT_PUBLIC_KEYCLOAK_URL`, then `KEYCLOAK_URL`, give the identity
    ///   provider base URL
    /// - Otherwise the provider is inferred from the API URL: anything on
    ///   `localhost` uses `http://localhost:8080/`, anything on
    ///   `wwtelescope.dev` uses `https://wwtelescope.dev/auth/`
    /// - `WWT_API_CLIENT_ID` gives the client ID, defaulting to `cli-tool`
    ///
    /// The API URL loses any trailing slash; the provider URL gains one and
    /// then `realms/constellations`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the API URL is unset or the
    /// provider URL can be neither read nor inferred.
    pub fn new_default() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`new_default`](Self::new_default), reading variables through
    /// `lookup`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wwt_api_client::constellations::ClientConfig;
    ///
    /// let config = ClientConfig::from_lookup(|name| match name {
    ///     "NUXT_PUBLIC_API_URL" => Some("http://localhost:7000/".to_string()),
    ///     _ => None,
    /// })?;
    ///
    /// assert_eq!(config.api_url, "http://localhost:7000");
    /// assert_eq!(config.id_provider_url, "http://localhost:8080/realms/constellations");
    /// assert_eq!(config.client_id, "cli-tool");
    /// # Ok::<(), wwt_api_client::api::common::Error>(())
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("NUXT_PUBLIC_API_URL").ok_or_else(|| {
            Error::Configuration(
                "until WWT Constellations is released, you must set the environment variable \
                 NUXT_PUBLIC_API_URL"
                    .to_string(),
            )
        })?;

        let client_id =
            lookup("WWT_API_CLIENT_ID").unwrap_or_else(|| DEFAULT_CX_CLIENT_ID.to_string());

        let inferred = if api_url.contains("localhost") {
            Some("http://localhost:8080/")
        } else if api_url.contains("wwtelescope.dev") {
            Some("https://wwtelescope.dev/auth/")
        } else {
            None
        };

        let mut id_base = lookup("NUXT_PUBLIC_KEYCLOAK_URL")
            .or_else(|| lookup("KEYCLOAK_URL"))
            .or_else(|| inferred.map(str::to_string))
            .ok_or_else(|| {
                Error::Configuration(
                    "unable to infer the WWT Constellations Keycloak URL; set the environment \
                     variable NUXT_PUBLIC_KEYCLOAK_URL"
                        .to_string(),
                )
            })?;

        if !id_base.ends_with('/') {
            id_base.push('/');
        }

        let api_url = api_url.strip_suffix('/').unwrap_or(&api_url).to_string();
        debug!(api_url = %api_url, id_base = %id_base, "resolved Constellations configuration");

        Ok(Self {
            id_provider_url: format!("{id_base}realms/constellations"),
            client_id,
            api_url,
        })
    }

    /// The configuration of the development environment.
    pub fn new_dev() -> Self {
        Self {
            id_provider_url: "https://wwtelescope.dev/auth/realms/constellations".to_string(),
            client_id: DEFAULT_CX_CLIENT_ID.to_string(),
            api_url: "https://api.wwtelescope.dev".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FindImagesByLegacyRequest<'a> {
    wwt_legacy_url: &'a str,
}

/// A response with nothing but the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Acknowledgement {}

#[derive(Debug, Deserialize)]
struct ResultsResponse<T> {
    results: Vec<T>,
}

/// A client for the Constellations APIs.
#[derive(Debug)]
pub struct CxClient {
    config: ClientConfig,
    session: Client,
    oidc: OidcClient,
}

impl CxClient {
    /// Creates a client that caches its tokens in the default state
    /// directory.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let oidc = OidcClient::new(&config, StateStore::open_default()?);
        Ok(Self::with_oidc(config, oidc))
    }

    /// Creates a client from the environment, falling back to the
    /// `[constellations]` table of the default configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the file is malformed or no API
    /// URL is set anywhere.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::load()?)
    }

    /// Creates a client from a loaded configuration file; see
    /// [`Config::constellations_config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.constellations_config()?)
    }

    /// Creates a client with an explicitly configured token source.
    pub fn with_oidc(config: ClientConfig, oidc: OidcClient) -> Self {
        let session = Client::with_base(config.api_url.clone());
        Self {
            config,
            session,
            oidc,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session requests are sent through.
    pub fn session(&self) -> &Client {
        &self.session
    }

    /// The token source.
    pub fn oidc(&self) -> &OidcClient {
        &self.oidc
    }

    /// Returns a client for calls about one handle.
    pub fn handle_client(&self, handle: &str) -> HandleClient<'_> {
        HandleClient::new(self, handle)
    }

    /// Returns a client for calls about one image.
    pub fn image_client(&self, id: &str) -> ImageClient<'_> {
        ImageClient::new(self, id)
    }

    /// Returns a client for calls about one scene.
    pub fn scene_client(&self, id: &str) -> SceneClient<'_> {
        SceneClient::new(self, id)
    }

    /// Finds images associated with a "legacy" WWT data URL.
    pub fn find_images_by_wwt_url(&self, wwt_url: &str) -> Result<Vec<ImageSummary>> {
        let descriptor = &catalog::CX_FIND_IMAGES_BY_LEGACY_URL;
        self.validate(descriptor, &[&FieldValue::from(wwt_url)])?;

        let body = serde_json::to_value(FindImagesByLegacyRequest {
            wwt_legacy_url: wwt_url,
        })
        .map_err(|e| Error::Decode(e.into()))?;

        let request = self.request(descriptor, &[])?.json(body);
        let response: ResultsResponse<ImageSummary> = self.call(&request)?;
        Ok(response.results)
    }

    /// Gets one page of the home timeline.
    ///
    /// Page zero holds the top items. The page size is chosen by the server
    /// and may vary between pages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] for a negative page number.
    pub fn get_home_timeline(&self, page_num: i64) -> Result<Vec<SceneHydrated>> {
        let descriptor = &catalog::CX_HOME_TIMELINE;
        self.validate(descriptor, &[&FieldValue::from(page_num)])?;

        let request = self
            .request(descriptor, &[])?
            .query("page", page_num.to_string());
        let response: ResultsResponse<SceneHydrated> = self.call(&request)?;
        Ok(response.results)
    }

    /// Lists the built-in background imagery options.
    pub fn get_builtin_backgrounds(&self) -> Result<Vec<ImageSummary>> {
        let request = self.request(&catalog::CX_BUILTIN_BACKGROUNDS, &[])?;
        let response: ResultsResponse<ImageSummary> = self.call(&request)?;
        Ok(response.results)
    }

    pub(crate) fn validate(
        &self,
        descriptor: &EndpointDescriptor,
        values: &[&FieldValue],
    ) -> Result<()> {
        match check_fields(descriptor.params, values, self.session.encoding()) {
            Some(reason) => Err(Error::InvalidRequest(reason)),
            None => Ok(()),
        }
    }

    /// Builds an unauthenticated request for `descriptor`. Path parameters
    /// must already be encoded.
    pub(crate) fn request(
        &self,
        descriptor: &EndpointDescriptor,
        path_params: &[(&str, &str)],
    ) -> Result<TransportRequest> {
        let url = descriptor.url(&self.config.api_url, path_params)?;
        Ok(TransportRequest::new(descriptor.method, url))
    }

    /// Attaches a bearer token, sends, and checks the status.
    pub(crate) fn send_and_check(&self, request: &TransportRequest) -> Result<Response> {
        let token = self.oidc.access_token(self.session.http()?)?;
        let request = request
            .clone()
            .header("Authorization", format!("Bearer {token}"));

        check_status(self.session.dispatch(&request)?)
    }

    /// Sends with [`send_and_check`](Self::send_and_check) and decodes the
    /// enveloped JSON response.
    pub(crate) fn call<T: DeserializeOwned>(&self, request: &TransportRequest) -> Result<T> {
        let response = self.send_and_check(request)?;
        let status = response.status();
        let body = response.text()?;
        decode_envelope(status, &body)
    }
}
