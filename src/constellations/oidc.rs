//
//  wwt-api-client
//  constellations/oidc.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OpenID Connect Tokens
//!
//! Constellations calls carry a bearer token issued by the Keycloak realm
//! named in the [`ClientConfig`]. [`OidcClient`] obtains one as follows:
//!
//! 1. Reuse the token in memory, or the one cached on disk, until it expires
//! 2. Refresh it with the refresh token; an `invalid_grant` reply discards
//!    the cache
//! 3. Otherwise run an authorization-code login with PKCE: open the browser
//!    and wait for the redirect on a loopback port
//!
//! The interactive step can be disabled, in which case a missing login is an
//! [`Error::Authentication`].

use std::cell::RefCell;
use std::net::TcpListener;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::common::{Error, Result};
use crate::auth::{
    authorization_code_grant, authorize_url, receive_authorization_code, refresh_grant,
    ClientCredentials, OAuthState, PkceChallenge, StateStore, TokenReply,
};
use crate::constellations::ClientConfig;

/// Authorization endpoint, relative to the realm URL.
pub const OIDC_AUTH_PATH: &str = "/protocol/openid-connect/auth";

/// Token endpoint, relative to the realm URL.
pub const OIDC_TOKEN_PATH: &str = "/protocol/openid-connect/token";

/// Scopes requested for API calls.
pub const CX_SCOPES: [&str; 2] = ["profile", "offline_access"];

/// The default token cache identifier.
pub const DEFAULT_CACHE_IDENTIFIER: &str = "wwt_api_client";

/// How long an interactive login may take.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(300);

/// Obtains and caches bearer tokens for one identity provider and client.
#[derive(Debug)]
pub struct OidcClient {
    identifier: String,
    id_provider_url: String,
    client_id: String,
    store: StateStore,
    interactive: bool,
    token: RefCell<Option<OAuthState>>,
}

impl OidcClient {
    /// Creates a client for the provider in `config`, caching tokens in
    /// `store`. Interactive login is allowed.
    pub fn new(config: &ClientConfig, store: StateStore) -> Self {
        Self {
            identifier: DEFAULT_CACHE_IDENTIFIER.to_string(),
            id_provider_url: config.id_provider_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            store,
            interactive: true,
            token: RefCell::new(None),
        }
    }

    /// Sets the identifier tokens are cached under.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Enables or disables the browser login.
    pub fn interactive(mut self, allowed: bool) -> Self {
        self.interactive = allowed;
        self
    }

    /// The cache file basename.
    pub fn cache_basename(&self) -> String {
        format!("{}-constellations-oidc.json", self.identifier)
    }

    /// The token endpoint URL.
    pub fn token_endpoint(&self) -> String {
        format!("{}{}", self.id_provider_url, OIDC_TOKEN_PATH)
    }

    /// The authorization endpoint URL.
    pub fn authorization_endpoint(&self) -> String {
        format!("{}{}", self.id_provider_url, OIDC_AUTH_PATH)
    }

    /// Returns a valid access token, refreshing or logging in as needed.
    pub fn access_token(&self, http: &reqwest::blocking::Client) -> Result<String> {
        if self.token.borrow().is_none() {
            let cached = self.store.read_json::<OAuthState>(&self.cache_basename())?;
            *self.token.borrow_mut() = cached;
        }

        let current = self.token.borrow().clone();

        if let Some(state) = &current {
            if !state.is_expired() {
                return Ok(state.access_token.clone());
            }

            if state.can_refresh() {
                if let Some(fresh) = self.refresh(http, state)? {
                    return self.accept(fresh);
                }
            }
        }

        if !self.interactive {
            return Err(Error::Authentication(
                "no valid Constellations login is cached and interactive login is disabled"
                    .to_string(),
            ));
        }

        let fresh = self.login(http)?;
        self.accept(fresh)
    }

    /// Forgets the current token, in memory and on disk.
    pub fn forget(&self) -> Result<()> {
        *self.token.borrow_mut() = None;
        self.store.remove(&self.cache_basename())
    }

    fn credentials(&self) -> ClientCredentials<'_> {
        ClientCredentials {
            client_id: &self.client_id,
            client_secret: None,
            redirect_uri: None,
        }
    }

    fn refresh(
        &self,
        http: &reqwest::blocking::Client,
        state: &OAuthState,
    ) -> Result<Option<OAuthState>> {
        let refresh_token = state.refresh_token.as_deref().unwrap_or_default();

        match refresh_grant(http, &self.token_endpoint(), &self.credentials(), refresh_token)? {
            TokenReply::Granted(mut fresh) => {
                if !fresh.can_refresh() {
                    fresh.refresh_token = state.refresh_token.clone();
                }
                Ok(Some(fresh))
            }
            reply if reply.is_invalid_grant() => {
                info!("cached Constellations login has expired");
                self.forget()?;
                Ok(None)
            }
            TokenReply::Refused { body, .. } => Err(Error::Authentication(format!(
                "failed to refresh the Constellations login: {body}"
            ))),
        }
    }

    fn login(&self, http: &reqwest::blocking::Client) -> Result<OAuthState> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let redirect_uri = format!("http://localhost:{}/", listener.local_addr()?.port());
        let pkce = PkceChallenge::new();

        let url = authorize_url(
            &self.authorization_endpoint(),
            &self.client_id,
            &redirect_uri,
            &CX_SCOPES,
            &[
                ("code_challenge", pkce.challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )?;

        info!(url = %url, "waiting for the Constellations login in the browser");
        if let Err(e) = webbrowser::open(url.as_str()) {
            warn!(error = %e, "could not open a browser; visit the login URL manually");
        }

        let code = receive_authorization_code(listener, LOGIN_TIMEOUT)?;

        let credentials = ClientCredentials {
            redirect_uri: Some(&redirect_uri),
            ..self.credentials()
        };
        authorization_code_grant(
            http,
            &self.token_endpoint(),
            &credentials,
            &code,
            Some(&pkce.verifier),
        )?
        .into_state()
    }

    fn accept(&self, state: OAuthState) -> Result<String> {
        self.store.write_json(&self.cache_basename(), &state)?;
        debug!(identifier = %self.identifier, "cached Constellations token");

        let token = state.access_token.clone();
        *self.token.borrow_mut() = Some(state);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> ClientConfig {
        ClientConfig {
            id_provider_url: "http://localhost:8080/realms/constellations".to_string(),
            client_id: "cli-tool".to_string(),
            api_url: "http://localhost:7000".to_string(),
        }
    }

    #[test]
    fn test_endpoints() {
        let dir = TempDir::new().unwrap();
        let oidc = OidcClient::new(&config(), StateStore::new(dir.path()));
        assert_eq!(
            oidc.token_endpoint(),
            "http://localhost:8080/realms/constellations/protocol/openid-connect/token"
        );
        assert_eq!(
            oidc.authorization_endpoint(),
            "http://localhost:8080/realms/constellations/protocol/openid-connect/auth"
        );
        assert_eq!(oidc.cache_basename(), "wwt_api_client-constellations-oidc.json");
    }

    #[test]
    fn test_cached_unexpired_token_is_reused_without_io() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());
        let oidc = OidcClient::new(&config(), store.clone()).interactive(false);
        store.write_json(&oidc.cache_basename(), &OAuthState::new("cached", "r")).unwrap();

        let http = reqwest::blocking::Client::new();
        assert_eq!(oidc.access_token(&http).unwrap(), "cached");
    }

    #[test]
    fn test_missing_login_without_interaction_fails() {
        let dir = TempDir::new().unwrap();
        let oidc = OidcClient::new(&config(), StateStore::new(dir.path())).interactive(false);

        let http = reqwest::blocking::Client::new();
        let err = oidc.access_token(&http).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
