//
//  wwt-api-client
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Grants
//!
//! This module implements the token-service side of the OAuth 2.0 flows used
//! by the authenticated clients:
//!
//! - The **refresh-token grant** and **authorization-code grant** against a
//!   token endpoint, posted as a form
//! - Building the **authorization URL** a user must open in a browser
//! - Extracting the **authorization code** from the URL the browser is
//!   redirected to
//! - **PKCE** and a one-shot **loopback listener** for flows whose redirect
//!   URI points at `localhost`
//!
//! ## Token service replies
//!
//! Token services answer refusals with a JSON body carrying an `error` code,
//! often alongside a 4xx status. Such replies are surfaced as
//! [`TokenReply::Refused`] so callers can tell an expired grant
//! (`invalid_grant`) apart from other failures.
//!
//! ## Example
//!
//! ```rust
//! use wwt_api_client::auth::{authorize_url, LiveEndpoints, LIVE_AUTH_SCOPES, WWT_CLIENT_ID};
//!
//! let endpoints = LiveEndpoints::default();
//! let url = authorize_url(
//!     &endpoints.authorize,
//!     WWT_CLIENT_ID,
//!     &endpoints.desktop_redirect,
//!     &LIVE_AUTH_SCOPES,
//!     &[],
//! )?;
//! assert!(url.as_str().starts_with("https://login.live.com/oauth20_authorize.srf?"));
//! # Ok::<(), wwt_api_client::api::common::Error>(())
//! ```

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

use crate::api::common::{DecodeError, Error, Result};
use crate::auth::OAuthState;

/// Microsoft Live authorization endpoint.
pub const LIVE_OAUTH_AUTH_SERVICE: &str = "https://login.live.com/oauth20_authorize.srf";

/// Microsoft Live token endpoint.
pub const LIVE_OAUTH_TOKEN_SERVICE: &str = "https://login.live.com/oauth20_token.srf";

/// Microsoft Live redirect URI for desktop applications.
pub const LIVE_OAUTH_DESKTOP_ENDPOINT: &str = "https://login.live.com/oauth20_desktop.srf";

/// Scopes requested from Microsoft Live.
pub const LIVE_AUTH_SCOPES: [&str; 2] = ["wl.emails", "wl.signin"];

/// The OAuth client ID registered for WWT.
pub const WWT_CLIENT_ID: &str = "000000004015657B";

/// The Microsoft Live endpoints used by the Communities login flow.
///
/// The defaults point at the production Live service; tests substitute a
/// local stub server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEndpoints {
    /// The authorization endpoint the user visits.
    pub authorize: String,
    /// The token endpoint grants are posted to.
    pub token: String,
    /// The redirect URI registered for desktop clients.
    pub desktop_redirect: String,
}

impl Default for LiveEndpoints {
    fn default() -> Self {
        Self {
            authorize: LIVE_OAUTH_AUTH_SERVICE.to_string(),
            token: LIVE_OAUTH_TOKEN_SERVICE.to_string(),
            desktop_redirect: LIVE_OAUTH_DESKTOP_ENDPOINT.to_string(),
        }
    }
}

/// The client credentials sent with every grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials<'a> {
    /// The OAuth client ID.
    pub client_id: &'a str,
    /// The client secret, for confidential clients.
    pub client_secret: Option<&'a str>,
    /// The redirect URI, required by services that check it on every grant.
    pub redirect_uri: Option<&'a str>,
}

/// The outcome of posting a grant to a token service.
#[derive(Debug, Clone)]
pub enum TokenReply {
    /// The grant succeeded.
    Granted(OAuthState),
    /// The service refused the grant.
    Refused {
        /// The OAuth error code, e.g. `invalid_grant`.
        error: String,
        /// The service's human-readable explanation, if any.
        description: Option<String>,
        /// The full reply body.
        body: String,
    },
}

impl TokenReply {
    /// Returns `true` if the service reported an expired or revoked grant.
    pub fn is_invalid_grant(&self) -> bool {
        matches!(self, Self::Refused { error, .. } if error == "invalid_grant")
    }

    /// Converts a refusal into [`Error::Authentication`].
    pub fn into_state(self) -> Result<OAuthState> {
        match self {
            Self::Granted(state) => Ok(state),
            Self::Refused { body, .. } => Err(Error::Authentication(format!(
                "the token service refused the grant: {body}"
            ))),
        }
    }
}

#[derive(Deserialize)]
struct RefusalRaw {
    error: String,
    error_description: Option<String>,
}

/// Exchanges a refresh token for a fresh token pair.
///
/// # Parameters
///
/// * `http` - The HTTP client to post with
/// * `token_endpoint` - The token service URL
/// * `credentials` - The client credentials
/// * `refresh_token` - The cached refresh token
pub fn refresh_grant(
    http: &reqwest::blocking::Client,
    token_endpoint: &str,
    credentials: &ClientCredentials<'_>,
    refresh_token: &str,
) -> Result<TokenReply> {
    info!("refreshing OAuth tokens");
    post_grant(
        http,
        token_endpoint,
        credentials,
        &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
    )
}

/// Exchanges an authorization code for a token pair.
///
/// `code_verifier` is sent when the authorization request used PKCE.
pub fn authorization_code_grant(
    http: &reqwest::blocking::Client,
    token_endpoint: &str,
    credentials: &ClientCredentials<'_>,
    code: &str,
    code_verifier: Option<&str>,
) -> Result<TokenReply> {
    info!("exchanging authorization code for OAuth tokens");

    let mut extra = vec![("grant_type", "authorization_code"), ("code", code)];
    if let Some(verifier) = code_verifier {
        extra.push(("code_verifier", verifier));
    }

    post_grant(http, token_endpoint, credentials, &extra)
}

fn post_grant(
    http: &reqwest::blocking::Client,
    token_endpoint: &str,
    credentials: &ClientCredentials<'_>,
    extra: &[(&str, &str)],
) -> Result<TokenReply> {
    let mut form: Vec<(&str, &str)> = vec![("client_id", credentials.client_id)];
    if let Some(secret) = credentials.client_secret {
        form.push(("client_secret", secret));
    }
    if let Some(redirect_uri) = credentials.redirect_uri {
        form.push(("redirect_uri", redirect_uri));
    }
    form.extend_from_slice(extra);

    debug!(url = token_endpoint, "posting OAuth grant");
    let response = http.post(token_endpoint).form(&form).send()?;
    let status = response.status();
    let body = response.text()?;

    parse_token_reply(status, &body)
}

/// Interprets a token service reply.
///
/// A JSON body with an `error` member is a refusal whatever the status. Any
/// other non-success status is an [`Error::ApiResponse`].
pub fn parse_token_reply(status: reqwest::StatusCode, body: &str) -> Result<TokenReply> {
    if let Ok(refusal) = serde_json::from_str::<RefusalRaw>(body) {
        return Ok(TokenReply::Refused {
            error: refusal.error,
            description: refusal.error_description,
            body: body.to_string(),
        });
    }

    if !status.is_success() {
        return Err(Error::ApiResponse {
            status,
            body: body.to_string(),
        });
    }

    let state: OAuthState = serde_json::from_str(body).map_err(DecodeError::from)?;
    Ok(TokenReply::Granted(state.stamped()))
}

/// Builds the URL a user opens to authorize the client.
///
/// `extra` parameters (such as a PKCE challenge) are appended after the
/// standard ones.
pub fn authorize_url(
    authorize_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[&str],
    extra: &[(&str, &str)],
) -> Result<Url> {
    let mut url = Url::parse(authorize_endpoint)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("scope", &scopes.join(" "))
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .extend_pairs(extra);
    Ok(url)
}

/// Extracts the `code` parameter from the URL a login redirected to.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::auth::extract_code;
///
/// let url = "https://login.live.com/oauth20_desktop.srf?code=M1234-abcd&lc=1033";
/// assert_eq!(extract_code(url).as_deref(), Some("M1234-abcd"));
/// assert_eq!(extract_code("https://login.live.com/oauth20_desktop.srf"), None);
/// ```
pub fn extract_code(redirect_url: &str) -> Option<String> {
    let url = Url::parse(redirect_url.trim()).ok()?;
    code_from_url(&url)
}

fn code_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

/// Extracts the authorization code from an HTTP request line.
fn extract_code_from_request(request_line: &str) -> Option<String> {
    // Request line format: GET /callback?code=xxx HTTP/1.1
    let target = request_line.split_whitespace().nth(1)?;
    let url = Url::parse("http://localhost").ok()?.join(target).ok()?;
    code_from_url(&url)
}

/// PKCE (Proof Key for Code Exchange) challenge data.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// The code verifier - a high-entropy random string.
    pub verifier: String,
    /// The code challenge - SHA256 hash of the verifier, base64url encoded.
    pub challenge: String,
}

impl PkceChallenge {
    /// Generates a new challenge using the S256 method.
    pub fn new() -> Self {
        let mut verifier_bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut verifier_bytes);
        let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);

        let mut hasher = Sha256::new();
        hasher.update(verifier.as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(hasher.finalize());

        Self {
            verifier,
            challenge,
        }
    }
}

impl Default for PkceChallenge {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for a browser to be redirected to `listener` and returns the
/// authorization code it carried.
///
/// The listener answers exactly one request and is then dropped.
///
/// # Errors
///
/// Returns [`Error::Authentication`] if no code arrives within `timeout` or
/// the redirect carried an error instead of a code.
pub fn receive_authorization_code(listener: TcpListener, timeout: Duration) -> Result<String> {
    let (tx, rx) = mpsc::channel::<Option<String>>();

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let request_line = BufReader::new(&stream).lines().next().and_then(|l| l.ok());
            let code = request_line.as_deref().and_then(extract_code_from_request);

            let (status, title) = if code.is_some() {
                ("200 OK", "Authentication Successful")
            } else {
                ("400 Bad Request", "Authentication Failed")
            };
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: text/html\r\n\
                 Connection: close\r\n\
                 \r\n\
                 <!DOCTYPE html>\
                 <html><head><title>{title}</title></head>\
                 <body style=\"font-family: system-ui, sans-serif; text-align: center; padding: 50px;\">\
                 <h1>{title}</h1>\
                 <p>You can close this window and return to the terminal.</p>\
                 </body></html>"
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(code);
        }
    });

    match rx.recv_timeout(timeout) {
        Ok(Some(code)) => Ok(code),
        Ok(None) => Err(Error::Authentication(
            "the authorization was denied or the redirect carried no code".to_string(),
        )),
        Err(_) => Err(Error::Authentication(
            "timed out waiting for the authorization redirect".to_string(),
        )),
    }
}
