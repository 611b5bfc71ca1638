//
//  wwt-api-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module provides the pieces shared by the authenticated clients:
//!
//! - [`OAuthState`]: the token record returned by a token service and
//!   persisted between runs
//! - [`LoginPrompt`]: the port through which an interactive login shows the
//!   authorization URL and reads back the redirect URL
//! - [`oauth`]: refresh and authorization-code grants, PKCE, loopback listener
//! - [`store`]: owner-only state files in the per-user state directory
//!
//! ## Example
//!
//! ```rust
//! use wwt_api_client::auth::OAuthState;
//!
//! let state: OAuthState = serde_json::from_str(
//!     r#"{"access_token": "a", "refresh_token": "r", "user_id": "u123"}"#,
//! )?;
//!
//! assert_eq!(state.access_token, "a");
//! assert!(state.can_refresh());
//! // Provider metadata is kept as-is
//! assert_eq!(state.extra["user_id"], "u123");
//! # Ok::<(), serde_json::Error>(())
//! ```

mod oauth;
mod store;

pub use oauth::*;
pub use store::*;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// The token record issued by an OAuth token service.
///
/// Fields the record does not model (`authentication_token`, `user_id`,
/// `id_token`, ...) are preserved in [`extra`](Self::extra) so the persisted
/// file keeps everything the provider sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthState {
    /// The access token.
    pub access_token: String,

    /// The refresh token, when the service issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// The token type, typically `bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// The access token lifetime in seconds, as issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// The granted scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// When the access token expires, computed from `expires_in` on receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Any other provider metadata.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OAuthState {
    /// Creates a state holding just a token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: Some(refresh_token.into()),
            token_type: None,
            expires_in: None,
            scope: None,
            expires_at: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Fills in `expires_at` from `expires_in`, measured from now.
    pub fn stamped(mut self) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self
                .expires_in
                .and_then(Duration::try_seconds)
                .map(|lifetime| Utc::now() + lifetime);
        }
        self
    }

    /// Returns `true` if the access token is known to have expired, with a
    /// one-minute margin.
    ///
    /// Tokens without an expiry are treated as valid.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at - Duration::seconds(60) < Utc::now())
    }

    /// Returns `true` if a refresh token is available.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The interactive step of an authorization-code login.
///
/// An implementation shows `authorize_url` to the user, waits for them to log
/// in, and returns the URL their browser was redirected to. It may block
/// indefinitely; no timeout is imposed by the clients.
///
/// Closures can be used directly:
///
/// ```rust
/// use wwt_api_client::auth::LoginPrompt;
///
/// let mut prompt = |_url: &url::Url| -> std::io::Result<String> {
///     Ok("https://login.live.com/oauth20_desktop.srf?code=abc".to_string())
/// };
/// let url = url::Url::parse("https://login.live.com/oauth20_authorize.srf").unwrap();
/// assert!(prompt.redirect_url(&url).unwrap().contains("code=abc"));
/// ```
pub trait LoginPrompt {
    /// Presents the authorization URL and returns the redirect URL.
    fn redirect_url(&mut self, authorize_url: &Url) -> std::io::Result<String>;
}

impl<F> LoginPrompt for F
where
    F: FnMut(&Url) -> std::io::Result<String>,
{
    fn redirect_url(&mut self, authorize_url: &Url) -> std::io::Result<String> {
        self(authorize_url)
    }
}
