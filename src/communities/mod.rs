//
//  wwt-api-client
//  communities/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # WWT Communities
//!
//! The Communities service authenticates through Microsoft Live OAuth. A
//! [`CommunitiesClient`] can only be obtained once a valid token pair is in
//! hand, so construction runs the whole login flow:
//!
//! 1. Resolve the client secret: the explicit argument, else the
//!    `communities-client-secret.txt` state file
//! 2. If `communities-oauth.json` holds a refresh token, exchange it for a
//!    fresh pair
//! 3. If there is no usable cached state, or the refresh was rejected with
//!    `invalid_grant`, run an interactive authorization-code login (only when
//!    allowed)
//! 4. Persist the new state and the secret, owner-only
//!
//! Any failure along the way is fatal; no partially-authenticated client is
//! ever returned.
//!
//! ## Example
//!
//! ```rust,no_run
//! use wwt_api_client::communities::CommunitiesClient;
//! use wwt_api_client::{ApiRequest, Client};
//!
//! let comm = CommunitiesClient::builder(Client::new())
//!     .client_secret("my-secret")
//!     .connect()?;
//!
//! let profile = comm.get_my_profile().send()?;
//! println!("Logged in as {}", profile.profile_name);
//! # Ok::<(), wwt_api_client::api::common::Error>(())
//! ```
//!
//! (`send` comes from [`ApiRequest`](crate::api::request::ApiRequest).)

pub mod enums;
pub mod requests;

pub use enums::*;
pub use requests::*;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::api::client::Client;
use crate::api::common::{Error, Result};
use crate::api::validate::FieldValue;
use crate::auth::{
    authorization_code_grant, authorize_url, extract_code, refresh_grant, ClientCredentials,
    LiveEndpoints, LoginPrompt, OAuthState, StateStore, TokenReply, LIVE_AUTH_SCOPES,
    WWT_CLIENT_ID,
};

/// Basename of the persisted token state.
pub const OAUTH_STATE_BASENAME: &str = "communities-oauth.json";

/// Basename of the persisted client secret.
pub const CLIENT_SECRET_BASENAME: &str = "communities-client-secret.txt";

/// An authenticated client for the WWT Communities service.
///
/// Requests are created through the factory methods and borrow the client,
/// so the parent [`Client`]'s connection is shared.
#[derive(Debug)]
pub struct CommunitiesClient {
    parent: Client,
    state: OAuthState,
}

impl CommunitiesClient {
    /// Starts configuring a login against the services behind `parent`.
    pub fn builder(parent: Client) -> CommunitiesClientBuilder {
        CommunitiesClientBuilder::new(parent)
    }

    /// Wraps a token state that was obtained elsewhere. Nothing is read from
    /// or written to disk.
    pub fn from_parts(parent: Client, state: OAuthState) -> Self {
        Self { parent, state }
    }

    /// The session requests are sent through.
    pub fn parent(&self) -> &Client {
        &self.parent
    }

    /// The current token state.
    pub fn state(&self) -> &OAuthState {
        &self.state
    }

    /// The current access token.
    pub fn access_token(&self) -> &str {
        &self.state.access_token
    }

    /// The current refresh token.
    pub fn refresh_token(&self) -> &str {
        self.state.refresh_token.as_deref().unwrap_or_default()
    }

    /// Creates a new community from a JSON payload.
    pub fn create_community(&self, payload: impl Into<FieldValue>) -> CreateCommunityRequest<'_> {
        CreateCommunityRequest::new(self, payload.into())
    }

    /// Deletes the community with the given ID.
    pub fn delete_community(&self, id: impl Into<FieldValue>) -> DeleteCommunityRequest<'_> {
        DeleteCommunityRequest::new(self, id.into())
    }

    /// Fetches information about the community with the given ID.
    pub fn get_community_info(&self, id: impl Into<FieldValue>) -> GetCommunityInfoRequest<'_> {
        GetCommunityInfoRequest::new(self, id.into())
    }

    /// Lists the most recently created communities.
    pub fn get_latest_community(&self) -> GetLatestCommunityRequest<'_> {
        GetLatestCommunityRequest::new(self)
    }

    /// Fetches the logged-in user's profile.
    pub fn get_my_profile(&self) -> GetMyProfileRequest<'_> {
        GetMyProfileRequest::new(self)
    }

    /// Lists the entities on the logged-in user's profile. Defaults to the
    /// first page of content, with a page size large enough to get everything.
    pub fn get_profile_entities(&self) -> GetProfileEntitiesRequest<'_> {
        GetProfileEntitiesRequest::new(self, EntityType::Content, 1.into(), 99999.into())
    }

    /// Asks whether the logged-in user is registered with Communities.
    pub fn is_user_registered(&self) -> IsUserRegisteredRequest<'_> {
        IsUserRegisteredRequest::new(self)
    }
}

/// Configures and runs the Communities login.
///
/// # Example
///
/// ```rust,no_run
/// use std::io;
/// use wwt_api_client::communities::CommunitiesClient;
/// use wwt_api_client::Client;
///
/// let comm = CommunitiesClient::builder(Client::new())
///     .client_secret("my-secret")
///     .interactive_login_if_needed(true)
///     .prompt(|url: &url::Url| -> io::Result<String> {
///         println!("Open {url} and paste the URL you end up at:");
///         let mut line = String::new();
///         io::stdin().read_line(&mut line)?;
///         Ok(line)
///     })
///     .connect()?;
/// # Ok::<(), wwt_api_client::api::common::Error>(())
/// ```
pub struct CommunitiesClientBuilder {
    parent: Client,
    client_secret: Option<String>,
    interactive_login_if_needed: bool,
    prompt: Option<Box<dyn LoginPrompt>>,
    state_dir: Option<PathBuf>,
    endpoints: LiveEndpoints,
}

impl CommunitiesClientBuilder {
    fn new(parent: Client) -> Self {
        Self {
            parent,
            client_secret: None,
            interactive_login_if_needed: false,
            prompt: None,
            state_dir: None,
            endpoints: LiveEndpoints::default(),
        }
    }

    /// Sets the OAuth client secret. When unset, the secret saved by a
    /// previous login is used.
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Allows an interactive login when no cached credentials work. Off by
    /// default.
    pub fn interactive_login_if_needed(mut self, allowed: bool) -> Self {
        self.interactive_login_if_needed = allowed;
        self
    }

    /// Sets the prompt used for interactive logins.
    pub fn prompt(mut self, prompt: impl LoginPrompt + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    /// Overrides the directory holding the persisted state.
    pub fn state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// Overrides the Microsoft Live endpoints.
    pub fn endpoints(mut self, endpoints: LiveEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Runs the login flow and returns the authenticated client.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if no secret is available, the token
    ///   service refuses a grant for any reason other than an expired refresh
    ///   token, an interactive login is needed but not allowed, or the
    ///   redirect URL carries no authorization code
    /// - [`Error::Configuration`] if the default state directory cannot be
    ///   determined
    /// - Transport, I/O and decode errors as they occur
    pub fn connect(self) -> Result<CommunitiesClient> {
        let Self {
            parent,
            client_secret,
            interactive_login_if_needed,
            prompt,
            state_dir,
            endpoints,
        } = self;

        let store = match state_dir {
            Some(dir) => StateStore::new(dir),
            None => StateStore::open_default()?,
        };

        let secret = match client_secret {
            Some(secret) => secret,
            None => store
                .read_first_line(CLIENT_SECRET_BASENAME)?
                .filter(|secret| !secret.is_empty())
                .ok_or_else(|| {
                    Error::Authentication(format!(
                        "no Communities client secret given and none saved at {}",
                        store.path(CLIENT_SECRET_BASENAME).display()
                    ))
                })?,
        };

        let credentials = ClientCredentials {
            client_id: WWT_CLIENT_ID,
            client_secret: Some(&secret),
            redirect_uri: Some(&endpoints.desktop_redirect),
        };
        let http = parent.http()?;

        let mut state = None;

        match store.read_json::<OAuthState>(OAUTH_STATE_BASENAME)? {
            Some(cached) if cached.can_refresh() => {
                let refresh_token = cached.refresh_token.as_deref().unwrap_or_default();

                match refresh_grant(http, &endpoints.token, &credentials, refresh_token)? {
                    TokenReply::Granted(mut fresh) => {
                        if !fresh.can_refresh() {
                            fresh.refresh_token = cached.refresh_token.clone();
                        }
                        state = Some(fresh);
                    }
                    reply if reply.is_invalid_grant() => {
                        info!("cached Communities login has expired; a new login is required");
                    }
                    TokenReply::Refused { body, .. } => {
                        return Err(Error::Authentication(format!(
                            "failed to refresh the Communities login: {body}"
                        )));
                    }
                }
            }
            Some(_) => warn!("cached Communities login has no refresh token; ignoring it"),
            None => debug!("no cached Communities login"),
        }

        let state = match state {
            Some(state) => state,
            None => {
                if !interactive_login_if_needed {
                    return Err(Error::Authentication(
                        "a new Communities login is required but interactive login is not allowed"
                            .to_string(),
                    ));
                }

                let mut prompt = prompt.ok_or_else(|| {
                    Error::Authentication(
                        "a new Communities login is required but no login prompt was given"
                            .to_string(),
                    )
                })?;

                let url = authorize_url(
                    &endpoints.authorize,
                    WWT_CLIENT_ID,
                    &endpoints.desktop_redirect,
                    &LIVE_AUTH_SCOPES,
                    &[],
                )?;

                info!("starting interactive Communities login");
                let redirect = prompt.redirect_url(&url)?;
                let code = extract_code(&redirect).ok_or_else(|| {
                    Error::Authentication(format!(
                        "the redirect URL carries no authorization code: {}",
                        redirect.trim()
                    ))
                })?;

                authorization_code_grant(http, &endpoints.token, &credentials, &code, None)?
                    .into_state()?
            }
        };

        if !state.can_refresh() {
            return Err(Error::Authentication(
                "the token service did not issue a refresh token".to_string(),
            ));
        }

        store.write_json(OAUTH_STATE_BASENAME, &state)?;
        store.write_line(CLIENT_SECRET_BASENAME, &secret)?;
        info!(dir = %store.dir().display(), "saved Communities login");

        Ok(CommunitiesClient { parent, state })
    }
}
