//
//  wwt-api-client
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Terminal Login Prompt
//!
//! A [`LoginPrompt`] that prints the authorization URL, optionally opens it
//! in the browser, and reads the redirect URL the user pastes back.

use std::io;

use console::style;
use dialoguer::Input;
use tracing::warn;
use url::Url;

use crate::auth::LoginPrompt;

/// Shows the login URL on standard error and reads the redirect URL from the
/// terminal.
///
/// # Example
///
/// ```rust,no_run
/// use wwt_api_client::communities::CommunitiesClient;
/// use wwt_api_client::interactive::TerminalLoginPrompt;
/// use wwt_api_client::Client;
///
/// let comm = CommunitiesClient::builder(Client::new())
///     .client_secret("my-secret")
///     .interactive_login_if_needed(true)
///     .prompt(TerminalLoginPrompt::new().open_browser(true))
///     .connect()?;
/// # Ok::<(), wwt_api_client::api::common::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerminalLoginPrompt {
    open_browser: bool,
}

impl TerminalLoginPrompt {
    /// Creates a prompt that only prints the URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also tries to open the URL in the default browser.
    pub fn open_browser(mut self, enabled: bool) -> Self {
        self.open_browser = enabled;
        self
    }
}

impl LoginPrompt for TerminalLoginPrompt {
    fn redirect_url(&mut self, authorize_url: &Url) -> io::Result<String> {
        eprintln!();
        eprintln!("{}", style("Log in to Microsoft Live").bold());
        eprintln!();
        eprintln!("  1. Open this URL in a web browser and log in:");
        eprintln!();
        eprintln!("     {}", style(authorize_url).cyan());
        eprintln!();
        eprintln!("  2. You will end up on a blank page. Copy its full URL from the");
        eprintln!("     address bar and paste it below.");
        eprintln!();

        if self.open_browser {
            if let Err(e) = webbrowser::open(authorize_url.as_str()) {
                warn!(error = %e, "could not open a browser");
            }
        }

        let redirect: String = Input::new()
            .with_prompt("Redirect URL")
            .interact_text()
            .map_err(io::Error::other)?;

        Ok(pasted_redirect(&redirect))
    }
}

/// Cleans up a pasted redirect URL. A URL without a `code` parameter is kept
/// as-is; the login flow reports it.
fn pasted_redirect(input: &str) -> String {
    input.trim().to_string()
}
