//
//  wwt-api-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # WWT API Client Library
//!
//! Typed, validating clients for the AAS WorldWide Telescope web services.
//!
//! ## Overview
//!
//! Every call is a request object: create it from a client, adjust its public
//! fields, then either ask it why it is invalid or send it. Validation runs
//! before anything touches the network.
//!
//! ## Features
//!
//! - **Core WWT endpoints**: ShowImage, TileImage and Login
//! - **Communities**: Microsoft Live OAuth login with cached refresh tokens
//! - **Constellations**: Keycloak OIDC bearer tokens, handles, images and scenes
//! - **Local state**: Credentials saved in the platform data directory
//!
//! ## Module Structure
//!
//! - [`api`]: The request pipeline and the core WWT endpoints
//! - [`auth`]: OAuth grants, login prompts and the state store
//! - [`communities`]: The WWT Communities client
//! - [`constellations`]: The WWT Constellations client
//! - [`config`]: Optional configuration file
//! - [`interactive`]: Terminal login prompt
//! - [`cli`]: Command-line interface definitions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wwt_api_client::{ApiRequest, Client};
//!
//! let client = Client::new();
//! let mut req = client.show_image("http://example.com/space.jpg", "My Image");
//! req.ra_deg = 83.633.into();
//! req.dec_deg = 22.014.into();
//!
//! if let Some(reason) = req.invalidity_reason() {
//!     eprintln!("cannot send: {reason}");
//! } else {
//!     let folder = req.send()?;
//!     println!("{:?}", folder.attr("Name"));
//! }
//! # Ok::<(), wwt_api_client::Error>(())
//! ```

/// Command-line interface definitions.
pub mod cli;

/// The request pipeline shared by all services, and the core WWT endpoints.
pub mod api;

/// OAuth grants, login prompts and persisted credential state.
pub mod auth;

/// The WWT Communities service.
pub mod communities;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/wwt_api_client/config.toml`
/// - macOS: `~/Library/Application Support/org.AAS_WWT.wwt_api_client/config.toml`
/// - Windows: `%APPDATA%\AAS_WWT\wwt_api_client\config\config.toml`
pub mod config;

/// The WWT Constellations service.
pub mod constellations;

/// Interactive terminal UI components.
pub mod interactive;

pub use api::{ApiRequest, Client, Error, Result, DEFAULT_API_BASE};

/// Re-export of the configuration struct.
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary.
pub const APP_NAME: &str = "wwt";

/// Application version constant, taken from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::VERSION;
///
/// println!("wwt version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Example
///
/// ```rust,no_run
/// use wwt_api_client::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// A request failed validation and was never sent.
    pub const USAGE: i32 = 2;

    /// Authentication could not be established.
    ///
    /// Run `wwt communities-login` to log in again.
    pub const AUTH_ERROR: i32 = 4;

    /// The server answered with an error status.
    pub const API_ERROR: i32 = 8;
}
