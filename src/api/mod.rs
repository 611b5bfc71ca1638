//
//  wwt-api-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Request Layer
//!
//! This module provides the request framework shared by every WWT web service
//! family, plus the core (unauthenticated) WWT endpoints.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`validate`]: Field values and the semantic type checks run before sending
//! - [`endpoint`]: Static endpoint descriptors (method, path, parameter schema)
//! - [`request`]: The [`ApiRequest`] trait and the transport request it builds
//! - [`response`]: Response body decoding (XML tree, JSON, `True`/`False`)
//! - [`client`]: The [`Client`] session and its shared HTTP connection
//! - [`wwt`]: ShowImage, TileImage and Login requests
//! - [`common`]: The error taxonomy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wwt_api_client::api::request::ApiRequest;
//! use wwt_api_client::api::Client;
//!
//! let client = Client::new();
//! let folder = client.show_image("http://localhost/image.jpg", "name").send()?;
//! println!("{:?}", folder.attr("Name"));
//! # Ok::<(), wwt_api_client::api::common::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`common::Result`]. See [`common::Error`] for which
//! failures are recoverable.

/// The session object and its shared HTTP connection.
pub mod client;

/// The error taxonomy shared by all request families.
pub mod common;

/// Static endpoint descriptors and the endpoint catalog.
pub mod endpoint;

/// The validate, build, dispatch and decode pipeline.
pub mod request;

/// Response body decoding.
pub mod response;

/// Field values and validation primitives.
pub mod validate;

/// Core WWT endpoints.
pub mod wwt;

pub use client::{Client, DEFAULT_API_BASE};
pub use common::{DecodeError, Error, Result};
pub use request::ApiRequest;
