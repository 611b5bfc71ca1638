//
//  wwt-api-client
//  api/wwt/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Core WWT Endpoints
//!
//! Requests against the classic `/WWTWeb/*.aspx` services. These need no
//! authentication and are created through [`Client`](crate::Client) factory
//! methods.
//!
//! | Request | Endpoint | Output |
//! |---------|----------|--------|
//! | [`ShowImageRequest`] | `GET /WWTWeb/ShowImage.aspx` | WTML folder |
//! | [`TileImageRequest`] | `GET /WWTWeb/TileImage.aspx` | WTML folder |
//! | [`LoginRequest`] | `POST /WWTWeb/login.aspx` | text |

pub mod login;
pub mod show_image;
pub mod tile_image;

pub use login::LoginRequest;
pub use show_image::ShowImageRequest;
pub use tile_image::TileImageRequest;
