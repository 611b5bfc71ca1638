//
//  wwt-api-client
//  api/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Descriptors
//!
//! Every remote operation is described once, statically, by an
//! [`EndpointDescriptor`]: its HTTP method, its URL path template, the schema of
//! the parameters it accepts, and the way its response is decoded. Request
//! types consult their descriptor to validate themselves and to build the
//! transport request, so the descriptor is the single source of truth for the
//! wire contract.
//!
//! The [`catalog`] submodule holds the descriptors for all endpoints this crate
//! speaks to.
//!
//! ## Example
//!
//! ```rust
//! use wwt_api_client::api::endpoint::{catalog, HttpMethod};
//!
//! let endpoint = &catalog::DELETE_COMMUNITY;
//! assert_eq!(endpoint.method, HttpMethod::Post);
//! assert_eq!(endpoint.substitute(&[("id", "610180")]), "/Community/Delete/610180/0");
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::api::common::Result;

/// HTTP methods used by the WWT services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Patch => reqwest::Method::PATCH,
        }
    }
}

/// The semantic type of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Anything renderable as text.
    Text,
    /// An ASCII URL with a network location.
    AbsoluteUrl,
    /// A finite number.
    Scalar,
    /// A genuine boolean.
    Bool,
    /// An integer.
    Integer,
    /// A JSON object payload.
    JsonObject,
}

/// An additional numeric constraint on a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// No constraint.
    None,
    /// The value must lie in `[min, max]`.
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The value must not be zero.
    NonZero,
    /// The value must not be negative.
    NonNegative,
}

/// The declaration of one request field.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::endpoint::{Constraint, FieldKind, FieldSpec};
///
/// const DEC: FieldSpec = FieldSpec::required("dec_deg", FieldKind::Scalar)
///     .with_constraint(Constraint::Range { min: -90.0, max: 90.0 })
///     .wire("dec");
///
/// assert_eq!(DEC.wire_name(), "dec");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// The field name, as used in validation messages.
    pub name: &'static str,
    /// The parameter name on the wire, when it differs from `name`.
    pub wire_name: Option<&'static str>,
    /// The semantic type.
    pub kind: FieldKind,
    /// Whether the field may be left unset.
    pub optional: bool,
    /// An extra numeric constraint.
    pub constraint: Constraint,
}

impl FieldSpec {
    /// Declares a field that must be set.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            wire_name: None,
            kind,
            optional: false,
            constraint: Constraint::None,
        }
    }

    /// Declares a field that may be left unset.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            optional: true,
            ..Self::required(name, kind)
        }
    }

    /// Adds a numeric constraint.
    pub const fn with_constraint(self, constraint: Constraint) -> Self {
        Self { constraint, ..self }
    }

    /// Sets the wire name.
    pub const fn wire(self, wire_name: &'static str) -> Self {
        Self {
            wire_name: Some(wire_name),
            ..self
        }
    }

    /// Returns the parameter name used on the wire.
    pub fn wire_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }
}

/// How a successful response body is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The body text as-is.
    Text,
    /// An XML document.
    Xml,
    /// A JSON document, possibly decoded into a typed record.
    Json,
    /// The literal text `True` or `False`.
    Boolean,
}

/// The static description of one remote endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointDescriptor {
    /// A short identifier, used in logs.
    pub id: &'static str,
    /// The HTTP method.
    pub method: HttpMethod,
    /// The path template; `{name}` placeholders are substituted per request.
    pub path: &'static str,
    /// The declared parameters, in validation order.
    pub params: &'static [FieldSpec],
    /// The response decoding strategy.
    pub response: ResponseKind,
}

impl EndpointDescriptor {
    /// Substitutes `{name}` placeholders in the path template.
    pub fn substitute(&self, params: &[(&str, &str)]) -> String {
        let mut path = self.path.to_string();
        for (key, value) in params {
            path = path.replace(&format!("{{{key}}}"), value);
        }
        path
    }

    /// Builds the absolute URL for this endpoint under `base`.
    ///
    /// `base` may carry a path prefix; a trailing slash on it is ignored.
    pub fn url(&self, base: &str, params: &[(&str, &str)]) -> Result<Url> {
        let path = self.substitute(params);
        Ok(Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))?)
    }

    /// Looks up a declared parameter by field name.
    pub fn param(&self, name: &str) -> Option<&FieldSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    /// Returns the name a field is sent under. Undeclared names pass through.
    pub fn wire_name(&self, field: &'static str) -> &'static str {
        self.param(field).map_or(field, FieldSpec::wire_name)
    }
}

/// Characters escaped in a path segment: all but unreserved ones and `/`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes a value for use as a URL path segment.
///
/// Unreserved characters and `/` pass through; everything else is encoded
/// byte-wise from UTF-8.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::endpoint::encode_path_segment;
///
/// assert_eq!(encode_path_segment("my handle"), "my%20handle");
/// assert_eq!(encode_path_segment("a/b_c~d"), "a/b_c~d");
/// ```
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Descriptors for every endpoint the crate talks to.
pub mod catalog {
    use super::{
        Constraint, EndpointDescriptor, FieldKind, FieldSpec, HttpMethod, ResponseKind,
    };

    // WWT core

    /// `POST /WWTWeb/login.aspx`
    pub static LOGIN: EndpointDescriptor = EndpointDescriptor {
        id: "login",
        method: HttpMethod::Post,
        path: "/WWTWeb/login.aspx",
        params: &[
            FieldSpec::required("user_guid", FieldKind::Text).wire("user"),
            FieldSpec::required("client_version", FieldKind::Text).wire("Version"),
            FieldSpec::required("equinox", FieldKind::Bool).wire("Equinox"),
        ],
        response: ResponseKind::Text,
    };

    /// `GET /WWTWeb/ShowImage.aspx`
    pub static SHOW_IMAGE: EndpointDescriptor = EndpointDescriptor {
        id: "show_image",
        method: HttpMethod::Get,
        path: "/WWTWeb/ShowImage.aspx",
        params: &[
            FieldSpec::optional("credits", FieldKind::Text),
            FieldSpec::optional("credits_url", FieldKind::AbsoluteUrl).wire("creditsUrl"),
            FieldSpec::required("dec_deg", FieldKind::Scalar)
                .with_constraint(Constraint::Range {
                    min: -90.0,
                    max: 90.0,
                })
                .wire("dec"),
            FieldSpec::required("image_url", FieldKind::AbsoluteUrl).wire("imageurl"),
            FieldSpec::required("name", FieldKind::Text),
            FieldSpec::required("ra_deg", FieldKind::Scalar).wire("ra"),
            FieldSpec::required("reverse_parity", FieldKind::Bool).wire("reverseparity"),
            FieldSpec::required("rotation_deg", FieldKind::Scalar).wire("rotation"),
            FieldSpec::required("scale", FieldKind::Scalar).with_constraint(Constraint::NonZero),
            FieldSpec::optional("thumbnail_url", FieldKind::AbsoluteUrl).wire("thumb"),
            FieldSpec::required("x_offset_pixels", FieldKind::Scalar).wire("x"),
            FieldSpec::required("y_offset_pixels", FieldKind::Scalar).wire("y"),
        ],
        response: ResponseKind::Xml,
    };

    /// `GET /WWTWeb/TileImage.aspx`
    pub static TILE_IMAGE: EndpointDescriptor = EndpointDescriptor {
        id: "tile_image",
        method: HttpMethod::Get,
        path: "/WWTWeb/TileImage.aspx",
        params: &[
            FieldSpec::optional("dec_deg", FieldKind::Scalar)
                .with_constraint(Constraint::Range {
                    min: -90.0,
                    max: 90.0,
                })
                .wire("dec"),
            FieldSpec::required("image_url", FieldKind::AbsoluteUrl).wire("imageurl"),
            FieldSpec::optional("ra_deg", FieldKind::Scalar).wire("ra"),
            FieldSpec::optional("rotation_deg", FieldKind::Scalar).wire("rotation"),
            FieldSpec::optional("scale", FieldKind::Scalar).with_constraint(Constraint::NonZero),
        ],
        response: ResponseKind::Xml,
    };

    // Communities

    /// `POST /Community/Create/New`
    pub static CREATE_COMMUNITY: EndpointDescriptor = EndpointDescriptor {
        id: "create_community",
        method: HttpMethod::Post,
        path: "/Community/Create/New",
        params: &[FieldSpec::required("payload", FieldKind::JsonObject)],
        response: ResponseKind::Json,
    };

    /// `POST /Community/Delete/{id}/0`; the trailing parent ID is unused.
    pub static DELETE_COMMUNITY: EndpointDescriptor = EndpointDescriptor {
        id: "delete_community",
        method: HttpMethod::Post,
        path: "/Community/Delete/{id}/0",
        params: &[FieldSpec::required("id", FieldKind::Integer)],
        response: ResponseKind::Boolean,
    };

    /// `GET /Community/Detail/{id}`
    pub static GET_COMMUNITY_INFO: EndpointDescriptor = EndpointDescriptor {
        id: "get_community_info",
        method: HttpMethod::Get,
        path: "/Community/Detail/{id}",
        params: &[FieldSpec::required("id", FieldKind::Integer)],
        response: ResponseKind::Json,
    };

    /// `GET /Resource/Service/Browse/LatestCommunity`
    pub static GET_LATEST_COMMUNITY: EndpointDescriptor = EndpointDescriptor {
        id: "get_latest_community",
        method: HttpMethod::Get,
        path: "/Resource/Service/Browse/LatestCommunity",
        params: &[],
        response: ResponseKind::Xml,
    };

    /// `GET /Profile/MyProfile/Get`
    pub static GET_MY_PROFILE: EndpointDescriptor = EndpointDescriptor {
        id: "get_my_profile",
        method: HttpMethod::Get,
        path: "/Profile/MyProfile/Get",
        params: &[],
        response: ResponseKind::Json,
    };

    /// `GET /Profile/Entities/{type}/{page}/{size}`
    pub static GET_PROFILE_ENTITIES: EndpointDescriptor = EndpointDescriptor {
        id: "get_profile_entities",
        method: HttpMethod::Get,
        path: "/Profile/Entities/{type}/{page}/{size}",
        params: &[
            FieldSpec::required("current_page", FieldKind::Integer),
            FieldSpec::required("page_size", FieldKind::Integer),
        ],
        response: ResponseKind::Json,
    };

    /// `GET /Resource/Service/User`
    pub static IS_USER_REGISTERED: EndpointDescriptor = EndpointDescriptor {
        id: "is_user_registered",
        method: HttpMethod::Get,
        path: "/Resource/Service/User",
        params: &[],
        response: ResponseKind::Boolean,
    };

    // Constellations

    /// `POST /images/find-by-legacy-url`
    pub static CX_FIND_IMAGES_BY_LEGACY_URL: EndpointDescriptor = EndpointDescriptor {
        id: "cx_find_images_by_legacy_url",
        method: HttpMethod::Post,
        path: "/images/find-by-legacy-url",
        params: &[FieldSpec::required("wwt_legacy_url", FieldKind::Text)],
        response: ResponseKind::Json,
    };

    /// `GET /scenes/home-timeline`
    pub static CX_HOME_TIMELINE: EndpointDescriptor = EndpointDescriptor {
        id: "cx_home_timeline",
        method: HttpMethod::Get,
        path: "/scenes/home-timeline",
        params: &[FieldSpec::required("page_num", FieldKind::Integer)
            .with_constraint(Constraint::NonNegative)
            .wire("page")],
        response: ResponseKind::Json,
    };

    /// `GET /images/builtin-backgrounds`
    pub static CX_BUILTIN_BACKGROUNDS: EndpointDescriptor = EndpointDescriptor {
        id: "cx_builtin_backgrounds",
        method: HttpMethod::Get,
        path: "/images/builtin-backgrounds",
        params: &[],
        response: ResponseKind::Json,
    };

    /// `GET /handle/{handle}`
    pub static CX_HANDLE_GET: EndpointDescriptor = EndpointDescriptor {
        id: "cx_handle_get",
        method: HttpMethod::Get,
        path: "/handle/{handle}",
        params: &[],
        response: ResponseKind::Json,
    };

    /// `PATCH /handle/{handle}`
    pub static CX_HANDLE_UPDATE: EndpointDescriptor = EndpointDescriptor {
        id: "cx_handle_update",
        method: HttpMethod::Patch,
        path: "/handle/{handle}",
        params: &[],
        response: ResponseKind::Json,
    };

    /// `POST /handle/{handle}/scene`
    pub static CX_HANDLE_ADD_SCENE: EndpointDescriptor = EndpointDescriptor {
        id: "cx_handle_add_scene",
        method: HttpMethod::Post,
        path: "/handle/{handle}/scene",
        params: &[],
        response: ResponseKind::Json,
    };

    /// `GET /image/{id}/img.wtml`
    pub static CX_IMAGE_WTML: EndpointDescriptor = EndpointDescriptor {
        id: "cx_image_wtml",
        method: HttpMethod::Get,
        path: "/image/{id}/img.wtml",
        params: &[],
        response: ResponseKind::Xml,
    };

    /// `GET /scene/{id}`
    pub static CX_SCENE_GET: EndpointDescriptor = EndpointDescriptor {
        id: "cx_scene_get",
        method: HttpMethod::Get,
        path: "/scene/{id}",
        params: &[],
        response: ResponseKind::Json,
    };

    /// `PATCH /scene/{id}`
    pub static CX_SCENE_UPDATE: EndpointDescriptor = EndpointDescriptor {
        id: "cx_scene_update",
        method: HttpMethod::Patch,
        path: "/scene/{id}",
        params: &[],
        response: ResponseKind::Json,
    };
}
