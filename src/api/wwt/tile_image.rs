//
//  wwt-api-client
//  api/wwt/tile_image.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # TileImage
//!
//! `TileImage.aspx` tiles a large image on the server and returns a WTML
//! folder pointing at the tile pyramid. Geometry that is left unset is
//! inferred by the server from the image's AVM metadata.

use crate::api::client::Client;
use crate::api::common::{Error, Result};
use crate::api::endpoint::{catalog, EndpointDescriptor};
use crate::api::request::{
    scalar_value, wire_scalar_opt, wire_url, ApiRequest, TransportRequest,
};
use crate::api::response::XmlElement;
use crate::api::validate::{format_exponential, wrap_degrees, FieldValue};

/// A request to the `TileImage` service.
#[derive(Debug, Clone)]
pub struct TileImageRequest<'a> {
    client: &'a Client,

    /// Declination of the image center, in degrees. Optional.
    pub dec_deg: FieldValue,
    /// URL of the image. Required.
    pub image_url: FieldValue,
    /// Right ascension of the image center, in degrees. Optional; wrapped
    /// into `[0, 360)`.
    pub ra_deg: FieldValue,
    /// Rotation of the image, in degrees. Optional; sent as given.
    pub rotation_deg: FieldValue,
    /// Angular size of a pixel. Optional; may not be zero.
    pub scale: FieldValue,
}

impl<'a> TileImageRequest<'a> {
    pub(crate) fn new(client: &'a Client, image_url: FieldValue) -> Self {
        Self {
            client,
            dec_deg: FieldValue::None,
            image_url,
            ra_deg: FieldValue::None,
            rotation_deg: FieldValue::None,
            scale: FieldValue::None,
        }
    }
}

impl ApiRequest for TileImageRequest<'_> {
    type Output = XmlElement;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::TILE_IMAGE
    }

    fn session(&self) -> &Client {
        self.client
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![
            &self.dec_deg,
            &self.image_url,
            &self.ra_deg,
            &self.rotation_deg,
            &self.scale,
        ]
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let endpoint = self.descriptor();
        let key = |field: &'static str| endpoint.wire_name(field);
        let url = endpoint.url(self.client.base_url(), &[])?;

        let image_url = wire_url("image_url", &self.image_url)?.ok_or_else(|| {
            Error::InvalidRequest("\"image_url\" must be an absolute URL".to_string())
        })?;

        let ra = match self.ra_deg {
            FieldValue::None => None,
            ref ra => Some(format_exponential(wrap_degrees(scalar_value("ra_deg", ra)?))),
        };

        Ok(TransportRequest::new(endpoint.method, url)
            .query(key("image_url"), image_url)
            .query_opt(key("ra_deg"), ra)
            .query_opt(key("dec_deg"), wire_scalar_opt("dec_deg", &self.dec_deg)?)
            .query_opt(key("scale"), wire_scalar_opt("scale", &self.scale)?)
            .query_opt(
                key("rotation_deg"),
                wire_scalar_opt("rotation_deg", &self.rotation_deg)?,
            )
            .query("wtml", "true"))
    }
}
