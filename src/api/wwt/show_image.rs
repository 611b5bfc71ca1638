//
//  wwt-api-client
//  api/wwt/show_image.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # ShowImage
//!
//! `ShowImage.aspx` wraps a single, untiled sky image in a WTML folder so that
//! WWT can display it. The image is placed by its center coordinates, pixel
//! offsets, angular scale and rotation.
//!
//! ## Wire format
//!
//! - Numbers are sent as `%.18e` exponentials
//! - `ra` is wrapped into `[0, 360)` rather than rejected
//! - `rotation` is offset by 180 degrees; the service expects it that way
//! - `name` and `credits` are XML-escaped, then any non-ASCII character is
//!   sent as a numeric character reference
//! - Unset optional parameters are left off entirely

use crate::api::client::Client;
use crate::api::common::{Error, Result};
use crate::api::endpoint::{catalog, EndpointDescriptor};
use crate::api::request::{
    scalar_value, wire_scalar, wire_text, wire_url, ApiRequest, TransportRequest,
};
use crate::api::response::XmlElement;
use crate::api::validate::{format_exponential, wrap_degrees, FieldValue};

/// A request to the `ShowImage` service.
///
/// Create one with [`Client::show_image`]. Every field may be reassigned
/// before sending; the request is re-validated on every send.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::request::ApiRequest;
/// use wwt_api_client::Client;
///
/// let client = Client::new();
/// let mut req = client.show_image("http://localhost/image.jpg", "name");
///
/// req.dec_deg = 91.0.into();
/// assert_eq!(
///     req.invalidity_reason().as_deref(),
///     Some("\"dec_deg\" must be between -90 and 90")
/// );
///
/// req.dec_deg = 90.0.into();
/// assert_eq!(req.invalidity_reason(), None);
/// ```
#[derive(Debug, Clone)]
pub struct ShowImageRequest<'a> {
    client: &'a Client,

    /// Credits text for the image. Optional.
    pub credits: FieldValue,
    /// A URL with more information about the image. Optional.
    pub credits_url: FieldValue,
    /// Declination of the image center, in degrees. Default `0`.
    pub dec_deg: FieldValue,
    /// URL of the image itself. Required.
    pub image_url: FieldValue,
    /// Display name. Required. Commas are stripped by the server.
    pub name: FieldValue,
    /// Right ascension of the image center, in degrees. Default `0`.
    pub ra_deg: FieldValue,
    /// Whether the image has reversed parity. Default `false`.
    pub reverse_parity: FieldValue,
    /// Rotation of the image, in degrees. Default `0`.
    pub rotation_deg: FieldValue,
    /// Angular size of a pixel, in arcseconds. Default `1`; may not be zero.
    pub scale: FieldValue,
    /// URL of a thumbnail. Optional.
    pub thumbnail_url: FieldValue,
    /// Horizontal offset of the reference pixel. Default `0`.
    pub x_offset_pixels: FieldValue,
    /// Vertical offset of the reference pixel. Default `0`.
    pub y_offset_pixels: FieldValue,
}

impl<'a> ShowImageRequest<'a> {
    pub(crate) fn new(client: &'a Client, image_url: FieldValue, name: FieldValue) -> Self {
        Self {
            client,
            credits: FieldValue::None,
            credits_url: FieldValue::None,
            dec_deg: FieldValue::Float(0.0),
            image_url,
            name,
            ra_deg: FieldValue::Float(0.0),
            reverse_parity: FieldValue::Bool(false),
            rotation_deg: FieldValue::Float(0.0),
            scale: FieldValue::Float(1.0),
            thumbnail_url: FieldValue::None,
            x_offset_pixels: FieldValue::Float(0.0),
            y_offset_pixels: FieldValue::Float(0.0),
        }
    }
}

impl ApiRequest for ShowImageRequest<'_> {
    type Output = XmlElement;

    fn descriptor(&self) -> &'static EndpointDescriptor {
        &catalog::SHOW_IMAGE
    }

    fn session(&self) -> &Client {
        self.client
    }

    fn field_values(&self) -> Vec<&FieldValue> {
        vec![
            &self.credits,
            &self.credits_url,
            &self.dec_deg,
            &self.image_url,
            &self.name,
            &self.ra_deg,
            &self.reverse_parity,
            &self.rotation_deg,
            &self.scale,
            &self.thumbnail_url,
            &self.x_offset_pixels,
            &self.y_offset_pixels,
        ]
    }

    fn warnings(&self) -> Vec<String> {
        match self.name.to_text(self.client.encoding()) {
            Some(name) if name.contains(',') => vec![format!(
                "the name {name:?} contains commas, which the server will strip"
            )],
            _ => Vec::new(),
        }
    }

    fn make_request(&self) -> Result<TransportRequest> {
        let encoding = self.client.encoding();
        let endpoint = self.descriptor();
        let key = |field: &'static str| endpoint.wire_name(field);
        let url = endpoint.url(self.client.base_url(), &[])?;

        let ra = wrap_degrees(scalar_value("ra_deg", &self.ra_deg)?);
        let rotation = scalar_value("rotation_deg", &self.rotation_deg)? + 180.0;
        let image_url = wire_url("image_url", &self.image_url)?.ok_or_else(|| {
            Error::InvalidRequest("\"image_url\" must be an absolute URL".to_string())
        })?;

        let credits = match self.credits {
            FieldValue::None => None,
            ref credits => Some(wire_text("credits", credits, encoding, false)?),
        };

        let mut request = TransportRequest::new(endpoint.method, url)
            .query(key("name"), wire_text("name", &self.name, encoding, true)?)
            .query(key("ra_deg"), format_exponential(ra))
            .query(key("dec_deg"), wire_scalar("dec_deg", &self.dec_deg)?)
            .query(
                key("x_offset_pixels"),
                wire_scalar("x_offset_pixels", &self.x_offset_pixels)?,
            )
            .query(
                key("y_offset_pixels"),
                wire_scalar("y_offset_pixels", &self.y_offset_pixels)?,
            )
            .query(key("scale"), wire_scalar("scale", &self.scale)?)
            .query(key("rotation_deg"), format_exponential(rotation))
            .query(key("image_url"), image_url)
            .query_opt(
                key("thumbnail_url"),
                wire_url("thumbnail_url", &self.thumbnail_url)?,
            )
            .query_opt(key("credits"), credits)
            .query_opt(key("credits_url"), wire_url("credits_url", &self.credits_url)?);

        if self.reverse_parity.as_bool() == Some(true) {
            request = request.query(key("reverse_parity"), "true");
        }

        Ok(request.query("wtml", "true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::with_base("http://localhost:7000")
    }

    #[test]
    fn test_defaults_are_valid() {
        let client = client();
        let req = client.show_image("http://localhost/image.jpg", "name");
        assert_eq!(req.invalidity_reason(), None);
    }

    #[test]
    fn test_default_wire_parameters() {
        let client = client();
        let req = client
            .show_image("http://localhost/image.jpg", "name")
            .make_request()
            .unwrap();

        let keys: Vec<&str> = req.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["name", "ra", "dec", "x", "y", "scale", "rotation", "imageurl", "wtml"]
        );
        assert_eq!(req.query_value("ra"), Some("0.000000000000000000e+00"));
        assert_eq!(req.query_value("scale"), Some("1.000000000000000000e+00"));
        assert_eq!(req.query_value("rotation"), Some("1.800000000000000000e+02"));
        assert_eq!(req.query_value("wtml"), Some("true"));
    }

    #[test]
    fn test_query_keys_come_from_the_descriptor() {
        let client = client();
        let mut req = client.show_image("http://localhost/image.jpg", "name");
        req.credits = "c".into();
        req.credits_url = "http://localhost/credits".into();
        req.thumbnail_url = "http://localhost/thumb.jpg".into();
        req.reverse_parity = true.into();

        let built = req.make_request().unwrap();
        let declared: Vec<&str> = catalog::SHOW_IMAGE
            .params
            .iter()
            .map(|spec| spec.wire_name())
            .collect();

        for (key, _) in &built.query {
            assert!(key == "wtml" || declared.contains(&key.as_str()), "{key} is undeclared");
        }
        for key in &declared {
            assert!(built.query_value(key).is_some(), "{key} was not sent");
        }
    }

    #[test]
    fn test_ra_wraps_instead_of_failing() {
        let client = client();
        let mut req = client.show_image("http://localhost/image.jpg", "name");

        req.ra_deg = 980.0.into();
        assert_eq!(req.invalidity_reason(), None);
        let wrapped = req.make_request().unwrap();

        req.ra_deg = 260.0.into();
        let direct = req.make_request().unwrap();

        assert_eq!(wrapped.query_value("ra"), direct.query_value("ra"));
        assert_eq!(wrapped.query_value("ra"), Some("2.600000000000000000e+02"));
    }

    #[test]
    fn test_optional_parameters() {
        let client = client();
        let mut req = client.show_image("http://localhost/image.jpg", "name");
        req.credits = "A & B".into();
        req.credits_url = "http://localhost/credits".into();
        req.thumbnail_url = "http://localhost/thumb.jpg".into();
        req.reverse_parity = true.into();

        let built = req.make_request().unwrap();
        assert_eq!(built.query_value("credits"), Some("A &amp; B"));
        assert_eq!(built.query_value("creditsUrl"), Some("http://localhost/credits"));
        assert_eq!(built.query_value("thumb"), Some("http://localhost/thumb.jpg"));
        assert_eq!(built.query_value("reverseparity"), Some("true"));
    }

    #[test]
    fn test_name_is_escaped_to_ascii() {
        let client = client();
        let req = client.show_image("http://localhost/image.jpg", "\"Objéct\" <1>");
        let built = req.make_request().unwrap();
        assert_eq!(
            built.query_value("name"),
            Some("&quot;Obj&#233;ct&quot; &lt;1&gt;")
        );
    }

    #[test]
    fn test_comma_is_a_warning_not_an_error() {
        let client = client();
        let req = client.show_image("http://localhost/image.jpg", "M31, Andromeda");
        assert_eq!(req.warnings().len(), 1);
        assert_eq!(req.invalidity_reason(), None);
        assert_eq!(
            req.make_request().unwrap().query_value("name"),
            Some("M31, Andromeda")
        );
    }

    #[test]
    fn test_invalidity_reason_is_stable() {
        let client = client();
        let mut req = client.show_image("not_absolute_url", "name");
        req.scale = 0.0.into();

        let first = req.invalidity_reason();
        let second = req.invalidity_reason();
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("\"image_url\" must be an absolute URL"));
    }
}
