//
//  wwt-api-client
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response Decoding
//!
//! Helpers that turn a successful response body into the value an endpoint
//! promises: plain text, an XML document tree, a JSON document or typed record,
//! or a `True`/`False` flag.
//!
//! Decoding never falls back to a default: malformed bodies surface as
//! [`DecodeError`]s.
//!
//! ## Example
//!
//! ```rust
//! use wwt_api_client::api::response::parse_xml;
//!
//! let doc = parse_xml(r#"<Folder Name="M31"><Place Name="Andromeda"/></Folder>"#)?;
//! assert_eq!(doc.name, "Folder");
//! assert_eq!(doc.attr("Name"), Some("M31"));
//! assert_eq!(doc.child("Place").and_then(|p| p.attr("Name")), Some("Andromeda"));
//! # Ok::<(), wwt_api_client::api::common::DecodeError>(())
//! ```

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::api::common::{DecodeError, Error, Result};
use crate::api::endpoint::ResponseKind;

/// One element of a parsed XML document.
///
/// Attributes are keyed by name so two elements compare equal regardless of
/// attribute order. Whitespace-only text is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// The element's tag name.
    pub name: String,
    /// The element's attributes, unescaped.
    pub attributes: BTreeMap<String, String>,
    /// The element's text content, if any.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Returns an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the first child with the given tag name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the first descendant (depth-first) with the given tag name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find_map(|c| if c.name == name { Some(c) } else { c.find(name) })
    }

    /// Returns the element text, or `""` when there is none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    fn from_start(start: &BytesStart<'_>) -> std::result::Result<Self, DecodeError> {
        let mut element = Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Self::default()
        };

        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.insert(key, value);
        }

        Ok(element)
    }
}

/// Parses an XML document into its root [`XmlElement`].
///
/// # Errors
///
/// Returns [`DecodeError::Xml`] for malformed markup and
/// [`DecodeError::Unexpected`] for documents with no root, several roots, or
/// unclosed elements.
pub fn parse_xml(body: &str) -> std::result::Result<XmlElement, DecodeError> {
    let mut reader = Reader::from_str(body);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(XmlElement::from_start(&start)?),
            Event::Empty(start) => {
                let element = XmlElement::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Unexpected("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                if text.trim().is_empty() {
                    continue;
                }
                if let Some(top) = stack.last_mut() {
                    top.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DecodeError::Unexpected("unclosed XML element".to_string()));
    }

    root.ok_or_else(|| DecodeError::Unexpected("XML document has no root element".to_string()))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> std::result::Result<(), DecodeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(DecodeError::Unexpected(
                "XML document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

/// An output type that a successful body of a given [`ResponseKind`] decodes
/// into.
///
/// A request whose descriptor declares a different kind fails with
/// [`DecodeError::Unexpected`] rather than guessing.
pub trait FromResponse: Sized {
    /// Decodes `body` as declared by `kind`.
    fn from_response(kind: ResponseKind, body: &str) -> Result<Self>;
}

fn kind_mismatch<T>(kind: ResponseKind, wanted: ResponseKind) -> Result<T> {
    Err(DecodeError::Unexpected(format!(
        "endpoint declares {kind:?} responses, not {wanted:?}"
    ))
    .into())
}

impl FromResponse for String {
    fn from_response(kind: ResponseKind, body: &str) -> Result<Self> {
        match kind {
            ResponseKind::Text => Ok(body.to_string()),
            other => kind_mismatch(other, ResponseKind::Text),
        }
    }
}

impl FromResponse for XmlElement {
    fn from_response(kind: ResponseKind, body: &str) -> Result<Self> {
        match kind {
            ResponseKind::Xml => Ok(parse_xml(body)?),
            other => kind_mismatch(other, ResponseKind::Xml),
        }
    }
}

impl FromResponse for bool {
    fn from_response(kind: ResponseKind, body: &str) -> Result<Self> {
        match kind {
            ResponseKind::Boolean => Ok(parse_bool(body)?),
            other => kind_mismatch(other, ResponseKind::Boolean),
        }
    }
}

impl FromResponse for serde_json::Value {
    fn from_response(kind: ResponseKind, body: &str) -> Result<Self> {
        match kind {
            ResponseKind::Json => Ok(parse_json(body)?),
            other => kind_mismatch(other, ResponseKind::Json),
        }
    }
}

/// Decodes a JSON body into `T`.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> std::result::Result<T, DecodeError> {
    Ok(serde_json::from_str(body)?)
}

/// Decodes the literal `True`/`False` answers some endpoints return.
pub fn parse_bool(body: &str) -> std::result::Result<bool, DecodeError> {
    match body {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(DecodeError::Unexpected(format!(
            "expected \"True\" or \"False\", got {other:?}"
        ))),
    }
}

/// Checks and strips the `error` flag that wraps every JSON response.
///
/// A body whose `error` member is `true` is reported as
/// [`Error::ApiResponse`] carrying the body. Otherwise the member is removed
/// and the remaining document is returned for typed decoding.
pub fn unwrap_envelope(status: StatusCode, body: &str) -> Result<serde_json::Value> {
    let mut value: serde_json::Value = parse_json(body)?;

    let object = value.as_object_mut().ok_or_else(|| {
        Error::Decode(DecodeError::Unexpected(
            "expected a JSON object in the response".to_string(),
        ))
    })?;

    if object.remove("error").and_then(|e| e.as_bool()) == Some(true) {
        return Err(Error::ApiResponse {
            status,
            body: body.to_string(),
        });
    }

    Ok(value)
}

/// Like [`unwrap_envelope`], then decodes the payload into `T`.
pub fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    let value = unwrap_envelope(status, body)?;
    serde_json::from_value(value).map_err(|e| Error::Decode(e.into()))
}
