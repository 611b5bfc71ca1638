//
//  wwt-api-client
//  api/validate.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Field Validation
//!
//! Request fields are stored as [`FieldValue`]s: a small tagged union that can
//! hold anything a caller might reasonably assign to a request parameter. The
//! functions in this module classify such values against the semantic types the
//! WWT services understand (text, absolute URL, finite number, boolean) without
//! ever failing: a value that cannot be classified is simply `false`.
//!
//! [`check_fields`] runs the checks declared by an endpoint's field schema in
//! order and reports the first failure as a human-readable reason.
//!
//! The module also holds the wire formatting helpers shared by the endpoints:
//! the fixed exponential number format, right-ascension wrapping and the
//! ASCII-safe text encoding.
//!
//! ## Example
//!
//! ```rust
//! use wwt_api_client::api::validate::{is_scalar, is_absolute_url, FieldValue};
//!
//! assert!(is_scalar(&FieldValue::from(12.5), false));
//! assert!(!is_scalar(&FieldValue::from(f64::NAN), false));
//! assert!(is_absolute_url(&FieldValue::from("//localhost/image.jpg"), false));
//! assert!(!is_absolute_url(&FieldValue::from("not_absolute_url"), false));
//! ```

use url::Url;

use crate::api::endpoint::{Constraint, FieldKind, FieldSpec};

/// A dynamically-typed request parameter value.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::validate::FieldValue;
///
/// let name: FieldValue = "M 31".into();
/// let scale: FieldValue = 2.5.into();
/// let unset: FieldValue = None::<f64>.into();
///
/// assert!(!name.is_none());
/// assert_eq!(scale.as_f64(), Some(2.5));
/// assert!(unset.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value; optional parameters in this state are left off the wire.
    #[default]
    None,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number. May be NaN or infinite until validated.
    Float(f64),
    /// Unicode text.
    Text(String),
    /// Raw bytes, decoded with the client's [`TextEncoding`] when rendered.
    Bytes(Vec<u8>),
    /// A JSON document, used for request payloads.
    Json(serde_json::Value),
}

impl FieldValue {
    /// Returns `true` if no value is set.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Converts the value to a float.
    ///
    /// Booleans count as `1`/`0`, text and bytes are parsed after trimming
    /// whitespace. Returns `None` for values with no numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bytes(b) => std::str::from_utf8(b).ok()?.trim().parse().ok(),
            Self::None | Self::Json(_) => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders the value as text in the given encoding.
    ///
    /// Returns `None` for [`FieldValue::None`] and for text or bytes that are
    /// not representable in `encoding`.
    pub fn to_text(&self, encoding: TextEncoding) -> Option<String> {
        match self {
            Self::None => None,
            Self::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(format!("{f:?}")),
            Self::Text(s) => encoding.can_encode(s).then(|| s.clone()),
            Self::Bytes(b) => encoding.decode(b),
            Self::Json(v) => Some(v.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

/// The text encoding used to judge and render textual values.
///
/// Defaults to UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// Strict 7-bit ASCII.
    Ascii,
}

impl TextEncoding {
    /// Returns `true` if `text` can be encoded without loss.
    pub fn can_encode(self, text: &str) -> bool {
        match self {
            Self::Utf8 => true,
            Self::Ascii => text.is_ascii(),
        }
    }

    /// Decodes `bytes`, returning `None` if they are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
            Self::Ascii => bytes
                .is_ascii()
                .then(|| String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Returns `true` if `value` can be rendered as text in `encoding`.
///
/// `None` passes only when `none_ok` is set. Bytes must decode in `encoding`;
/// every other kind of value has a textual rendering.
pub fn is_textable(value: &FieldValue, none_ok: bool, encoding: TextEncoding) -> bool {
    match value {
        FieldValue::None => none_ok,
        other => other.to_text(encoding).is_some(),
    }
}

/// Returns `true` if `value` is an absolute URL with a network location.
///
/// The value must be pure ASCII: bytes must decode as ASCII and text must
/// encode as ASCII. Scheme-relative URLs such as `//host/path` are accepted.
pub fn is_absolute_url(value: &FieldValue, none_ok: bool) -> bool {
    let text = match value {
        FieldValue::None => return none_ok,
        FieldValue::Bytes(b) => match TextEncoding::Ascii.decode(b) {
            Some(s) => s,
            None => return false,
        },
        FieldValue::Text(s) if !s.is_ascii() => return false,
        other => match other.to_text(TextEncoding::Ascii) {
            Some(s) => s,
            None => return false,
        },
    };

    has_network_location(&text)
}

fn has_network_location(text: &str) -> bool {
    let candidate = if text.starts_with("//") {
        format!("http:{text}")
    } else {
        text.to_string()
    };

    Url::parse(&candidate)
        .ok()
        .and_then(|url| url.host_str().map(|host| !host.is_empty()))
        .unwrap_or(false)
}

/// Returns `true` if `value` converts to a finite floating-point number.
pub fn is_scalar(value: &FieldValue, none_ok: bool) -> bool {
    match value {
        FieldValue::None => none_ok,
        other => other.as_f64().is_some_and(f64::is_finite),
    }
}

/// Returns `true` only for genuine booleans; `1`, `0` and `"t"` are rejected.
pub fn is_bool(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Bool(_))
}

/// Returns `true` only for integers.
pub fn is_integer(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Int(_))
}

/// Returns `true` only for JSON objects.
pub fn is_json_object(value: &FieldValue) -> bool {
    matches!(value, FieldValue::Json(serde_json::Value::Object(_)))
}

/// Runs the schema checks in declaration order and returns the first failure.
///
/// `values` must line up with `specs`. Constraints are only evaluated for
/// values that are set.
pub fn check_fields(
    specs: &[FieldSpec],
    values: &[&FieldValue],
    encoding: TextEncoding,
) -> Option<String> {
    debug_assert_eq!(specs.len(), values.len());

    specs
        .iter()
        .zip(values)
        .find_map(|(spec, value)| check_field(spec, value, encoding))
}

fn check_field(spec: &FieldSpec, value: &FieldValue, encoding: TextEncoding) -> Option<String> {
    let name = spec.name;
    let opt = if spec.optional { "None or " } else { "" };

    let kind_ok = match spec.kind {
        FieldKind::Text => is_textable(value, spec.optional, encoding),
        FieldKind::AbsoluteUrl => is_absolute_url(value, spec.optional),
        FieldKind::Scalar => is_scalar(value, spec.optional),
        FieldKind::Bool => is_bool(value),
        FieldKind::Integer => is_integer(value) || (spec.optional && value.is_none()),
        FieldKind::JsonObject => is_json_object(value),
    };

    if !kind_ok {
        let expected = match spec.kind {
            FieldKind::Text => "a string",
            FieldKind::AbsoluteUrl => "an absolute URL",
            FieldKind::Scalar => "a finite number",
            FieldKind::Bool => "a bool",
            FieldKind::Integer => "an integer",
            FieldKind::JsonObject => "a JSON dictionary",
        };
        return Some(format!("\"{name}\" must be {opt}{expected}"));
    }

    let number = value.as_f64()?;

    match spec.constraint {
        Constraint::None => None,
        Constraint::Range { min, max } if !(min..=max).contains(&number) => {
            Some(format!("\"{name}\" must be between {min} and {max}"))
        }
        Constraint::Range { .. } => None,
        Constraint::NonZero if number == 0.0 => Some(format!("\"{name}\" cannot be zero")),
        Constraint::NonZero => None,
        Constraint::NonNegative if number < 0.0 => {
            Some(format!("\"{name}\" must not be negative"))
        }
        Constraint::NonNegative => None,
    }
}

/// Formats a number as C's `%.18e` does: `1.000000000000000000e+00`.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::validate::format_exponential;
///
/// assert_eq!(format_exponential(1.0), "1.000000000000000000e+00");
/// assert_eq!(format_exponential(-0.25), "-2.500000000000000000e-01");
/// ```
pub fn format_exponential(value: f64) -> String {
    let raw = format!("{value:.18e}");

    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
///
/// Values outside the range are wrapped, never rejected: `980` becomes `260`
/// and `-720` becomes `0`.
pub fn wrap_degrees(value: f64) -> f64 {
    value.rem_euclid(360.0) + 0.0
}

/// Encodes text for a query parameter that must be strict ASCII.
///
/// `<`, `>` and `&` are XML-escaped (plus `"` when `escape_quote` is set) and
/// any remaining non-ASCII character becomes a numeric character reference.
///
/// # Example
///
/// ```rust
/// use wwt_api_client::api::validate::encode_wire_text;
///
/// assert_eq!(encode_wire_text("A & B", false), "A &amp; B");
/// assert_eq!(encode_wire_text("\"Objéct\"", true), "&quot;Obj&#233;ct&quot;");
/// ```
pub fn encode_wire_text(text: &str, escape_quote: bool) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if escape_quote => out.push_str("&quot;"),
            c if c.is_ascii() => out.push(c),
            c => out.push_str(&format!("&#{};", c as u32)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_textable() {
        let utf8 = TextEncoding::Utf8;
        assert!(is_textable(&FieldValue::from("unicode é"), false, utf8));
        assert!(is_textable(&FieldValue::from(&b"unicodable bytes"[..]), false, utf8));
        assert!(is_textable(&FieldValue::from(42), false, utf8));
        assert!(is_textable(&FieldValue::None, true, utf8));
        assert!(!is_textable(&FieldValue::None, false, utf8));
        assert!(!is_textable(&FieldValue::from(&b"\xff not unicodable"[..]), true, utf8));
    }

    #[test]
    fn test_is_textable_ascii_encoding() {
        let ascii = TextEncoding::Ascii;
        assert!(is_textable(&FieldValue::from("plain"), false, ascii));
        assert!(!is_textable(&FieldValue::from("unicode é"), false, ascii));
        assert!(!is_textable(&FieldValue::from("é".as_bytes()), false, ascii));
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url(&FieldValue::from("http://localhost/image.jpg"), false));
        assert!(is_absolute_url(&FieldValue::from("//localhost/x"), false));
        assert!(is_absolute_url(&FieldValue::from(&b"http://localhost/x"[..]), false));
        assert!(is_absolute_url(&FieldValue::None, true));
        assert!(!is_absolute_url(&FieldValue::None, false));
        assert!(!is_absolute_url(&FieldValue::from("not_absolute_url"), false));
        assert!(!is_absolute_url(&FieldValue::from("http://olé/x"), false));
        assert!(!is_absolute_url(&FieldValue::from(&b"http://host/\x81/x"[..]), false));
        assert!(!is_absolute_url(&FieldValue::from("mailto:someone@example.com"), false));
        assert!(!is_absolute_url(&FieldValue::from(12), false));
    }

    #[test]
    fn test_is_scalar() {
        assert!(is_scalar(&FieldValue::from(0), false));
        assert!(is_scalar(&FieldValue::from(-1.5), false));
        assert!(is_scalar(&FieldValue::from(" 2.5e3 "), false));
        assert!(is_scalar(&FieldValue::None, true));

        for bad in [
            FieldValue::from(f64::NAN),
            FieldValue::from(f64::INFINITY),
            FieldValue::from(f64::NEG_INFINITY),
            FieldValue::from("not numeric"),
            FieldValue::from("inf"),
            FieldValue::None,
        ] {
            assert!(!is_scalar(&bad, false), "{bad:?} should not be scalar");
        }
    }

    #[test]
    fn test_is_bool_is_strict() {
        assert!(is_bool(&FieldValue::from(true)));
        assert!(is_bool(&FieldValue::from(false)));
        assert!(!is_bool(&FieldValue::from(1)));
        assert!(!is_bool(&FieldValue::from("t")));
        assert!(!is_bool(&FieldValue::None));
    }

    #[test]
    fn test_check_fields_reports_first_failure() {
        let specs = [
            FieldSpec::required("name", FieldKind::Text),
            FieldSpec::required("dec_deg", FieldKind::Scalar)
                .with_constraint(Constraint::Range { min: -90.0, max: 90.0 }),
            FieldSpec::required("scale", FieldKind::Scalar).with_constraint(Constraint::NonZero),
        ];

        let name = FieldValue::None;
        let dec = FieldValue::from(91);
        let scale = FieldValue::from(0);
        let reason = check_fields(&specs, &[&name, &dec, &scale], TextEncoding::Utf8);
        assert_eq!(reason.as_deref(), Some("\"name\" must be a string"));

        let name = FieldValue::from("ok");
        let reason = check_fields(&specs, &[&name, &dec, &scale], TextEncoding::Utf8);
        assert_eq!(reason.as_deref(), Some("\"dec_deg\" must be between -90 and 90"));

        let dec = FieldValue::from(-90);
        let reason = check_fields(&specs, &[&name, &dec, &scale], TextEncoding::Utf8);
        assert_eq!(reason.as_deref(), Some("\"scale\" cannot be zero"));

        let scale = FieldValue::from(-1.0);
        assert_eq!(check_fields(&specs, &[&name, &dec, &scale], TextEncoding::Utf8), None);
    }

    #[test]
    fn test_format_exponential() {
        assert_eq!(format_exponential(0.0), "0.000000000000000000e+00");
        assert_eq!(format_exponential(180.0), "1.800000000000000000e+02");
        assert_eq!(format_exponential(-1.0), "-1.000000000000000000e+00");
        assert_eq!(format_exponential(0.5), "5.000000000000000000e-01");
        assert_eq!(format_exponential(1024.0), "1.024000000000000000e+03");
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(980.0), 260.0);
        assert_eq!(wrap_degrees(-720.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
    }

    #[test]
    fn test_encode_wire_text() {
        assert_eq!(encode_wire_text("<b>\"x\"</b>", false), "&lt;b&gt;\"x\"&lt;/b&gt;");
        assert_eq!(encode_wire_text("<b>\"x\"</b>", true), "&lt;b&gt;&quot;x&quot;&lt;/b&gt;");
        assert_eq!(encode_wire_text("unicode é", false), "unicode &#233;");
    }
}
