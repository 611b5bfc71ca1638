//
//  wwt-api-client
//  tests/show_image.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use mockito::{Matcher, Server};
use reqwest::StatusCode;
use tracing_test::traced_test;

use wwt_api_client::api::response::XmlElement;
use wwt_api_client::api::validate::FieldValue;
use wwt_api_client::api::wwt::ShowImageRequest;
use wwt_api_client::{ApiRequest, Client, Error};

const IMAGE_URL: &str = "http://example.com/space.jpg";

const WTML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Folder Name="M1" Group="Goto">
  <Place Name="M1" RA="5.575" Dec="22.014" ZoomLevel="0.5" DataSetType="Sky">
    <ForegroundImageSet>
      <ImageSet Name="M1" Url="http://example.com/space.jpg" DataSetType="Sky">
        <Credits>Hubble &amp; friends</Credits>
        <CreditsUrl>http://example.com/credits</CreditsUrl>
        <ThumbnailUrl>http://example.com/thumb.jpg</ThumbnailUrl>
      </ImageSet>
    </ForegroundImageSet>
  </Place>
</Folder>
"#;

#[test]
fn show_image_returns_the_wtml_folder() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/WWTWeb/ShowImage.aspx")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "M1".into()),
            Matcher::UrlEncoded("imageurl".into(), IMAGE_URL.into()),
            Matcher::UrlEncoded("dec".into(), "2.250000000000000000e+01".into()),
            Matcher::UrlEncoded("credits".into(), "Hubble &amp; friends".into()),
            Matcher::UrlEncoded("creditsUrl".into(), "http://example.com/credits".into()),
            Matcher::UrlEncoded("wtml".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml")
        .with_body(WTML)
        .create();

    let client = Client::with_base(server.url());
    let mut req = client.show_image(IMAGE_URL, "M1");
    req.ra_deg = 83.625.into();
    req.dec_deg = 22.5.into();
    req.credits = "Hubble & friends".into();
    req.credits_url = "http://example.com/credits".into();

    let folder = req.send().unwrap();

    mock.assert();
    assert_eq!(folder.name, "Folder");
    assert_eq!(folder.attr("Name"), Some("M1"));
    assert_eq!(folder.find("Credits").unwrap().text(), "Hubble & friends");
    assert_eq!(
        folder.find("CreditsUrl").unwrap().text(),
        "http://example.com/credits"
    );
    assert_eq!(
        folder.find("ImageSet").unwrap().attr("Url"),
        Some(IMAGE_URL)
    );
}

/// The folder the service returns for a request with default settings.
const BASIC_RESULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Folder Name="Objéct" Group="Goto">
 <Place Name="Objéct" RA="0" Dec="0" ZoomLevel="0" DataSetType="Sky" Opacity="100"
        Thumbnail="" Constellation="">
  <ForegroundImageSet>
   <ImageSet DataSetType="Sky" BandPass="Visible" Url="http://localhost/image.jpg"
             TileLevels="0" WidthFactor="2" Rotation="0" Projection="SkyImage"
             FileType=".tif" CenterY="0" CenterX="0" BottomsUp="False" OffsetX="0"
             OffsetY="0" BaseTileLevel="0" BaseDegreesPerTile="0.000277777777777778">
    <Credits></Credits>
    <CreditsUrl></CreditsUrl>
   </ImageSet>
  </ForegroundImageSet>
 </Place>
</Folder>
"#;

fn element(name: &str, attributes: &[(&str, &str)], children: Vec<XmlElement>) -> XmlElement {
    XmlElement {
        name: name.to_string(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        text: None,
        children,
    }
}

/// Tags and attributes must match exactly; text only matters where the
/// service fills it in.
fn assert_same_tree(expected: &XmlElement, found: &XmlElement) {
    assert_eq!(expected.name, found.name);
    assert_eq!(expected.attributes, found.attributes, "attributes of <{}>", found.name);
    if matches!(found.name.as_str(), "Credits" | "CreditsUrl") {
        assert_eq!(expected.text(), found.text(), "text of <{}>", found.name);
    }
    assert_eq!(
        expected.children.len(),
        found.children.len(),
        "children of <{}>",
        found.name
    );
    for (e, f) in expected.children.iter().zip(&found.children) {
        assert_same_tree(e, f);
    }
}

#[test]
fn default_request_returns_the_basic_folder() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/WWTWeb/ShowImage.aspx")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "name".into()),
            Matcher::UrlEncoded("imageurl".into(), "http://localhost/image.jpg".into()),
            Matcher::UrlEncoded("ra".into(), "0.000000000000000000e+00".into()),
            Matcher::UrlEncoded("dec".into(), "0.000000000000000000e+00".into()),
            Matcher::UrlEncoded("scale".into(), "1.000000000000000000e+00".into()),
            Matcher::UrlEncoded("rotation".into(), "1.800000000000000000e+02".into()),
            Matcher::UrlEncoded("wtml".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/xml; charset=utf-8")
        .with_body(BASIC_RESULT)
        .create();

    let client = Client::with_base(server.url());
    let found = client
        .show_image("http://localhost/image.jpg", "name")
        .send()
        .unwrap();
    mock.assert();

    let expected = element(
        "Folder",
        &[("Name", "Objéct"), ("Group", "Goto")],
        vec![element(
            "Place",
            &[
                ("Name", "Objéct"),
                ("RA", "0"),
                ("Dec", "0"),
                ("ZoomLevel", "0"),
                ("DataSetType", "Sky"),
                ("Opacity", "100"),
                ("Thumbnail", ""),
                ("Constellation", ""),
            ],
            vec![element(
                "ForegroundImageSet",
                &[],
                vec![element(
                    "ImageSet",
                    &[
                        ("DataSetType", "Sky"),
                        ("BandPass", "Visible"),
                        ("Url", "http://localhost/image.jpg"),
                        ("TileLevels", "0"),
                        ("WidthFactor", "2"),
                        ("Rotation", "0"),
                        ("Projection", "SkyImage"),
                        ("FileType", ".tif"),
                        ("CenterY", "0"),
                        ("CenterX", "0"),
                        ("BottomsUp", "False"),
                        ("OffsetX", "0"),
                        ("OffsetY", "0"),
                        ("BaseTileLevel", "0"),
                        ("BaseDegreesPerTile", "0.000277777777777778"),
                    ],
                    vec![
                        element("Credits", &[], Vec::new()),
                        element("CreditsUrl", &[], Vec::new()),
                    ],
                )],
            )],
        )],
    );

    assert_same_tree(&expected, &found);
}

#[test]
#[traced_test]
fn comma_in_name_is_logged_and_sent() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/WWTWeb/ShowImage.aspx")
        .match_query(Matcher::UrlEncoded(
            "name".into(),
            "M31, Andromeda".into(),
        ))
        .with_status(200)
        .with_body("<Folder Name=\"M31 Andromeda\"/>")
        .create();

    let client = Client::with_base(server.url());
    let req = client.show_image(IMAGE_URL, "M31, Andromeda");

    assert_eq!(req.invalidity_reason(), None);
    assert!(logs_contain("M31, Andromeda"));
    assert!(logs_contain("commas"));

    let folder = req.send().unwrap();
    mock.assert();
    assert_eq!(folder.attr("Name"), Some("M31 Andromeda"));
}

#[test]
fn error_status_keeps_the_body() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/WWTWeb/ShowImage.aspx")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Server Error: image not reachable")
        .create();

    let client = Client::with_base(server.url());
    let err = client.show_image(IMAGE_URL, "M1").send().unwrap_err();

    match err {
        Error::ApiResponse { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "Server Error: image not reachable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn error_status_keeps_a_structured_body_verbatim() {
    let bodies = [
        (404u16, "application/json", r#"{"error":true,"message":"no such image"}"#),
        (
            400,
            "text/xml",
            "<?xml version=\"1.0\"?>\n<Error Code=\"400\">  bad \"imageurl\"  </Error>\n",
        ),
    ];

    for (code, content_type, text) in bodies {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/WWTWeb/ShowImage.aspx")
            .match_query(Matcher::Any)
            .with_status(usize::from(code))
            .with_header("content-type", content_type)
            .with_body(text)
            .create();

        let client = Client::with_base(server.url());
        match client.show_image(IMAGE_URL, "M1").send().unwrap_err() {
            Error::ApiResponse { status, body } => {
                assert_eq!(status.as_u16(), code);
                assert_eq!(body, text);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

fn query_values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

#[test]
fn optional_parameters_survive_the_encoded_url() {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "Objéct & co");
    req.thumbnail_url = "http://example.com/thumb.jpg?size=small&fmt=png".into();
    req.credits = "A & é".into();
    req.credits_url = "http://example.com/credits?a=1&b=2".into();
    req.reverse_parity = true.into();

    let url = req.make_request().unwrap().full_url();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    assert_eq!(query_values(&pairs, "name"), ["Obj&#233;ct &amp; co"]);
    assert_eq!(
        query_values(&pairs, "thumb"),
        ["http://example.com/thumb.jpg?size=small&fmt=png"]
    );
    assert_eq!(query_values(&pairs, "credits"), ["A &amp; &#233;"]);
    assert_eq!(
        query_values(&pairs, "creditsUrl"),
        ["http://example.com/credits?a=1&b=2"]
    );
    assert_eq!(query_values(&pairs, "reverseparity"), ["true"]);
    assert_eq!(query_values(&pairs, "imageurl"), [IMAGE_URL]);
}

#[test]
fn unset_optional_parameters_are_absent_from_the_url() {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "M1");
    req.reverse_parity = false.into();

    let url = req.make_request().unwrap().full_url();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    for key in ["thumb", "credits", "creditsUrl", "reverseparity"] {
        assert!(query_values(&pairs, key).is_empty(), "{key} should be absent");
    }
    for (key, value) in &pairs {
        assert!(!value.is_empty(), "{key} was sent empty");
    }
}

#[test]
fn invalid_request_sends_nothing() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    let client = Client::with_base(server.url());
    let mut req = client.show_image(IMAGE_URL, "M1");
    req.scale = 0.0.into();

    let err = req.send().unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(ref reason) if reason == "\"scale\" cannot be zero"));
    mock.assert();
}

fn reason_after(mutate: impl FnOnce(&mut ShowImageRequest<'_>)) -> Option<String> {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "M1");
    mutate(&mut req);
    req.invalidity_reason()
}

#[test]
fn field_type_checks() {
    let cases = [
        (
            reason_after(|r| r.credits_url = "relative/path".into()),
            "\"credits_url\" must be None or an absolute URL",
        ),
        (
            reason_after(|r| r.dec_deg = "north".into()),
            "\"dec_deg\" must be a finite number",
        ),
        (
            reason_after(|r| r.dec_deg = f64::NAN.into()),
            "\"dec_deg\" must be a finite number",
        ),
        (
            reason_after(|r| r.image_url = "space.jpg".into()),
            "\"image_url\" must be an absolute URL",
        ),
        (
            reason_after(|r| r.image_url = FieldValue::None),
            "\"image_url\" must be an absolute URL",
        ),
        (
            reason_after(|r| r.name = FieldValue::None),
            "\"name\" must be a string",
        ),
        (
            reason_after(|r| r.ra_deg = f64::INFINITY.into()),
            "\"ra_deg\" must be a finite number",
        ),
        (
            reason_after(|r| r.reverse_parity = 1.into()),
            "\"reverse_parity\" must be a bool",
        ),
        (
            reason_after(|r| r.reverse_parity = "t".into()),
            "\"reverse_parity\" must be a bool",
        ),
        (
            reason_after(|r| r.rotation_deg = FieldValue::None),
            "\"rotation_deg\" must be a finite number",
        ),
        (
            reason_after(|r| r.scale = f64::NEG_INFINITY.into()),
            "\"scale\" must be a finite number",
        ),
        (
            reason_after(|r| r.thumbnail_url = "thumb.jpg".into()),
            "\"thumbnail_url\" must be None or an absolute URL",
        ),
        (
            reason_after(|r| r.x_offset_pixels = "left".into()),
            "\"x_offset_pixels\" must be a finite number",
        ),
        (
            reason_after(|r| r.y_offset_pixels = FieldValue::None),
            "\"y_offset_pixels\" must be a finite number",
        ),
    ];

    for (reason, expected) in cases {
        assert_eq!(reason.as_deref(), Some(expected));
    }
}

#[test]
fn earlier_fields_are_reported_first() {
    let reason = reason_after(|r| {
        r.y_offset_pixels = FieldValue::None;
        r.dec_deg = 100.0.into();
    });
    assert_eq!(reason.as_deref(), Some("\"dec_deg\" must be between -90 and 90"));
}

#[test]
fn declination_boundaries() {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "M1");

    for dec in [-90.0, -45.5, 0.0, 90.0] {
        req.dec_deg = dec.into();
        assert_eq!(req.invalidity_reason(), None, "dec {dec}");
    }

    for dec in [-90.000001, 90.000001, 180.0] {
        req.dec_deg = dec.into();
        assert_eq!(
            req.invalidity_reason().as_deref(),
            Some("\"dec_deg\" must be between -90 and 90"),
            "dec {dec}"
        );
    }
}

#[test]
fn numeric_text_is_accepted_as_a_scalar() {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "M1");
    req.scale = " 0.5 ".into();
    req.x_offset_pixels = 12.into();

    assert_eq!(req.invalidity_reason(), None);

    let built = req.make_request().unwrap();
    assert_eq!(built.query_value("scale"), Some("5.000000000000000000e-01"));
    assert_eq!(built.query_value("x"), Some("1.200000000000000000e+01"));
}

#[test]
fn optional_parameters_can_be_cleared_again() {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "M1");
    let plain = req.make_request().unwrap();

    req.thumbnail_url = "http://example.com/thumb.jpg".into();
    req.credits = "credit".into();
    assert_ne!(req.make_request().unwrap(), plain);

    req.thumbnail_url = FieldValue::None;
    req.credits = None::<String>.into();
    assert_eq!(req.make_request().unwrap(), plain);
}

#[test]
fn building_is_idempotent() {
    let client = Client::new();
    let mut req = client.show_image(IMAGE_URL, "Crab Nebula");
    req.ra_deg = (-10.0).into();
    req.rotation_deg = 45.0.into();

    let first = req.make_request().unwrap();
    let second = req.make_request().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.query_value("ra"), Some("3.500000000000000000e+02"));
    assert_eq!(first.query_value("rotation"), Some("2.250000000000000000e+02"));
}
