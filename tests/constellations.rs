//
//  wwt-api-client
//  tests/constellations.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use chrono::{Duration, Utc};
use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

use wwt_api_client::auth::{OAuthState, StateStore};
use wwt_api_client::constellations::data::{HandleUpdate, SceneUpdate};
use wwt_api_client::constellations::{ClientConfig, CxClient, OidcClient};
use wwt_api_client::Error;

const TOKEN_PATH: &str = "/realms/constellations/protocol/openid-connect/token";

fn config(server: &ServerGuard) -> ClientConfig {
    ClientConfig {
        id_provider_url: format!("{}/realms/constellations", server.url()),
        client_id: "cli-tool".to_string(),
        api_url: server.url(),
    }
}

/// A client whose token cache already holds `state`; interactive login is
/// disabled.
fn seeded_client(server: &ServerGuard, dir: &TempDir, state: &OAuthState) -> CxClient {
    let config = config(server);
    let store = StateStore::new(dir.path());
    let oidc = OidcClient::new(&config, store.clone()).interactive(false);
    store.write_json(&oidc.cache_basename(), state).unwrap();
    CxClient::with_oidc(config, oidc)
}

fn expired(access: &str, refresh: &str) -> OAuthState {
    let mut state = OAuthState::new(access, refresh);
    state.expires_at = Some(Utc::now() - Duration::hours(1));
    state
}

#[test]
fn expired_token_is_refreshed_once_and_sent_as_bearer() {
    let mut server = Server::new();
    let refresh = server
        .mock("POST", TOKEN_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "old-refresh".into()),
            Matcher::UrlEncoded("client_id".into(), "cli-tool".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"fresh","refresh_token":"new-refresh","expires_in":300}"#)
        .expect(1)
        .create();
    let handle = server
        .mock("GET", "/handle/nasa")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(r#"{"error":false,"handle":"nasa","display_name":"NASA"}"#)
        .expect(2)
        .create();

    let dir = TempDir::new().unwrap();
    let cx = seeded_client(&server, &dir, &expired("old", "old-refresh"));

    let info = cx.handle_client("nasa").get().unwrap();
    assert_eq!(info.display_name, "NASA");
    cx.handle_client("nasa").get().unwrap();

    refresh.assert();
    handle.assert();

    let cached: OAuthState = StateStore::new(dir.path())
        .read_json(&cx.oidc().cache_basename())
        .unwrap()
        .unwrap();
    assert_eq!(cached.access_token, "fresh");
    assert_eq!(cached.refresh_token.as_deref(), Some("new-refresh"));
}

#[test]
fn revoked_refresh_token_is_forgotten() {
    let mut server = Server::new();
    let _refresh = server
        .mock("POST", TOKEN_PATH)
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Token is not active"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let cx = seeded_client(&server, &dir, &expired("old", "old-refresh"));

    let err = cx.handle_client("nasa").get().unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));
    assert!(!dir.path().join(cx.oidc().cache_basename()).exists());
}

#[test]
fn error_envelope_is_an_api_error() {
    let mut server = Server::new();
    let _update = server
        .mock("PATCH", "/handle/nasa")
        .match_body(Matcher::Json(serde_json::json!({"display_name": "NASA!"})))
        .with_status(200)
        .with_body(r#"{"error":true,"message":"not allowed"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let cx = seeded_client(&server, &dir, &OAuthState::new("valid", "r"));

    let update = HandleUpdate {
        display_name: Some("NASA!".to_string()),
    };
    match cx.handle_client("nasa").update(&update).unwrap_err() {
        Error::ApiResponse { body, .. } => assert!(body.contains("not allowed")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn error_status_keeps_the_json_body_verbatim() {
    let body = r#"{"error":true,"message":"forbidden: not the handle owner"}"#;
    let mut server = Server::new();
    let _update = server
        .mock("PATCH", "/handle/nasa")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create();

    let dir = TempDir::new().unwrap();
    let cx = seeded_client(&server, &dir, &OAuthState::new("valid", "r"));

    let update = HandleUpdate {
        display_name: Some("NASA!".to_string()),
    };
    match cx.handle_client("nasa").update(&update).unwrap_err() {
        Error::ApiResponse { status, body: found } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(found, body);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn home_timeline_sends_the_page_number() {
    let mut server = Server::new();
    let timeline = server
        .mock("GET", "/scenes/home-timeline")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .match_header("authorization", "Bearer valid")
        .with_status(200)
        .with_body(r#"{"error":false,"results":[]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let cx = seeded_client(&server, &dir, &OAuthState::new("valid", "r"));

    assert!(cx.get_home_timeline(2).unwrap().is_empty());
    timeline.assert();

    assert!(matches!(
        cx.get_home_timeline(-1),
        Err(Error::InvalidRequest(_))
    ));
}

#[test]
fn imageset_folder_is_fetched_without_a_token() {
    let mut server = Server::new();
    let wtml = server
        .mock("GET", "/image/64236c5c7f7dfd5dbb1e5a12/img.wtml")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(
            r#"<Folder Name="img"><ImageSet Name="Pillars" DataSetType="Sky"/></Folder>"#,
        )
        .create();

    let dir = TempDir::new().unwrap();
    let config = config(&server);
    let oidc = OidcClient::new(&config, StateStore::new(dir.path())).interactive(false);
    let cx = CxClient::with_oidc(config, oidc);

    let imageset = cx
        .image_client("64236c5c7f7dfd5dbb1e5a12")
        .imageset_object()
        .unwrap()
        .unwrap();

    wtml.assert();
    assert_eq!(imageset.name, "ImageSet");
    assert_eq!(imageset.attr("Name"), Some("Pillars"));
}

#[test]
fn scene_update_sends_only_set_fields() {
    let mut server = Server::new();
    let update = server
        .mock("PATCH", "/scene/64236c5c7f7dfd5dbb1e5a13")
        .match_header("authorization", "Bearer valid")
        .match_body(Matcher::Json(serde_json::json!({"text": "Pillars of Creation"})))
        .with_status(200)
        .with_body(r#"{"error":false,"id":"64236c5c7f7dfd5dbb1e5a13"}"#)
        .expect(1)
        .create();

    let dir = TempDir::new().unwrap();
    let cx = seeded_client(&server, &dir, &OAuthState::new("valid", "r"));

    let changes = SceneUpdate {
        text: Some("Pillars of Creation".to_string()),
        ..Default::default()
    };
    cx.scene_client("64236c5c7f7dfd5dbb1e5a13")
        .update(&changes)
        .unwrap();

    update.assert();
}
