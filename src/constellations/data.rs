//
//  wwt-api-client
//  constellations/data.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Records exchanged with the Constellations APIs.
//!
//! The backend's convention is that absent values are left out entirely
//! rather than sent as `null`, so every optional field is skipped when
//! serializing.

use serde::{Deserialize, Serialize};

/// A handle's public identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleInfo {
    pub handle: String,
    pub display_name: String,
}

/// What the current user may do with a handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlePermissions {
    pub handle: String,
    pub view_dashboard: bool,
}

/// Changes to apply to a handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleImageStats {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleSceneStats {
    pub count: u64,
    pub impressions: u64,
    pub likes: u64,
}

/// Usage statistics for a handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleStats {
    pub handle: String,
    pub images: HandleImageStats,
    pub scenes: HandleSceneStats,
}

/// The WWT data parameters of a Constellations image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageWwt {
    pub base_degrees_per_tile: f64,
    pub bottoms_up: bool,
    pub center_x: f64,
    pub center_y: f64,
    pub file_type: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub projection: String,
    pub quad_tree_map: String,
    pub rotation: f64,
    pub tile_levels: u32,
    pub width_factor: i64,
    pub thumbnail_url: String,
}

/// Where an image's data is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageStorage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_url_template: Option<String>,
}

/// Summary information about an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// 24 hex digits.
    #[serde(rename = "_id")]
    pub id: String,
    /// 24 hex digits.
    pub handle_id: String,
    /// ISO 8601, e.g. `2023-03-28T16:53:18.364Z`.
    pub creation_date: String,
    pub note: String,
    pub storage: ImageStorage,
}

/// Copyright and licensing of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePermissions {
    pub copyright: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<String>,
    /// An SPDX license expression.
    pub license: String,
}

/// Everything needed to display an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDisplayInfo {
    pub wwt: ImageWwt,
    pub storage: ImageStorage,
}

/// Where a scene points the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePlace {
    pub ra_rad: f64,
    pub dec_rad: f64,
    pub roll_rad: f64,
    pub roi_height_deg: f64,
    pub roi_aspect_ratio: f64,
}

/// An image layer of a scene, by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneImageLayer {
    pub image_id: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_layers: Option<Vec<SceneImageLayer>>,
}

/// An image layer of a scene, with the image's display information inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneImageLayerHydrated {
    pub image: ImageDisplayInfo,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneContentHydrated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ImageDisplayInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_layers: Option<Vec<SceneImageLayerHydrated>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenePreviews {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A scene with its handle and images inlined, as listed on timelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneHydrated {
    pub id: String,
    pub handle_id: String,
    pub handle: HandleInfo,
    pub creation_date: String,
    pub likes: u64,
    pub place: ScenePlace,
    pub content: SceneContentHydrated,
    pub text: String,
    #[serde(default)]
    pub previews: ScenePreviews,
}

/// Engagement information about a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub creation_date: String,
    pub impressions: u64,
    pub likes: u64,
}

/// What the current user may do with a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePermissions {
    pub id: String,
    pub edit: bool,
}

/// Changes to apply to a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<ScenePlace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_omit_unset_fields() {
        let update = SceneUpdate {
            text: Some("hello".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"text": "hello"}));

        assert_eq!(
            serde_json::to_value(HandleUpdate::default()).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn test_image_summary_uses_underscore_id() {
        let summary: ImageSummary = serde_json::from_value(serde_json::json!({
            "_id": "64236c5c7f7dfd5dbb1e5a12",
            "handle_id": "64236c5c7f7dfd5dbb1e5a00",
            "creation_date": "2023-03-28T16:53:18.364Z",
            "note": "M31",
            "storage": {"legacy_url_template": "http://example.org/{1}/{3}/{3}_{2}.png"}
        }))
        .unwrap();

        assert_eq!(summary.id, "64236c5c7f7dfd5dbb1e5a12");
        assert!(summary.storage.legacy_url_template.is_some());
    }

    #[test]
    fn test_hydrated_content_tolerates_missing_layers() {
        let content: SceneContentHydrated = serde_json::from_str("{}").unwrap();
        assert_eq!(content, SceneContentHydrated::default());
    }
}
