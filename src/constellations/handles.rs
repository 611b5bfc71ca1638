//
//  wwt-api-client
//  constellations/handles.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Calls about one handle, a publicly visible "user" or "channel" name.

use serde::{Deserialize, Serialize};

use crate::api::common::{Error, Result};
use crate::api::endpoint::{catalog, encode_path_segment};
use crate::constellations::data::{HandleInfo, HandleUpdate, SceneContent};
use crate::constellations::{Acknowledgement, CxClient};

/// Where a new scene points the view.
///
/// New scenes are placed by zoom rather than by region of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddScenePlace {
    /// Right ascension of the view center, in radians.
    pub ra_rad: f64,
    /// Declination of the view center, in radians.
    pub dec_rad: f64,
    /// Height of the view, in degrees.
    pub zoom_deg: f64,
    /// Roll of the view, in radians.
    pub roll_rad: f64,
}

/// A new scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSceneRequest {
    /// Where the scene looks.
    pub place: AddScenePlace,
    /// The image layers shown.
    pub content: SceneContent,
    /// A link shown alongside the scene. Optional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_url: Option<String>,
    /// The scene's caption.
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct AddSceneResponse {
    id: String,
}

/// A client for calls about one handle.
#[derive(Debug, Clone)]
pub struct HandleClient<'a> {
    client: &'a CxClient,
    handle: String,
}

impl<'a> HandleClient<'a> {
    pub(crate) fn new(client: &'a CxClient, handle: &str) -> Self {
        Self {
            client,
            handle: encode_path_segment(handle),
        }
    }

    /// The handle, as encoded into URL paths.
    pub fn encoded_handle(&self) -> &str {
        &self.handle
    }

    /// Gets the handle's public information.
    pub fn get(&self) -> Result<HandleInfo> {
        let request = self
            .client
            .request(&catalog::CX_HANDLE_GET, &[("handle", &self.handle)])?;
        self.client.call(&request)
    }

    /// Updates the handle's information. Unset fields are left unchanged.
    pub fn update(&self, update: &HandleUpdate) -> Result<()> {
        let body = serde_json::to_value(update).map_err(|e| Error::Decode(e.into()))?;
        let request = self
            .client
            .request(&catalog::CX_HANDLE_UPDATE, &[("handle", &self.handle)])?
            .json(body);
        let _: Acknowledgement = self.client.call(&request)?;
        Ok(())
    }

    /// Adds a new scene owned by this handle and returns its ID.
    pub fn add_scene(&self, scene: &AddSceneRequest) -> Result<String> {
        let body = serde_json::to_value(scene).map_err(|e| Error::Decode(e.into()))?;
        let request = self
            .client
            .request(&catalog::CX_HANDLE_ADD_SCENE, &[("handle", &self.handle)])?
            .json(body);
        let response: AddSceneResponse = self.client.call(&request)?;
        Ok(response.id)
    }
}
