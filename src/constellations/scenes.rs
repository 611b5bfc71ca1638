//
//  wwt-api-client
//  constellations/scenes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Calls about one scene, an individual "post" showing one or more images.

use serde::{Deserialize, Serialize};

use crate::api::common::{Error, Result};
use crate::api::endpoint::{catalog, encode_path_segment};
use crate::constellations::data::{HandleInfo, ScenePlace, SceneUpdate};
use crate::constellations::{Acknowledgement, CxClient};

/// A scene as returned by `GET /scene/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetSceneResponse {
    /// The scene ID.
    pub id: String,
    /// The ID of the owning handle.
    pub handle_id: String,
    /// The owning handle's names.
    pub handle: HandleInfo,
    /// When the scene was created, as sent by the server.
    pub creation_date: String,
    /// The number of likes.
    pub likes: u64,
    /// Where the scene looks.
    pub place: ScenePlace,
    /// The scene's caption.
    pub text: String,
}

/// A client for calls about one scene.
#[derive(Debug, Clone)]
pub struct SceneClient<'a> {
    client: &'a CxClient,
    id: String,
}

impl<'a> SceneClient<'a> {
    pub(crate) fn new(client: &'a CxClient, id: &str) -> Self {
        Self {
            client,
            id: encode_path_segment(id),
        }
    }

    /// Gets information about this scene.
    pub fn get(&self) -> Result<GetSceneResponse> {
        let request = self
            .client
            .request(&catalog::CX_SCENE_GET, &[("id", &self.id)])?;
        self.client.call(&request)
    }

    /// Updates this scene. Unset fields are left unchanged.
    pub fn update(&self, update: &SceneUpdate) -> Result<()> {
        let body = serde_json::to_value(update).map_err(|e| Error::Decode(e.into()))?;
        let request = self
            .client
            .request(&catalog::CX_SCENE_UPDATE, &[("id", &self.id)])?
            .json(body);
        let _: Acknowledgement = self.client.call(&request)?;
        Ok(())
    }
}
