//
//  wwt-api-client
//  constellations/images.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Calls about one image.

use crate::api::common::Result;
use crate::api::endpoint::{catalog, encode_path_segment};
use crate::api::request::check_status;
use crate::api::response::{parse_xml, XmlElement};
use crate::constellations::CxClient;

/// A client for calls about one image.
#[derive(Debug, Clone)]
pub struct ImageClient<'a> {
    client: &'a CxClient,
    id: String,
}

impl<'a> ImageClient<'a> {
    pub(crate) fn new(client: &'a CxClient, id: &str) -> Self {
        Self {
            client,
            id: encode_path_segment(id),
        }
    }

    /// The URL of a WTML folder holding this image as an imageset.
    pub fn imageset_wtml_url(&self) -> Result<String> {
        let url = catalog::CX_IMAGE_WTML.url(&self.client.config().api_url, &[("id", &self.id)])?;
        Ok(url.to_string())
    }

    /// Fetches the WTML folder holding this image as an imageset.
    ///
    /// The folder is public, so no token is sent.
    pub fn imageset_folder(&self) -> Result<XmlElement> {
        let request = self
            .client
            .request(&catalog::CX_IMAGE_WTML, &[("id", &self.id)])?;
        let response = check_status(self.client.session().dispatch(&request)?)?;
        Ok(parse_xml(&response.text()?)?)
    }

    /// Fetches the imageset itself: the first child of
    /// [`imageset_folder`](Self::imageset_folder).
    pub fn imageset_object(&self) -> Result<Option<XmlElement>> {
        Ok(self.imageset_folder()?.children.into_iter().next())
    }
}
