//
//  wwt-api-client
//  cli/show_image.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The `show-image` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::api::request::ApiRequest;

use super::GlobalOptions;

/// Build a WTML folder around a single sky image and print it.
#[derive(Args, Debug)]
pub struct ShowImageCommand {
    /// Display name of the image
    #[arg(long)]
    pub name: String,

    /// Absolute URL of the image
    #[arg(long)]
    pub image_url: String,

    /// Right ascension of the image center, in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub ra: Option<f64>,

    /// Declination of the image center, in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub dec: Option<f64>,

    /// Angular size of a pixel, in arcseconds
    #[arg(long, allow_hyphen_values = true)]
    pub scale: Option<f64>,

    /// Rotation of the image, in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub rotation: Option<f64>,

    /// Horizontal offset of the image center, in pixels
    #[arg(long, allow_hyphen_values = true)]
    pub x: Option<f64>,

    /// Vertical offset of the image center, in pixels
    #[arg(long, allow_hyphen_values = true)]
    pub y: Option<f64>,

    /// The image has reversed parity
    #[arg(long)]
    pub reverse_parity: bool,

    /// URL of a thumbnail
    #[arg(long)]
    pub thumbnail_url: Option<String>,

    /// Credits text
    #[arg(long)]
    pub credits: Option<String>,

    /// URL with more information about the image
    #[arg(long)]
    pub credits_url: Option<String>,
}

impl ShowImageCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let client = global.client(&config);

        let mut req = client.show_image(self.image_url.as_str(), self.name.as_str());
        if let Some(ra) = self.ra {
            req.ra_deg = ra.into();
        }
        if let Some(dec) = self.dec {
            req.dec_deg = dec.into();
        }
        if let Some(scale) = self.scale {
            req.scale = scale.into();
        }
        if let Some(rotation) = self.rotation {
            req.rotation_deg = rotation.into();
        }
        if let Some(x) = self.x {
            req.x_offset_pixels = x.into();
        }
        if let Some(y) = self.y {
            req.y_offset_pixels = y.into();
        }
        req.reverse_parity = self.reverse_parity.into();
        req.thumbnail_url = self.thumbnail_url.clone().into();
        req.credits = self.credits.clone().into();
        req.credits_url = self.credits_url.clone().into();

        let response = req.send_raw().context("ShowImage request failed")?;
        print!("{}", response.text()?);
        Ok(())
    }
}
