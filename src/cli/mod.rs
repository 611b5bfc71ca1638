//
//  wwt-api-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod communities;
mod show_image;

pub use communities::CommunitiesLoginCommand;
pub use show_image::ShowImageCommand;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::client::Client;
use crate::config::Config;

/// Command-line access to the WorldWide Telescope web APIs
#[derive(Parser, Debug)]
#[command(
    name = "wwt",
    version,
    about = "Work with the WorldWide Telescope web APIs from the command line",
    propagate_version = true,
    after_help = "Use 'wwt <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Base URL of the WWT web services
    #[arg(long, global = true, env = "WWT_API_BASE")]
    pub api_base: Option<String>,

    /// Path to a configuration file to use instead of the default one
    #[arg(long, global = true, env = "WWT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Loads the configuration file, if any.
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Ok(config)
    }

    /// A session for the selected base URL.
    pub fn client(&self, config: &Config) -> Client {
        match &self.api_base {
            Some(base) => Client::with_base(base.clone()),
            None => config.client(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to WWT Communities and save the credentials
    #[command(name = "communities-login")]
    CommunitiesLogin(CommunitiesLoginCommand),

    /// Build a WTML folder around a single sky image
    #[command(name = "show-image")]
    ShowImage(ShowImageCommand),

    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_api_base_overrides_config() {
        let cli = Cli::try_parse_from([
            "wwt",
            "--api-base",
            "http://localhost:7000",
            "version",
        ])
        .unwrap();

        let client = cli.global.client(&Config::default());
        assert_eq!(client.base_url(), "http://localhost:7000");
    }
}
