//
//  wwt-api-client
//  cli/communities.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The `communities-login` command.
//!
//! Runs the interactive Microsoft Live login once, so that later programs can
//! construct a Communities client from the saved state without interaction.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::communities::CommunitiesClient;
use crate::interactive::TerminalLoginPrompt;

use super::GlobalOptions;

/// Log in to WWT Communities.
#[derive(Args, Debug)]
pub struct CommunitiesLoginCommand {
    /// Path to a file from which to read the WWT client secret
    #[arg(long, value_name = "PATH", conflicts_with = "secret_env")]
    pub secret_file: Option<PathBuf>,

    /// Name of an environment variable containing the WWT client secret
    #[arg(long, value_name = "ENV-VAR-NAME")]
    pub secret_env: Option<String>,

    /// Directory to save the login state in
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Open the login page in the default browser
    #[arg(long)]
    pub web: bool,
}

impl CommunitiesLoginCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let secret = self.read_secret()?;
        let config = global.load_config()?;

        let mut builder = CommunitiesClient::builder(global.client(&config))
            .client_secret(secret)
            .interactive_login_if_needed(true)
            .prompt(TerminalLoginPrompt::new().open_browser(self.web));

        if let Some(dir) = self
            .state_dir
            .clone()
            .or_else(|| config.communities.state_dir.clone())
        {
            builder = builder.state_dir(dir);
        }

        builder.connect().context("Communities login failed")?;

        println!("OAuth flow successfully completed.");
        Ok(())
    }

    fn read_secret(&self) -> Result<String> {
        let secret = if let Some(path) = &self.secret_file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            content.lines().next().unwrap_or_default().trim().to_string()
        } else if let Some(name) = &self.secret_env {
            std::env::var(name).unwrap_or_default()
        } else {
            bail!(
                "the WWT \"client secret\" must be provided; use --secret-file or --secret-env"
            );
        };

        if secret.is_empty() {
            bail!("the WWT \"client secret\" is empty or unset");
        }

        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(secret_file: Option<PathBuf>, secret_env: Option<&str>) -> CommunitiesLoginCommand {
        CommunitiesLoginCommand {
            secret_file,
            secret_env: secret_env.map(str::to_string),
            state_dir: None,
            web: false,
        }
    }

    #[test]
    fn test_secret_is_required() {
        let err = command(None, None).read_secret().unwrap_err();
        assert!(err.to_string().contains("--secret-file or --secret-env"));
    }

    #[test]
    fn test_secret_file_first_line_is_trimmed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "  s3cret  \nignored\n").unwrap();

        assert_eq!(command(Some(path), None).read_secret().unwrap(), "s3cret");
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, "\n").unwrap();

        let err = command(Some(path), None).read_secret().unwrap_err();
        assert!(err.to_string().contains("empty or unset"));

        let err = command(None, Some("WWT_TEST_SECRET_THAT_IS_NEVER_SET"))
            .read_secret()
            .unwrap_err();
        assert!(err.to_string().contains("empty or unset"));
    }
}
