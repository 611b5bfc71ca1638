//
//  wwt-api-client
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wwt_api_client::cli::{Cli, Commands};
use wwt_api_client::{exit_codes, Error};

fn main() {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match run(cli) {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("WWT_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<Error>() {
        Some(Error::Authentication(_)) => exit_codes::AUTH_ERROR,
        Some(Error::InvalidRequest(_)) => exit_codes::USAGE,
        Some(Error::ApiResponse { .. }) => exit_codes::API_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Main command dispatcher
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::CommunitiesLogin(cmd) => cmd.run(&cli.global),
        Commands::ShowImage(cmd) => cmd.run(&cli.global),
        Commands::Version => {
            println!("wwt version {}", wwt_api_client::VERSION);
            Ok(())
        }
    }
}
