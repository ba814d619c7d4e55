//! ogmeta - OpenGraph metadata for wiki pages.

#![allow(dead_code)]

mod cli;
mod config;
mod host;
mod logger;
mod og;
mod utils;

use std::io::Write;

use anyhow::{Result, bail};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::OgConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let (config_path, required) = cli.config_path();
    let config = OgConfig::load(&config_path, required)?;
    debug!("config"; "loaded {}", config_path.display());

    match &cli.command {
        Commands::Render { args } => {
            let out = cli::render::render_page(args, &config)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(out.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Commands::Validate { site } => {
            if !cli::validate::validate_site(site)? {
                bail!("validation failed");
            }
            Ok(())
        }
    }
}
