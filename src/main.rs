//! Syllabus - a browser for course materials.

mod app;
mod catalog;
mod cli;
mod config;
mod core;
mod embed;
mod logger;
mod metadata;
mod nav;
mod page;
mod resolve;
mod resource;
mod session;
mod utils;
mod viewer;

use std::sync::Arc;

use anyhow::Result;
use app::App;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SyllabusConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(SyllabusConfig::load(cli)?);

    match &cli.command {
        Commands::Serve { .. } => serve(&config),
        Commands::Check { args } => {
            let app = load_app(&config)?;
            cli::check::check_catalog(&app, args, &config.content.meta_extension)
        }
        Commands::Query { args } => cli::query::run_query(args, &load_app(&config)?),
    }
}

fn load_app(config: &SyllabusConfig) -> Result<App> {
    let app = App::load(config)?;
    log!(
        "catalog";
        "loaded {} and {} from {}",
        utils::text::plural_count(app.catalog.courses().len(), "course"),
        utils::text::plural_count(app.catalog.file_count(), "file"),
        config.content_relative(config.content.catalog_path()).display()
    );
    Ok(app)
}

/// Bind first, then load the catalog and enter the request loop.
fn serve(config: &SyllabusConfig) -> Result<()> {
    let server = cli::serve::bind_server()?;
    let app = Arc::new(load_app(config)?);
    debug!("serve"; "serving files from {}", app.root.path().display());
    server.run(app)
}
