//! Hotspot tiler - renders marker tiles from the command line.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotspot_tiler::{
    config::{Cli, Command, ContextConfig, GenerateConfig},
    load_markers, IconCache, PyramidDriver, TileGrid, TileWriter, ViewContext,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Generate(config) => run_generate(config).await,
        Command::Context(config) => run_context(config),
    }
}

// =============================================================================
// Generate Command
// =============================================================================

async fn run_generate(config: GenerateConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let zooms = match config.zoom_range() {
        Ok(zooms) => zooms,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let grid = match TileGrid::new(config.tile_size) {
        Ok(grid) => grid,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  Input: {}", config.input.display());
    info!("  Output: {}", config.output.display());
    info!("  Zoom: {}..={}", zooms.min(), zooms.max());
    info!("  Layer: {} (script {})", config.base_name, config.format);
    info!("  Tile size: {}px", config.tile_size);

    let mut icons = IconCache::with_capacity(config.icon_cache);
    let markers = match load_markers(&config.input, &mut icons) {
        Ok(markers) => markers,
        Err(e) => {
            error!("Failed to load markers: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let writer = TileWriter::new(&config.output)
        .with_base_name(config.base_name.clone())
        .with_format(config.format)
        .with_tile_size(config.tile_size);

    if !config.no_remove {
        info!("Removing {}", writer.base_path().display());
        if let Err(e) = writer.clear() {
            error!("Failed to clear output: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let driver = PyramidDriver::new(grid);
    let result = if config.concurrent {
        driver
            .generate_concurrent(Arc::from(markers), zooms, Arc::new(writer))
            .await
    } else {
        driver.generate(&markers, zooms, &writer)
    };

    match result {
        Ok(stats) => {
            info!(
                "Done: {} placemark(s) on {} tile(s), {} zoom level(s)",
                stats.placemarks, stats.tiles, stats.zoom_levels
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "hotspot_tiler=debug"
    } else {
        "hotspot_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Context Command
// =============================================================================

fn run_context(config: ContextConfig) -> ExitCode {
    let context = ViewContext::new(&config.tiles_dir, &config.base_name);

    match serde_json::to_string_pretty(&context) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
