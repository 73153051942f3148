mod bmp;
mod cli;
mod error;
mod pixel;
mod texture;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.to_config();
    let seed = config.resolve_seed();
    info!(
        output = %args.output.display(),
        width = config.width,
        height = config.height,
        blocks = config.block_count,
        seed,
        "generating texture"
    );

    let image = config
        .generate(seed)
        .context("Cannot generate texture")?;
    bmp::write_bmp(&args.output, &image)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let dims = image.dimensions();
    println!(
        "Wrote {}x{} texture to {}",
        dims.width(),
        dims.height(),
        args.output.display()
    );
    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
