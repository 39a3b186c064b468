//! Trains the autoencoder and streams its visualisations to the configured display.
//!
//! Run with:
//!   RUST_LOG=info cargo run --release
//!
//! Settings are read from `autoencoder-demo.json` in the working directory
//! when present; every field is optional.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use ferrite_autoencoder::{AutoEncoderDemo, DemoConfig};

const CONFIG_FILE: &str = "autoencoder-demo.json";

fn main() -> Result<()> {
    pretty_env_logger::init();

    let config = if Path::new(CONFIG_FILE).exists() {
        DemoConfig::load_json(CONFIG_FILE).with_context(|| format!("failed to load {}", CONFIG_FILE))?
    } else {
        DemoConfig::default()
    };

    let display = config.display.open().context("failed to open frame display")?;
    let mut demo = AutoEncoderDemo::new(config, display);
    let outcome = demo.run()?;

    info!(
        "Demo complete: {} input features, {} frames shown",
        outcome.input_feature_count,
        outcome.showcase.frames()
    );
    Ok(())
}
