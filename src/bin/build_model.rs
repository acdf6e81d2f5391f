//! Model inspection tool.
//!
//! Loads a catalog directory, builds the scheduling model, and prints its
//! statistics and content fingerprint. Optionally writes the LP rendering
//! for inspection with external MILP tooling.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin build-model -- data/ [config.toml] [model.lp]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: error)

use std::env;
use std::fs;

use anyhow::{bail, Context, Result};

use eos_sched::config::ModelConfig;
use eos_sched::io::load_catalog_from_dir;
use eos_sched::solver::ModelBuilder;

fn main() -> Result<()> {
    if pretty_env_logger::try_init().is_err() {
        eprintln!("could not init env_logger");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(catalog_dir) = args.first() else {
        bail!("usage: build-model <catalog-dir> [config.toml] [model.lp]");
    };

    let config = match args.get(1) {
        Some(path) => {
            ModelConfig::from_file(path).with_context(|| format!("loading config {}", path))?
        }
        None => ModelConfig::default(),
    };

    let catalog = load_catalog_from_dir(catalog_dir)
        .with_context(|| format!("loading catalog from {}", catalog_dir))?;

    let model = ModelBuilder::new(&catalog, &config)
        .build()
        .context("building model")?;

    let stats = model.stats();
    println!(
        "variables:   {} ({} binary, {} continuous)",
        stats.num_variables, stats.num_binary, stats.num_continuous
    );
    println!("constraints: {}", stats.num_constraints);
    println!("fingerprint: {}", model.fingerprint());

    if let Some(out) = args.get(2) {
        fs::write(out, model.render_lp()).with_context(|| format!("writing {}", out))?;
        println!("wrote LP model to {}", out);
    }

    Ok(())
}
