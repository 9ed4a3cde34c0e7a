// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use spendsmart::config::AppConfig;
use spendsmart::insights::InsightGenerator;
use spendsmart::state::AppState;
use spendsmart::store::FileStore;
use spendsmart::{cli, commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let matches = cli::build_cli().get_matches();
    let cfg = AppConfig::from_env(matches.get_one::<PathBuf>("data-dir").cloned())?;

    let store = FileStore::open(&cfg.data_dir)
        .with_context(|| format!("Open data dir {}", cfg.data_dir.display()))?;
    let mut state = AppState::load(store);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data directory ready at {}", state.store().dir().display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut state, &cfg, sub)?,
        Some(("categories", _)) => commands::categories::handle()?,
        Some(("parents", sub)) => commands::reports::parents(state.transactions(), &cfg, sub)?,
        Some(("stats", sub)) => commands::reports::stats(state.transactions(), &cfg, sub)?,
        Some(("spend", sub)) => commands::reports::spend(state.transactions(), &cfg, sub)?,
        Some(("portfolio", sub)) => commands::portfolio::handle(&mut state, &cfg, sub)?,
        Some(("insights", sub)) => {
            let generator = InsightGenerator::from_config(&cfg)?;
            commands::insights::handle(state.transactions(), &generator, sub)?;
        }
        Some(("export", sub)) => {
            commands::exporter::handle(state.transactions(), sub)?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
