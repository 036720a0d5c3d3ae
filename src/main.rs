// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fintesa::db::{MemoryStorage, Storage};
use fintesa::prompt::{Fixed, Prompt, StdinPrompt};
use fintesa::store::FinanceStore;
use fintesa::{cli, commands, db};

// Global flags may be given on any level of the command line.
fn global_flag(m: &clap::ArgMatches, name: &str) -> bool {
    m.get_flag(name) || m.subcommand().is_some_and(|(_, sub)| global_flag(sub, name))
}

fn global_value(m: &clap::ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name)
        .cloned()
        .or_else(|| m.subcommand().and_then(|(_, sub)| global_value(sub, name)))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::build_cli().get_matches();

    let mut prompt: Box<dyn Prompt> = if global_flag(&matches, "yes") {
        Box::new(Fixed(true))
    } else {
        Box::new(StdinPrompt)
    };

    if global_flag(&matches, "memory") {
        info!("using in-memory storage");
        let mut store = FinanceStore::open(MemoryStorage::new());
        return dispatch(&matches, &mut store, prompt.as_mut());
    }
    let path = db::resolve_db_path(global_value(&matches, "db").as_deref())?;
    let mut store = FinanceStore::open(db::open_or_init(&path)?);
    dispatch(&matches, &mut store, prompt.as_mut())
}

fn dispatch<S: Storage>(
    matches: &clap::ArgMatches,
    store: &mut FinanceStore<S>,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(store, sub)?,
        Some(("invest", sub)) => commands::investments::handle(store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(store, sub)?,
        Some(("goal", sub)) => commands::goals::handle(store, sub)?,
        Some(("bill", sub)) => commands::bills::handle(store, sub, prompt)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(store, sub)?,
        Some(("categories", sub)) => commands::categories::handle(sub)?,
        Some(("backup", sub)) => commands::transfer::backup(store, sub)?,
        Some(("restore", sub)) => commands::transfer::restore(store, sub, prompt)?,
        Some(("reset", _)) => commands::transfer::reset(store, prompt)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
