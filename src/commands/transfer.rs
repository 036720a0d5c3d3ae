// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{optional, required};
use crate::backup::{self, RestoreOutcome, BACKUP_FILE_NAME};
use crate::db::Storage;
use crate::error::FinanceError;
use crate::prompt::Prompt;
use crate::store::FinanceStore;
use anyhow::{Context, Result};
use std::path::Path;

pub fn backup<S: Storage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let out = optional(sub, "out").unwrap_or(BACKUP_FILE_NAME);
    let b = backup::write_backup(store, Path::new(out))
        .with_context(|| format!("Failed to write backup to {}", out))?;
    println!(
        "Backed up {} transactions, {} investments, {} budgets, {} goals, {} bills to {}",
        b.transactions.len(),
        b.investments.len(),
        b.budgets.len(),
        b.goals.len(),
        b.bills.len(),
        out
    );
    Ok(())
}

pub fn restore<S: Storage>(
    store: &mut FinanceStore<S>,
    sub: &clap::ArgMatches,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let file = required(sub, "file")?;
    match backup::restore_file(store, Path::new(file), prompt) {
        Ok(RestoreOutcome::Restored) => println!(
            "Restored {} transactions from {}",
            store.transactions().len(),
            file
        ),
        Ok(RestoreOutcome::Declined) => println!("Restore cancelled, nothing changed"),
        Err(FinanceError::CorruptDocument(reason)) => {
            anyhow::bail!("File corrupt: {} ({}). Nothing was changed.", file, reason)
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!("Failed to restore from {}", file)));
        }
    }
    Ok(())
}

pub fn reset<S: Storage>(store: &mut FinanceStore<S>, prompt: &mut dyn Prompt) -> Result<()> {
    if backup::reset(store, prompt)? {
        println!("All data deleted");
    } else {
        println!("Reset cancelled");
    }
    Ok(())
}
