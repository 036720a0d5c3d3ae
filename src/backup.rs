// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{self, Storage};
use crate::error::{FinanceError, Result};
use crate::models::{Bill, Budget, Goal, Investment, Transaction};
use crate::prompt::Prompt;
use crate::store::FinanceStore;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

pub const BACKUP_FILE_NAME: &str = "Fintesa_Backup.json";

/// Full copy of the store as written to a backup file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub transactions: Vec<Transaction>,
    pub investments: Vec<Investment>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub bills: Vec<Bill>,
    pub date: DateTime<Utc>,
}

impl Backup {
    pub fn snapshot<S: Storage>(store: &FinanceStore<S>) -> Self {
        Self {
            transactions: store.transactions().to_vec(),
            investments: store.investments().to_vec(),
            budgets: store.budgets().to_vec(),
            goals: store.goals().to_vec(),
            bills: store.bills().to_vec(),
            date: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates an externally supplied document.
    ///
    /// `transactions` must be present and non-null; any other collection may be
    /// missing and then restores as empty. Every present collection has to
    /// decode into its record type.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| FinanceError::CorruptDocument(format!("not valid JSON: {}", e)))?;
        match value.get("transactions") {
            None | Some(Value::Null) => {
                return Err(FinanceError::CorruptDocument(
                    "missing 'transactions' collection".into(),
                ));
            }
            Some(_) => {}
        }
        let date = match value.get("date") {
            Some(v) if !v.is_null() => serde_json::from_value(v.clone()).map_err(|e| {
                FinanceError::CorruptDocument(format!("invalid 'date': {}", e))
            })?,
            _ => Utc::now(),
        };
        Ok(Self {
            transactions: collection(&value, "transactions")?,
            investments: collection(&value, "investments")?,
            budgets: collection(&value, "budgets")?,
            goals: collection(&value, "goals")?,
            bills: collection(&value, "bills")?,
            date,
        })
    }
}

fn collection<T: DeserializeOwned>(doc: &Value, field: &str) -> Result<Vec<T>> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|e| FinanceError::CorruptDocument(format!("invalid '{}': {}", field, e))),
    }
}

/// Writes a pretty-printed snapshot to `path`.
pub fn write_backup<S: Storage>(store: &FinanceStore<S>, path: &Path) -> Result<Backup> {
    let backup = Backup::snapshot(store);
    fs::write(path, backup.to_json()?)?;
    info!(path = %path.display(), transactions = backup.transactions.len(), "backup written");
    Ok(backup)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Declined,
}

/// Replaces every persisted collection with the document's contents and
/// reloads the store from storage.
///
/// Validation happens before the prompt; a corrupt document never reaches the
/// user for confirmation and leaves storage untouched. There is no merge:
/// confirmed restores overwrite all five collections in a single batch, so a
/// failed write leaves the previous data in place.
pub fn restore<S, P>(store: &mut FinanceStore<S>, text: &str, prompt: &mut P) -> Result<RestoreOutcome>
where
    S: Storage,
    P: Prompt + ?Sized,
{
    let doc = Backup::parse(text)?;
    if !prompt.confirm("Overwrite data?")? {
        return Ok(RestoreOutcome::Declined);
    }
    let entries = [
        db::entry(&doc.transactions)?,
        db::entry(&doc.investments)?,
        db::entry(&doc.budgets)?,
        db::entry(&doc.goals)?,
        db::entry(&doc.bills)?,
    ];
    store.storage_mut().write_all(&entries)?;
    store.reload();
    info!(
        transactions = doc.transactions.len(),
        investments = doc.investments.len(),
        budgets = doc.budgets.len(),
        goals = doc.goals.len(),
        bills = doc.bills.len(),
        "restore complete"
    );
    Ok(RestoreOutcome::Restored)
}

pub fn restore_file<S, P>(store: &mut FinanceStore<S>, path: &Path, prompt: &mut P) -> Result<RestoreOutcome>
where
    S: Storage,
    P: Prompt + ?Sized,
{
    let text = fs::read_to_string(path)?;
    restore(store, &text, prompt)
}

/// Wipes all persisted data after confirmation; bills come back as the seed set.
pub fn reset<S, P>(store: &mut FinanceStore<S>, prompt: &mut P) -> Result<bool>
where
    S: Storage,
    P: Prompt + ?Sized,
{
    if !prompt.confirm("Reset everything? All data will be lost.")? {
        return Ok(false);
    }
    db::clear(store.storage_mut())?;
    store.reload();
    info!("all data reset");
    Ok(true)
}
