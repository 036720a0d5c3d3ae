// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{id, required};
use crate::aggregates::budget_statuses;
use crate::db::Storage;
use crate::models::BudgetDraft;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<S: Storage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("rm", sub)) => {
            let budget_id = id(sub)?;
            if store.remove_budget(budget_id) {
                println!("Removed budget {}", budget_id);
            } else {
                println!("No budget with id {}", budget_id);
            }
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: Storage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = BudgetDraft {
        category: required(sub, "category")?.to_string(),
        limit: parse_decimal(required(sub, "limit")?)?,
    };
    let b = store.add_budget(draft)?;
    println!(
        "Budget set for '{}' = {} (id {})",
        b.category,
        fmt_money(&b.limit),
        b.id
    );
    Ok(())
}

fn list<S: Storage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    // Spend is matched against every transaction, not the dashboard range.
    let data = budget_statuses(store.budgets(), store.transactions());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.category.clone(),
                fmt_money(&s.spent),
                fmt_money(&s.limit),
                fmt_percent(&s.percent),
                if s.warning { "!".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Category", "Spent", "Limit", "Used", ""], rows)
    );
    Ok(())
}
