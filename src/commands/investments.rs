// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{id, optional, required};
use crate::aggregates::investment_total;
use crate::db::Storage;
use crate::models::{AssetClass, InvestmentDraft, InvestmentPatch};
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<S: Storage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let inv_id = id(sub)?;
            if store.remove_investment(inv_id) {
                println!("Removed investment {}", inv_id);
            } else {
                println!("No investment with id {}", inv_id);
            }
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: Storage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = InvestmentDraft {
        name: required(sub, "name")?.to_string(),
        r#type: required(sub, "type")?.parse()?,
        initial_amount: parse_decimal(required(sub, "amount")?)?,
        roi: match optional(sub, "roi") {
            Some(r) => parse_decimal(r)?,
            None => Decimal::ZERO,
        },
    };
    let inv = store.add_investment(draft)?;
    println!(
        "Added {} '{}' {} @ {}% (id {})",
        inv.r#type,
        inv.name,
        fmt_money(&inv.initial_amount),
        inv.roi,
        inv.id
    );
    Ok(())
}

fn edit<S: Storage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let inv_id = id(sub)?;
    let patch = InvestmentPatch {
        name: optional(sub, "name").map(str::to_string),
        r#type: optional(sub, "type")
            .map(str::parse::<AssetClass>)
            .transpose()?,
        initial_amount: optional(sub, "amount").map(parse_decimal).transpose()?,
        roi: optional(sub, "roi").map(parse_decimal).transpose()?,
    };
    if patch.is_empty() {
        println!("Nothing to change for investment {}", inv_id);
        return Ok(());
    }
    if store.edit_investment(inv_id, patch)? {
        println!("Updated investment {}", inv_id);
    } else {
        println!("No investment with id {}", inv_id);
    }
    Ok(())
}

#[derive(Serialize)]
struct InvestmentRow {
    id: i64,
    name: String,
    r#type: String,
    initial_amount: Decimal,
    roi: Decimal,
    current_value: Decimal,
}

fn list<S: Storage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<InvestmentRow> = store
        .investments()
        .iter()
        .map(|i| InvestmentRow {
            id: i.id,
            name: i.name.clone(),
            r#type: i.r#type.to_string(),
            initial_amount: i.initial_amount,
            roi: i.roi,
            current_value: i.current_value(),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.r#type.clone(),
                fmt_money(&r.initial_amount),
                format!("{}%", r.roi),
                fmt_money(&r.current_value),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Name", "Type", "Invested", "ROI", "Value"], rows)
    );
    println!("Portfolio value: {}", fmt_money(&investment_total(store.investments())));
    Ok(())
}
