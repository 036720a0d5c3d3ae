// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{id, optional, required};
use crate::commands::dashboard::filter_from_args;
use crate::db::Storage;
use crate::models::{TransactionDraft, TransactionPatch, TxType};
use crate::store::FinanceStore;
use crate::utils::{fmt_date, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

pub fn handle<S: Storage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Date-only input is stamped at local noon so it lands on that day in any range query.
pub fn day_to_timestamp<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| noon.and_utc())
}

fn add<S: Storage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = required(sub, "category")?;
    let kind: TxType = required(sub, "type")?.parse()?;
    let mut draft = TransactionDraft::new(category, amount, kind);
    if let Some(d) = optional(sub, "date") {
        draft = draft.on(day_to_timestamp(parse_date(d)?, &Local));
    }
    let tx = store.add_transaction(draft)?;
    println!(
        "Recorded {} {} in '{}' on {} (id {})",
        tx.r#type,
        fmt_money(&tx.amount),
        tx.category,
        fmt_date(&tx.date.with_timezone(&Local)),
        tx.id
    );
    Ok(())
}

fn edit<S: Storage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let tx_id = id(sub)?;
    let patch = TransactionPatch {
        date: optional(sub, "date")
            .map(|d| parse_date(d).map(|d| day_to_timestamp(d, &Local)))
            .transpose()?,
        category: optional(sub, "category").map(str::to_string),
        amount: optional(sub, "amount").map(parse_decimal).transpose()?,
        r#type: optional(sub, "type").map(str::parse::<TxType>).transpose()?,
    };
    if patch.is_empty() {
        println!("Nothing to change for transaction {}", tx_id);
        return Ok(());
    }
    if store.edit_transaction(tx_id, patch)? {
        println!("Updated transaction {}", tx_id);
    } else {
        println!("No transaction with id {}", tx_id);
    }
    Ok(())
}

fn rm<S: Storage>(store: &mut FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let tx_id = id(sub)?;
    if store.remove_transaction(tx_id) {
        println!("Removed transaction {}", tx_id);
    } else {
        println!("No transaction with id {}", tx_id);
    }
    Ok(())
}

fn list<S: Storage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = Local::now().date_naive();
    let data = query_rows(store, sub, today, &Local)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.r#type.clone(),
                    r.display_amount.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Category", "Type", "Amount"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub r#type: String,
    pub amount: String,
    #[serde(skip)]
    pub display_amount: String,
}

/// Filtered transactions, oldest first.
pub fn query_rows<S, Tz>(
    store: &FinanceStore<S>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
    tz: &Tz,
) -> Result<Vec<TransactionRow>>
where
    S: Storage,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let filter = filter_from_args(sub, today)?;
    let data = filter
        .apply(store.transactions(), tz)
        .into_iter()
        .rev()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.with_timezone(tz).format("%Y-%m-%d").to_string(),
            category: t.category.clone(),
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            display_amount: fmt_money(&t.amount),
        })
        .collect();
    Ok(data)
}
