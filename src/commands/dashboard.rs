// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::optional;
use crate::aggregates::{Dashboard, TransactionFilter};
use crate::db::Storage;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};

/// Default look-back window of the overview.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Builds the range/search filter from `--from`, `--to`, `--open-end`, `--search`.
pub fn filter_from_args(sub: &clap::ArgMatches, today: NaiveDate) -> Result<TransactionFilter> {
    let default = TransactionFilter::last_days(today, DEFAULT_RANGE_DAYS);
    let start = match optional(sub, "from") {
        Some(s) => parse_date(s)?,
        None => default.start,
    };
    let end = if sub.get_flag("open-end") {
        None
    } else {
        match optional(sub, "to") {
            Some(s) => Some(parse_date(s)?),
            None => default.end,
        }
    };
    if let Some(end) = end {
        if end < start {
            bail!("Range ends ({}) before it starts ({})", end, start);
        }
    }
    let search = optional(sub, "search").unwrap_or_default();
    Ok(TransactionFilter::new(start, end).with_search(search))
}

pub fn handle<S: Storage>(store: &FinanceStore<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filter = filter_from_args(sub, Local::now().date_naive())?;
    let dash = Dashboard::compute(store.transactions(), store.investments(), &filter, &Local);

    if maybe_print_json(json_flag, jsonl_flag, &dash)? {
        return Ok(());
    }

    let range = match filter.end {
        Some(end) => format!("{} .. {}", filter.start, end),
        None => format!("{} ..", filter.start),
    };
    println!(
        "{}",
        pretty_table(
            &["Range", "Transactions", "Income", "Expense", "Investments", "Net worth"],
            vec![vec![
                range,
                dash.transaction_count.to_string(),
                fmt_money(&dash.totals.income),
                fmt_money(&dash.totals.expense),
                fmt_money(&dash.investment_total),
                fmt_money(&dash.net_worth),
            ]],
        )
    );
    if !dash.series.is_empty() {
        let rows = dash
            .series
            .iter()
            .map(|p| vec![p.label.clone(), fmt_money(&p.income), fmt_money(&p.expense)])
            .collect();
        println!("{}", pretty_table(&["Day", "Income", "Expense"], rows));
    }
    Ok(())
}
