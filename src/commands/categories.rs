// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::optional;
use crate::models::{preset_categories, TxType};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let kinds = match optional(m, "type") {
        Some(t) => vec![t.parse::<TxType>()?],
        None => vec![TxType::Expense, TxType::Income],
    };
    let mut data = Vec::new();
    for kind in kinds {
        for name in preset_categories(kind) {
            data.push(vec![kind.to_string(), name.to_string()]);
        }
    }
    println!("{}", pretty_table(&["Type", "Category"], data));
    Ok(())
}
