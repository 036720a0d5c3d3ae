// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{id, optional, required};
use crate::aggregates::goal_progress;
use crate::db::Storage;
use crate::models::GoalDraft;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, fmt_percent, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle<S: Storage>(store: &mut FinanceStore<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = GoalDraft {
                name: required(sub, "name")?.to_string(),
                target_amount: parse_decimal(required(sub, "target")?)?,
                current_saved: optional(sub, "saved").map(parse_decimal).transpose()?,
            };
            let g = store.add_goal(draft)?;
            println!(
                "Added goal '{}': {} of {} (id {})",
                g.name,
                fmt_money(&g.current_saved),
                fmt_money(&g.target_amount),
                g.id
            );
        }
        Some(("rm", sub)) => {
            let goal_id = id(sub)?;
            if store.remove_goal(goal_id) {
                println!("Removed goal {}", goal_id);
            } else {
                println!("No goal with id {}", goal_id);
            }
        }
        Some(("list", sub)) => {
            let data = goal_progress(store.goals());
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.to_string(),
                            g.name.clone(),
                            fmt_money(&g.current_saved),
                            fmt_money(&g.target_amount),
                            fmt_percent(&g.percent),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Goal", "Saved", "Target", "Progress"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
