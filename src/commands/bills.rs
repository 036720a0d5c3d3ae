// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{id, required};
use crate::db::Storage;
use crate::models::BillDraft;
use crate::payments::{pay_bill, PaymentOutcome};
use crate::prompt::Prompt;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub fn handle<S: Storage>(
    store: &mut FinanceStore<S>,
    m: &clap::ArgMatches,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = BillDraft {
                name: required(sub, "name")?.to_string(),
                date: sub.get_one::<u8>("day").copied().context("Missing due day")?,
                amount: parse_decimal(required(sub, "amount")?)?,
            };
            let b = store.add_bill(draft)?;
            println!(
                "Added bill '{}' due on day {}: {} (id {})",
                b.name,
                b.date,
                fmt_money(&b.amount),
                b.id
            );
        }
        Some(("rm", sub)) => {
            let bill_id = id(sub)?;
            if store.remove_bill(bill_id) {
                println!("Removed bill {}", bill_id);
            } else {
                println!("No bill with id {}", bill_id);
            }
        }
        Some(("list", sub)) => {
            let data = store.bills();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|b| {
                        vec![
                            b.id.to_string(),
                            b.name.clone(),
                            format!("day {}", b.date),
                            fmt_money(&b.amount),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Bill", "Due", "Amount"], rows));
            }
        }
        Some(("pay", sub)) => {
            let bill_id = id(sub)?;
            match pay_bill(store, bill_id, prompt)? {
                Some(PaymentOutcome::Paid(tx)) => {
                    println!("Paid! Recorded {} as transaction {}", fmt_money(&tx.amount), tx.id)
                }
                Some(PaymentOutcome::Declined) => println!("Payment cancelled"),
                None => println!("No bill with id {}", bill_id),
            }
        }
        _ => {}
    }
    Ok(())
}
