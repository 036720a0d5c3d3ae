// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Storage;
use crate::error::Result;
use crate::models::{Transaction, TransactionDraft, TxType};
use crate::prompt::Prompt;
use crate::store::FinanceStore;
use tracing::info;

/// Category stamped on transactions created by paying a bill.
pub const BILL_CATEGORY: &str = "Bills & Utilities";

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Paid(Transaction),
    Declined,
}

/// Turns a bill into a realized expense once the user confirms.
///
/// The bill itself is left as is: it is not marked paid and can be paid again,
/// each confirmation adding a new transaction. Returns `None` for an unknown id.
pub fn pay_bill<S, P>(
    store: &mut FinanceStore<S>,
    bill_id: i64,
    prompt: &mut P,
) -> Result<Option<PaymentOutcome>>
where
    S: Storage,
    P: Prompt + ?Sized,
{
    let Some(bill) = store.bill(bill_id).cloned() else {
        return Ok(None);
    };
    if !prompt.confirm(&format!("Pay \"{}\" now?", bill.name))? {
        return Ok(Some(PaymentOutcome::Declined));
    }
    let tx = store.add_transaction(TransactionDraft::new(
        BILL_CATEGORY,
        bill.amount,
        TxType::Expense,
    ))?;
    info!(bill = bill.id, transaction = tx.id, amount = %tx.amount, "bill paid");
    Ok(Some(PaymentOutcome::Paid(tx)))
}
