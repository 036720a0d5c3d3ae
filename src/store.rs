// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The authoritative in-memory finance state.
//!
//! Every mutation runs in two explicit phases: apply to the in-memory
//! collection, then persist the whole collection for that kind. A failed
//! persist is logged and the in-memory state stays authoritative for the rest
//! of the session.

use crate::db::{self, Storage};
use crate::error::Result;
use crate::models::{
    Bill, BillDraft, Budget, BudgetDraft, Goal, GoalDraft, Investment, InvestmentDraft,
    InvestmentPatch, Record, Transaction, TransactionDraft, TransactionPatch,
};
use chrono::Utc;
use tracing::{debug, warn};

pub struct FinanceStore<S: Storage> {
    storage: S,
    transactions: Vec<Transaction>,
    investments: Vec<Investment>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    bills: Vec<Bill>,
    last_id: i64,
}

impl<S: Storage> FinanceStore<S> {
    /// Builds the store from whatever `storage` holds (cold start).
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            transactions: Vec::new(),
            investments: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            bills: Vec::new(),
            last_id: 0,
        };
        store.reload();
        store
    }

    /// Discards in-memory state and re-reads every collection from storage.
    pub fn reload(&mut self) {
        self.transactions = db::load(&self.storage);
        self.investments = db::load(&self.storage);
        self.budgets = db::load(&self.storage);
        self.goals = db::load(&self.storage);
        self.bills = db::load(&self.storage);
        self.last_id = self.last_id.max(self.max_id());
        debug!(
            transactions = self.transactions.len(),
            investments = self.investments.len(),
            budgets = self.budgets.len(),
            goals = self.goals.len(),
            bills = self.bills.len(),
            "store loaded"
        );
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn bill(&self, id: i64) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // Transactions are kept newest-first.

    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction> {
        let draft = draft.validated()?;
        let tx = Transaction {
            id: self.next_id(),
            date: draft.date.unwrap_or_else(Utc::now),
            category: draft.category,
            amount: draft.amount,
            r#type: draft.r#type,
        };
        self.transactions.insert(0, tx.clone());
        persist(&mut self.storage, &self.transactions);
        debug!(id = tx.id, category = %tx.category, amount = %tx.amount, "transaction added");
        Ok(tx)
    }

    /// Returns `false` without touching anything when `id` is unknown, even
    /// if the patch itself would not validate.
    pub fn edit_transaction(&mut self, id: i64, patch: TransactionPatch) -> Result<bool> {
        let Some(tx) = self.transactions.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        patch.validated()?.apply(tx);
        persist(&mut self.storage, &self.transactions);
        debug!(id, "transaction edited");
        Ok(true)
    }

    pub fn remove_transaction(&mut self, id: i64) -> bool {
        remove_and_persist(&mut self.storage, &mut self.transactions, id)
    }

    pub fn add_investment(&mut self, draft: InvestmentDraft) -> Result<Investment> {
        let draft = draft.validated()?;
        let inv = Investment {
            id: self.next_id(),
            name: draft.name,
            r#type: draft.r#type,
            initial_amount: draft.initial_amount,
            roi: draft.roi,
        };
        self.investments.push(inv.clone());
        persist(&mut self.storage, &self.investments);
        debug!(id = inv.id, name = %inv.name, "investment added");
        Ok(inv)
    }

    pub fn edit_investment(&mut self, id: i64, patch: InvestmentPatch) -> Result<bool> {
        let Some(inv) = self.investments.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        patch.validated()?.apply(inv);
        persist(&mut self.storage, &self.investments);
        debug!(id, "investment edited");
        Ok(true)
    }

    pub fn remove_investment(&mut self, id: i64) -> bool {
        remove_and_persist(&mut self.storage, &mut self.investments, id)
    }

    pub fn add_budget(&mut self, draft: BudgetDraft) -> Result<Budget> {
        let draft = draft.validated()?;
        let budget = Budget {
            id: self.next_id(),
            category: draft.category,
            limit: draft.limit,
        };
        self.budgets.push(budget.clone());
        persist(&mut self.storage, &self.budgets);
        debug!(id = budget.id, category = %budget.category, "budget added");
        Ok(budget)
    }

    pub fn remove_budget(&mut self, id: i64) -> bool {
        remove_and_persist(&mut self.storage, &mut self.budgets, id)
    }

    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<Goal> {
        let draft = draft.validated()?;
        let goal = Goal {
            id: self.next_id(),
            name: draft.name,
            target_amount: draft.target_amount,
            current_saved: draft.current_saved.unwrap_or_default(),
        };
        self.goals.push(goal.clone());
        persist(&mut self.storage, &self.goals);
        debug!(id = goal.id, name = %goal.name, "goal added");
        Ok(goal)
    }

    pub fn remove_goal(&mut self, id: i64) -> bool {
        remove_and_persist(&mut self.storage, &mut self.goals, id)
    }

    pub fn add_bill(&mut self, draft: BillDraft) -> Result<Bill> {
        let draft = draft.validated()?;
        let bill = Bill {
            id: self.next_id(),
            name: draft.name,
            date: draft.date,
            amount: draft.amount,
        };
        self.bills.push(bill.clone());
        persist(&mut self.storage, &self.bills);
        debug!(id = bill.id, name = %bill.name, "bill added");
        Ok(bill)
    }

    pub fn remove_bill(&mut self, id: i64) -> bool {
        remove_and_persist(&mut self.storage, &mut self.bills, id)
    }

    /// Millisecond timestamps, bumped past the last issued id so ids stay
    /// unique and increasing even within the same millisecond.
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    fn max_id(&self) -> i64 {
        let ids = self
            .transactions
            .iter()
            .map(|t| t.id)
            .chain(self.investments.iter().map(|i| i.id))
            .chain(self.budgets.iter().map(|b| b.id))
            .chain(self.goals.iter().map(|g| g.id))
            .chain(self.bills.iter().map(|b| b.id));
        ids.max().unwrap_or(0)
    }
}

fn persist<T: Record, S: Storage>(storage: &mut S, items: &[T]) {
    if let Err(e) = db::save(storage, items) {
        warn!(
            key = T::KIND.storage_key(),
            error = %e,
            "persist failed, keeping in-memory state"
        );
    }
}

fn remove_and_persist<T: Record, S: Storage>(storage: &mut S, items: &mut Vec<T>, id: i64) -> bool {
    let before = items.len();
    items.retain(|r| r.id() != id);
    if items.len() == before {
        return false;
    }
    persist(storage, items);
    debug!(key = T::KIND.storage_key(), id, "record removed");
    true
}
