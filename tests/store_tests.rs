// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use fintesa::db::{Entry, MemoryStorage, Storage};
use fintesa::error::{FinanceError, Result};
use fintesa::models::{
    AssetClass, BillDraft, BudgetDraft, GoalDraft, InvestmentDraft, InvestmentPatch,
    TransactionDraft, TransactionPatch, TxType,
};
use fintesa::store::FinanceStore;
use rust_decimal::Decimal;

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn setup() -> FinanceStore<MemoryStorage> {
    FinanceStore::open(MemoryStorage::new())
}

#[test]
fn fresh_store_has_seed_bills_only() {
    let store = setup();
    assert!(store.transactions().is_empty());
    assert!(store.investments().is_empty());
    assert!(store.budgets().is_empty());
    assert!(store.goals().is_empty());
    let bills = store.bills();
    assert_eq!(bills.len(), 2);
    assert_eq!(bills[0].name, "Netflix Premium");
    assert_eq!(bills[0].date, 25);
    assert_eq!(bills[0].amount, dec(186_000));
    assert_eq!(bills[1].name, "Internet WiFi");
    assert_eq!(bills[1].date, 1);
    assert_eq!(bills[1].amount, dec(350_000));
}

#[test]
fn transactions_are_prepended_and_stamped() {
    let mut store = setup();
    let before = Utc::now();
    let first = store
        .add_transaction(TransactionDraft::new("Salary", dec(1000), TxType::Income))
        .unwrap();
    let second = store
        .add_transaction(TransactionDraft::new("Food", dec(50), TxType::Expense))
        .unwrap();
    assert!(first.date >= before);
    assert!(second.id > first.id);
    let ids: Vec<i64> = store.transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn explicit_date_is_kept() {
    let mut store = setup();
    let when = Utc.with_ymd_and_hms(2024, 12, 31, 8, 30, 0).unwrap();
    let tx = store
        .add_transaction(TransactionDraft::new("Rent", dec(500), TxType::Expense).on(when))
        .unwrap();
    assert_eq!(tx.date, when);
}

#[test]
fn ids_are_unique_across_kinds() {
    let mut store = setup();
    let a = store
        .add_budget(BudgetDraft { category: "food".into(), limit: dec(100) })
        .unwrap();
    let b = store
        .add_goal(GoalDraft { name: "Car".into(), target_amount: dec(10), current_saved: None })
        .unwrap();
    let c = store
        .add_bill(BillDraft { name: "Gym".into(), date: 3, amount: dec(20) })
        .unwrap();
    assert!(a.id < b.id && b.id < c.id);
    // Seed bills use small ids; new ones never collide with them.
    assert!(store.bills().iter().filter(|x| x.id == c.id).count() == 1);
}

#[test]
fn add_then_remove_restores_collection() {
    let mut store = setup();
    store
        .add_transaction(TransactionDraft::new("Salary", dec(1000), TxType::Income))
        .unwrap();
    let tx_before = store.transactions().to_vec();
    let bills_before = store.bills().to_vec();

    let tx = store
        .add_transaction(TransactionDraft::new("Taxi", dec(30), TxType::Expense))
        .unwrap();
    assert!(store.remove_transaction(tx.id));
    assert_eq!(store.transactions(), tx_before.as_slice());

    let bill = store
        .add_bill(BillDraft { name: "Water".into(), date: 10, amount: dec(75_000) })
        .unwrap();
    assert!(store.remove_bill(bill.id));
    assert_eq!(store.bills(), bills_before.as_slice());

    let inv = store
        .add_investment(InvestmentDraft {
            name: "BBCA".into(),
            r#type: AssetClass::Stock,
            initial_amount: dec(1000),
            roi: dec(5),
        })
        .unwrap();
    assert!(store.remove_investment(inv.id));
    assert!(store.investments().is_empty());

    let budget = store
        .add_budget(BudgetDraft { category: "Food".into(), limit: dec(10) })
        .unwrap();
    assert!(store.remove_budget(budget.id));
    assert!(store.budgets().is_empty());

    let goal = store
        .add_goal(GoalDraft { name: "Trip".into(), target_amount: dec(10), current_saved: None })
        .unwrap();
    assert!(store.remove_goal(goal.id));
    assert!(store.goals().is_empty());
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut store = setup();
    let bills = store.bills().to_vec();
    assert!(!store.remove_bill(424242));
    assert!(!store.remove_transaction(424242));
    assert_eq!(store.bills(), bills.as_slice());
    // Nothing was written for a no-op.
    assert!(store.storage().read("finance_bills").unwrap().is_none());
}

#[test]
fn edit_unknown_id_is_noop() {
    let mut store = setup();
    store
        .add_transaction(TransactionDraft::new("Salary", dec(1000), TxType::Income))
        .unwrap();
    let before = store.transactions().to_vec();
    let patch = TransactionPatch {
        amount: Some(dec(1)),
        ..Default::default()
    };
    assert!(!store.edit_transaction(-1, patch).unwrap());
    assert_eq!(store.transactions(), before.as_slice());

    let changed = store
        .edit_investment(
            -1,
            InvestmentPatch {
                roi: Some(dec(3)),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!changed);
}

#[test]
fn edit_merges_only_given_fields() {
    let mut store = setup();
    let tx = store
        .add_transaction(TransactionDraft::new("Food", dec(40), TxType::Expense))
        .unwrap();
    let patch = TransactionPatch {
        category: Some("  Food Delivery ".into()),
        ..Default::default()
    };
    assert!(store.edit_transaction(tx.id, patch).unwrap());
    let edited = &store.transactions()[0];
    assert_eq!(edited.category, "Food Delivery");
    assert_eq!(edited.amount, dec(40));
    assert_eq!(edited.r#type, TxType::Expense);
    assert_eq!(edited.date, tx.date);

    let inv = store
        .add_investment(InvestmentDraft {
            name: "BTC".into(),
            r#type: AssetClass::Crypto,
            initial_amount: dec(2000),
            roi: dec(-10),
        })
        .unwrap();
    store
        .edit_investment(
            inv.id,
            InvestmentPatch {
                roi: Some(dec(25)),
                ..Default::default()
            },
        )
        .unwrap();
    let edited = &store.investments()[0];
    assert_eq!(edited.name, "BTC");
    assert_eq!(edited.roi, dec(25));
    assert_eq!(edited.current_value(), dec(2500));
}

#[test]
fn invalid_drafts_are_rejected_without_mutation() {
    let mut store = setup();
    let err = store
        .add_transaction(TransactionDraft::new("   ", dec(10), TxType::Expense))
        .unwrap_err();
    assert!(matches!(err, FinanceError::Invalid(_)));
    let err = store
        .add_transaction(TransactionDraft::new("Food", Decimal::ZERO, TxType::Expense))
        .unwrap_err();
    assert!(matches!(err, FinanceError::Invalid(_)));
    assert!(store.transactions().is_empty());

    let err = store
        .add_bill(BillDraft { name: "Rent".into(), date: 32, amount: dec(1) })
        .unwrap_err();
    assert!(matches!(err, FinanceError::Invalid(_)));
    assert_eq!(store.bills().len(), 2);

    let err = store
        .add_budget(BudgetDraft { category: "Food".into(), limit: dec(-1) })
        .unwrap_err();
    assert!(matches!(err, FinanceError::Invalid(_)));
}

#[test]
fn goal_saved_defaults_to_zero() {
    let mut store = setup();
    let g = store
        .add_goal(GoalDraft { name: "House".into(), target_amount: dec(1000), current_saved: None })
        .unwrap();
    assert_eq!(g.current_saved, Decimal::ZERO);
}

#[test]
fn state_survives_cold_restart() {
    let mut store = setup();
    let tx = store
        .add_transaction(TransactionDraft::new("Salary", dec(1000), TxType::Income))
        .unwrap();
    store
        .add_investment(InvestmentDraft {
            name: "Bond A".into(),
            r#type: AssetClass::Bond,
            initial_amount: "1500.50".parse().unwrap(),
            roi: "6.25".parse().unwrap(),
        })
        .unwrap();
    let investments = store.investments().to_vec();

    let mut reopened = FinanceStore::open(store.into_storage());
    assert_eq!(reopened.transactions(), std::slice::from_ref(&tx));
    assert_eq!(reopened.investments(), investments.as_slice());
    assert_eq!(reopened.bills().len(), 2);

    let next = reopened
        .add_transaction(TransactionDraft::new("Bonus", dec(1), TxType::Income))
        .unwrap();
    assert!(next.id > tx.id);
}

#[test]
fn edits_and_removals_survive_cold_restart() {
    let mut store = setup();
    let tx = store
        .add_transaction(TransactionDraft::new("Food", dec(40), TxType::Expense))
        .unwrap();
    let inv = store
        .add_investment(InvestmentDraft {
            name: "BBRI".into(),
            r#type: AssetClass::Stock,
            initial_amount: dec(1000),
            roi: dec(5),
        })
        .unwrap();
    let keep = store
        .add_budget(BudgetDraft { category: "Transport".into(), limit: dec(300) })
        .unwrap();
    let dropped = store
        .add_budget(BudgetDraft { category: "Food".into(), limit: dec(500) })
        .unwrap();
    let goal = store
        .add_goal(GoalDraft { name: "Bike".into(), target_amount: dec(900), current_saved: None })
        .unwrap();
    let seed_bill = store.bills()[0].id;

    let edited = TransactionPatch {
        amount: Some(dec(65)),
        category: Some("Groceries".into()),
        ..Default::default()
    };
    assert!(store.edit_transaction(tx.id, edited).unwrap());
    let edited = InvestmentPatch {
        roi: Some(dec(-20)),
        ..Default::default()
    };
    assert!(store.edit_investment(inv.id, edited).unwrap());
    assert!(store.remove_budget(dropped.id));
    assert!(store.remove_bill(seed_bill));
    assert!(store.remove_goal(goal.id));

    let reopened = FinanceStore::open(store.into_storage());
    let tx = &reopened.transactions()[0];
    assert_eq!(tx.amount, dec(65));
    assert_eq!(tx.category, "Groceries");
    assert_eq!(reopened.investments()[0].roi, dec(-20));
    assert_eq!(reopened.investments()[0].current_value(), dec(800));
    assert_eq!(reopened.budgets(), std::slice::from_ref(&keep));
    assert_eq!(reopened.bills().len(), 1);
    assert!(reopened.bill(seed_bill).is_none());
    assert!(reopened.goals().is_empty());
}

#[test]
fn edit_unknown_id_ignores_invalid_patch() {
    let mut store = setup();
    let bad_amount = TransactionPatch {
        amount: Some(Decimal::ZERO),
        ..Default::default()
    };
    assert!(!store.edit_transaction(-1, bad_amount).unwrap());
    let blank_name = InvestmentPatch {
        name: Some("  ".into()),
        ..Default::default()
    };
    assert!(!store.edit_investment(-1, blank_name).unwrap());

    let tx = store
        .add_transaction(TransactionDraft::new("Food", dec(40), TxType::Expense))
        .unwrap();
    let bad_amount = TransactionPatch {
        amount: Some(Decimal::ZERO),
        ..Default::default()
    };
    let err = store.edit_transaction(tx.id, bad_amount).unwrap_err();
    assert!(matches!(err, FinanceError::Invalid(_)));
    assert_eq!(store.transactions()[0].amount, dec(40));
}

#[test]
fn amounts_beyond_float_precision_are_rejected() {
    let mut store = setup();
    let too_precise: Decimal = "1234567890.1234567".parse().unwrap();
    let err = store
        .add_transaction(TransactionDraft::new("Salary", too_precise, TxType::Income))
        .unwrap_err();
    assert!(matches!(err, FinanceError::Invalid(_)));
    assert!(store.transactions().is_empty());

    // Fifteen significant digits still round-trip through storage.
    let exact: Decimal = "12345678901234.5".parse().unwrap();
    let tx = store
        .add_transaction(TransactionDraft::new("Salary", exact, TxType::Income))
        .unwrap();
    let reopened = FinanceStore::open(store.into_storage());
    assert_eq!(reopened.transactions()[0].amount, tx.amount);
}

#[test]
fn persisted_layout_uses_numbers_and_camel_case() {
    let mut store = setup();
    store
        .add_transaction(TransactionDraft::new("Salary", dec(1000), TxType::Income))
        .unwrap();
    store
        .add_goal(GoalDraft { name: "Car".into(), target_amount: dec(5000), current_saved: Some(dec(250)) })
        .unwrap();

    let raw = store.storage().read("finance_transactions").unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["type"], "income");
    assert_eq!(v[0]["category"], "Salary");
    assert_eq!(v[0]["amount"].as_f64(), Some(1000.0));
    assert!(v[0]["date"].is_string());

    let raw = store.storage().read("finance_goals").unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["targetAmount"].as_f64(), Some(5000.0));
    assert_eq!(v[0]["currentSaved"].as_f64(), Some(250.0));
}

#[test]
fn unreadable_stored_collection_falls_back_to_defaults() {
    let mut storage = MemoryStorage::new();
    storage.write("finance_transactions", "{not json").unwrap();
    storage.write("finance_bills", "[]").unwrap();
    let store = FinanceStore::open(storage);
    assert!(store.transactions().is_empty());
    // An explicitly empty bill list is data, not absence.
    assert!(store.bills().is_empty());
}

struct QuotaExceeded;

impl Storage for QuotaExceeded {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(FinanceError::Io(std::io::Error::other("quota exceeded")))
    }

    fn write_all(&mut self, _entries: &[Entry]) -> Result<()> {
        Err(FinanceError::Io(std::io::Error::other("quota exceeded")))
    }
}

#[test]
fn failed_persist_keeps_in_memory_state() {
    let mut store = FinanceStore::open(QuotaExceeded);
    let tx = store
        .add_transaction(TransactionDraft::new("Salary", dec(1000), TxType::Income))
        .unwrap();
    assert_eq!(store.transactions().len(), 1);
    assert!(store.remove_transaction(tx.id));
    assert!(store.transactions().is_empty());
}
