// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use fintesa::commands::{dashboard, transactions};
use fintesa::db::MemoryStorage;
use fintesa::models::{TransactionDraft, TxType};
use fintesa::store::FinanceStore;
use fintesa::cli;
use rust_decimal::Decimal;

fn setup() -> FinanceStore<MemoryStorage> {
    let mut store = FinanceStore::open(MemoryStorage::new());
    for (d, cat, amt, t) in [
        (2, "Salary", 1000, TxType::Income),
        (5, "Food Delivery", 40, TxType::Expense),
        (9, "food", 15, TxType::Expense),
    ] {
        store
            .add_transaction(
                TransactionDraft::new(cat, Decimal::from(amt), t)
                    .on(Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()),
            )
            .unwrap();
    }
    store
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
}

#[test]
fn list_applies_search_and_orders_oldest_first() {
    let store = setup();
    let matches = cli::build_cli().get_matches_from([
        "fintesa", "tx", "list", "--from", "2025-03-01", "--to", "2025-03-31", "--search", "FOOD",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&store, list_m, today(), &Utc).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-03-05");
            assert_eq!(rows[0].category, "Food Delivery");
            assert_eq!(rows[1].date, "2025-03-09");
            assert_eq!(rows[1].display_amount, "Rp 15");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_defaults_to_last_thirty_days() {
    let store = setup();
    let matches = cli::build_cli().get_matches_from(["fintesa", "tx", "list"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    // From 2025-04-15 the window starts 2025-03-16, after every seeded transaction.
    let later = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
    assert!(transactions::query_rows(&store, list_m, later, &Utc).unwrap().is_empty());
    assert_eq!(transactions::query_rows(&store, list_m, today(), &Utc).unwrap().len(), 3);
}

#[test]
fn filter_args_support_open_end_and_reject_inverted_range() {
    let matches = cli::build_cli().get_matches_from([
        "fintesa", "dashboard", "--from", "2025-01-01", "--open-end", "-s", "rent",
    ]);
    let Some(("dashboard", m)) = matches.subcommand() else {
        panic!("no dashboard subcommand");
    };
    let filter = dashboard::filter_from_args(m, today()).unwrap();
    assert_eq!(filter.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(filter.end, None);
    assert_eq!(filter.search, "rent");

    let matches = cli::build_cli().get_matches_from([
        "fintesa", "dashboard", "--from", "2025-03-10", "--to", "2025-03-01",
    ]);
    let Some(("dashboard", m)) = matches.subcommand() else {
        panic!("no dashboard subcommand");
    };
    assert!(dashboard::filter_from_args(m, today()).is_err());
}

#[test]
fn global_flags_parse_after_subcommands() {
    let matches = cli::build_cli()
        .try_get_matches_from(["fintesa", "bill", "pay", "1", "--yes", "--db", "/tmp/x.sqlite"])
        .unwrap();
    let Some(("bill", bill_m)) = matches.subcommand() else {
        panic!("no bill subcommand");
    };
    let Some(("pay", pay_m)) = bill_m.subcommand() else {
        panic!("no pay subcommand");
    };
    assert!(pay_m.get_flag("yes"));
    assert_eq!(pay_m.get_one::<i64>("id"), Some(&1));
    assert_eq!(
        pay_m.get_one::<String>("db").map(String::as_str),
        Some("/tmp/x.sqlite")
    );
}

#[test]
fn negative_roi_is_accepted() {
    let matches = cli::build_cli()
        .try_get_matches_from([
            "fintesa", "invest", "add", "--name", "BTC", "--type", "crypto", "--amount", "100",
            "--roi", "-12.5",
        ])
        .unwrap();
    let Some(("invest", m)) = matches.subcommand() else {
        panic!("no invest subcommand");
    };
    let Some(("add", add_m)) = m.subcommand() else {
        panic!("no add subcommand");
    };
    assert_eq!(
        add_m.get_one::<String>("roi").map(String::as_str),
        Some("-12.5")
    );
}

#[test]
fn memory_flag_is_global_and_excludes_db() {
    let matches = cli::build_cli().get_matches_from(["fintesa", "dashboard", "--memory"]);
    let (_, sub) = matches.subcommand().unwrap();
    assert!(sub.get_flag("memory"));

    let err = cli::build_cli()
        .try_get_matches_from(["fintesa", "--memory", "--db", "x.sqlite", "dashboard"])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}
