// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("First day of the range (default: 30 days ago)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Last day of the range (default: today)"),
    )
    .arg(
        Arg::new("open-end")
            .long("open-end")
            .action(ArgAction::SetTrue)
            .conflicts_with("to")
            .help("Do not bound the range at the end"),
    )
    .arg(
        Arg::new("search")
            .long("search")
            .short('s')
            .help("Only categories containing this text (case-insensitive)"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help("Record id")
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Income and expense transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .value_parser(["income", "expense"]),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Defaults to now"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(id_arg())
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(json_args(filter_args(
            Command::new("list").about("List transactions in a date range"),
        )))
}

fn invest_cmd() -> Command {
    Command::new("invest")
        .about("Investment positions")
        .subcommand(
            Command::new("add")
                .about("Add a position")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("stock")
                        .value_parser(["stock", "crypto", "bond"]),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("roi")
                        .long("roi")
                        .allow_hyphen_values(true)
                        .help("Return in percent, may be negative (default 0)"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a position")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["stock", "crypto", "bond"]),
                )
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("roi").long("roi").allow_hyphen_values(true)),
        )
        .subcommand(Command::new("rm").about("Delete a position").arg(id_arg()))
        .subcommand(json_args(Command::new("list").about("List positions")))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Spending limits per category")
        .subcommand(
            Command::new("add")
                .about("Add a budget")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("limit").long("limit").required(true)),
        )
        .subcommand(Command::new("rm").about("Delete a budget").arg(id_arg()))
        .subcommand(json_args(
            Command::new("list").about("Show budgets with spend and utilization"),
        ))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .about("Add a goal")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("saved").long("saved").help("Already saved (default 0)")),
        )
        .subcommand(Command::new("rm").about("Delete a goal").arg(id_arg()))
        .subcommand(json_args(
            Command::new("list").about("Show goals with progress"),
        ))
}

fn bill_cmd() -> Command {
    Command::new("bill")
        .about("Recurring bills")
        .subcommand(
            Command::new("add")
                .about("Add a recurring bill")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("day")
                        .long("day")
                        .required(true)
                        .value_parser(value_parser!(u8))
                        .help("Day of month the bill is due (1-31)"),
                )
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(Command::new("rm").about("Delete a bill").arg(id_arg()))
        .subcommand(json_args(Command::new("list").about("List bills")))
        .subcommand(
            Command::new("pay")
                .about("Record a bill payment as an expense")
                .arg(id_arg()),
        )
}

pub fn build_cli() -> Command {
    Command::new("fintesa")
        .version(clap::crate_version!())
        .about("Personal finance dashboard: transactions, investments, budgets, goals, and bills")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Database file (default: FINTESA_DB or the platform data dir)"),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("db")
                .help("Keep data in memory only; nothing is saved"),
        )
        .arg(
            Arg::new("yes")
                .long("yes")
                .short('y')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Answer yes to every confirmation"),
        )
        .subcommand(tx_cmd())
        .subcommand(invest_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(bill_cmd())
        .subcommand(json_args(filter_args(
            Command::new("dashboard").about("Totals, net worth, and chart series"),
        )))
        .subcommand(
            Command::new("categories")
                .about("List preset categories")
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense"]),
                ),
        )
        .subcommand(
            Command::new("backup").about("Write every collection to a JSON file").arg(
                Arg::new("out")
                    .long("out")
                    .value_name("FILE")
                    .help("Output file (default: Fintesa_Backup.json)"),
            ),
        )
        .subcommand(
            Command::new("restore")
                .about("Replace all data with a backup file")
                .arg(Arg::new("file").required(true).value_name("FILE")),
        )
        .subcommand(Command::new("reset").about("Delete all data"))
}
