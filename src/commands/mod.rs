// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod bills;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod investments;
pub mod transactions;
pub mod transfer;

use anyhow::{Context, Result};

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument '{}'", name))
}

pub(crate) fn optional<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(String::as_str)
}

pub(crate) fn id(m: &clap::ArgMatches) -> Result<i64> {
    m.get_one::<i64>("id").copied().context("Missing record id")
}
