// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{FinanceError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five persisted collections, one storage key each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Transactions,
    Investments,
    Budgets,
    Goals,
    Bills,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Transactions,
        EntityKind::Investments,
        EntityKind::Budgets,
        EntityKind::Goals,
        EntityKind::Bills,
    ];

    pub fn storage_key(self) -> &'static str {
        match self {
            EntityKind::Transactions => "finance_transactions",
            EntityKind::Investments => "finance_investments",
            EntityKind::Budgets => "finance_budgets",
            EntityKind::Goals => "finance_goals",
            EntityKind::Bills => "finance_bills",
        }
    }
}

/// A stored record of one entity kind.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KIND: EntityKind;

    fn id(&self) -> i64;

    /// Collection returned when nothing has been persisted yet.
    fn defaults() -> Vec<Self> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            other => Err(FinanceError::Invalid(format!(
                "unknown transaction type '{}' (use income|expense)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stock,
    Crypto,
    Bond,
}

impl AssetClass {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Stock => "stock",
            AssetClass::Crypto => "crypto",
            AssetClass::Bond => "bond",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stock" => Ok(AssetClass::Stock),
            "crypto" => Ok(AssetClass::Crypto),
            "bond" => Ok(AssetClass::Bond),
            other => Err(FinanceError::Invalid(format!(
                "unknown investment type '{}' (use stock|crypto|bond)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub r#type: TxType,
}

impl Record for Transaction {
    const KIND: EntityKind = EntityKind::Transactions;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: i64,
    pub name: String,
    pub r#type: AssetClass,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub roi: Decimal, // signed percentage
}

impl Investment {
    /// Value after applying the return: `initial * (1 + roi / 100)`.
    pub fn current_value(&self) -> Decimal {
        self.initial_amount + self.initial_amount * self.roi / Decimal::ONE_HUNDRED
    }
}

impl Record for Investment {
    const KIND: EntityKind = EntityKind::Investments;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
}

impl Record for Budget {
    const KIND: EntityKind = EntityKind::Budgets;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub current_saved: Decimal,
}

impl Record for Goal {
    const KIND: EntityKind = EntityKind::Goals;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub name: String,
    pub date: u8, // day of month, 1-31
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Record for Bill {
    const KIND: EntityKind = EntityKind::Bills;

    fn id(&self) -> i64 {
        self.id
    }

    fn defaults() -> Vec<Self> {
        vec![
            Bill {
                id: 1,
                name: "Netflix Premium".into(),
                date: 25,
                amount: Decimal::from(186_000),
            },
            Bill {
                id: 2,
                name: "Internet WiFi".into(),
                date: 1,
                amount: Decimal::from(350_000),
            },
        ]
    }
}

// Drafts carry caller data for `add_*`; ids are never caller-supplied.

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub date: Option<DateTime<Utc>>,
    pub category: String,
    pub amount: Decimal,
    pub r#type: TxType,
}

impl TransactionDraft {
    pub fn new(category: impl Into<String>, amount: Decimal, r#type: TxType) -> Self {
        Self {
            date: None,
            category: category.into(),
            amount,
            r#type,
        }
    }

    pub fn on(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub(crate) fn validated(self) -> Result<Self> {
        let category = required_text("category", &self.category)?;
        positive("amount", self.amount)?;
        Ok(Self { category, ..self })
    }
}

/// Fields to merge into an existing transaction; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub r#type: Option<TxType>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.r#type.is_none()
    }

    pub(crate) fn validated(self) -> Result<Self> {
        let category = self
            .category
            .as_deref()
            .map(|c| required_text("category", c))
            .transpose()?;
        if let Some(amount) = self.amount {
            positive("amount", amount)?;
        }
        Ok(Self { category, ..self })
    }

    pub(crate) fn apply(self, tx: &mut Transaction) {
        if let Some(date) = self.date {
            tx.date = date;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(t) = self.r#type {
            tx.r#type = t;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentDraft {
    pub name: String,
    pub r#type: AssetClass,
    pub initial_amount: Decimal,
    pub roi: Decimal,
}

impl InvestmentDraft {
    pub(crate) fn validated(self) -> Result<Self> {
        let name = required_text("name", &self.name)?;
        non_negative("initial amount", self.initial_amount)?;
        storable("roi", self.roi)?;
        Ok(Self { name, ..self })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentPatch {
    pub name: Option<String>,
    pub r#type: Option<AssetClass>,
    pub initial_amount: Option<Decimal>,
    pub roi: Option<Decimal>,
}

impl InvestmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.r#type.is_none()
            && self.initial_amount.is_none()
            && self.roi.is_none()
    }

    pub(crate) fn validated(self) -> Result<Self> {
        let name = self
            .name
            .as_deref()
            .map(|n| required_text("name", n))
            .transpose()?;
        if let Some(amount) = self.initial_amount {
            non_negative("initial amount", amount)?;
        }
        if let Some(roi) = self.roi {
            storable("roi", roi)?;
        }
        Ok(Self { name, ..self })
    }

    pub(crate) fn apply(self, inv: &mut Investment) {
        if let Some(name) = self.name {
            inv.name = name;
        }
        if let Some(t) = self.r#type {
            inv.r#type = t;
        }
        if let Some(amount) = self.initial_amount {
            inv.initial_amount = amount;
        }
        if let Some(roi) = self.roi {
            inv.roi = roi;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    pub category: String,
    pub limit: Decimal,
}

impl BudgetDraft {
    pub(crate) fn validated(self) -> Result<Self> {
        let category = required_text("category", &self.category)?;
        non_negative("limit", self.limit)?;
        Ok(Self { category, ..self })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: Decimal,
    pub current_saved: Option<Decimal>,
}

impl GoalDraft {
    pub(crate) fn validated(self) -> Result<Self> {
        let name = required_text("name", &self.name)?;
        non_negative("target amount", self.target_amount)?;
        let saved = self.current_saved.unwrap_or(Decimal::ZERO);
        non_negative("saved amount", saved)?;
        Ok(Self {
            name,
            current_saved: Some(saved),
            ..self
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillDraft {
    pub name: String,
    pub date: u8,
    pub amount: Decimal,
}

impl BillDraft {
    pub(crate) fn validated(self) -> Result<Self> {
        let name = required_text("name", &self.name)?;
        if !(1..=31).contains(&self.date) {
            return Err(FinanceError::Invalid(format!(
                "due day {} is outside 1-31",
                self.date
            )));
        }
        non_negative("amount", self.amount)?;
        Ok(Self { name, ..self })
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(FinanceError::Invalid(format!("{} must not be empty", field)));
    }
    Ok(v.to_string())
}

/// Amounts are stored as JSON numbers (f64), which hold this many
/// significant decimal digits exactly.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 15;

fn storable(field: &str, value: Decimal) -> Result<()> {
    let digits = value
        .normalize()
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(1, |l| l + 1);
    if digits > MAX_SIGNIFICANT_DIGITS {
        return Err(FinanceError::Invalid(format!(
            "{} has more than {} significant digits (got {})",
            field, MAX_SIGNIFICANT_DIGITS, value
        )));
    }
    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> Result<()> {
    storable(field, value)?;
    if value < Decimal::ZERO {
        return Err(FinanceError::Invalid(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(())
}

fn positive(field: &str, value: Decimal) -> Result<()> {
    storable(field, value)?;
    if value <= Decimal::ZERO {
        return Err(FinanceError::Invalid(format!(
            "{} must be greater than zero (got {})",
            field, value
        )));
    }
    Ok(())
}

/// Preset expense categories offered by the entry form. Free text is still allowed.
pub const EXPENSE_CATEGORIES: [&str; 6] = [
    "Daily Operations",
    "Bills & Utilities",
    "Transport & Logistics",
    "Lifestyle & Entertainment",
    "Health & Insurance",
    "Other / Miscellaneous",
];

pub const INCOME_CATEGORIES: [&str; 4] = [
    "Salary",
    "Business Profit",
    "Dividends / Investment",
    "Freelance",
];

pub fn preset_categories(t: TxType) -> &'static [&'static str] {
    match t {
        TxType::Income => &INCOME_CATEGORIES,
        TxType::Expense => &EXPENSE_CATEGORIES,
    }
}
