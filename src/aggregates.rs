// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over the store's collections. Nothing here is persisted;
//! every value is recomputed from the current records on demand.

use crate::models::{Budget, Goal, Investment, Transaction, TxType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Display;

/// Budgets above this utilization are flagged on status rows.
pub const BUDGET_WARN_PERCENT: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

/// Date range plus category search applied to the transaction list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub search: String,
}

impl TransactionFilter {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            start,
            end,
            search: String::new(),
        }
    }

    /// The dashboard default: the `days` days leading up to and including `today`.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        let start = today
            .checked_sub_signed(TimeDelta::days(days))
            .unwrap_or(NaiveDate::MIN);
        Self::new(start, Some(today))
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Inclusive UTC bounds: start-of-day of `start` and end-of-day
    /// (23:59:59.999) of `end`, both read as wall-clock time in `tz`.
    pub fn bounds<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Utc>, Option<DateTime<Utc>>) {
        let start = localize(tz, self.start.and_time(NaiveTime::MIN), true);
        let end = self.end.map(|d| {
            let last_ms = d.and_time(NaiveTime::MIN) + TimeDelta::days(1) - TimeDelta::milliseconds(1);
            localize(tz, last_ms, false)
        });
        (start, end)
    }

    pub fn matches<Tz: TimeZone>(&self, tx: &Transaction, tz: &Tz) -> bool {
        let (start, end) = self.bounds(tz);
        in_range(tx, start, end) && category_matches(&tx.category, &self.search)
    }

    /// Transactions passing both the date range and the search term, in store order.
    pub fn apply<'a, Tz: TimeZone>(&self, txs: &'a [Transaction], tz: &Tz) -> Vec<&'a Transaction> {
        let (start, end) = self.bounds(tz);
        let needle = self.search.to_lowercase();
        txs.iter()
            .filter(|t| in_range(t, start, end) && t.category.to_lowercase().contains(&needle))
            .collect()
    }
}

fn in_range(tx: &Transaction, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> bool {
    tx.date >= start && end.is_none_or(|e| tx.date <= e)
}

fn category_matches(category: &str, term: &str) -> bool {
    category.to_lowercase().contains(&term.to_lowercase())
}

// Ambiguous wall-clock times (DST overlap) take the widest bound. Nonexistent
// ones (DST gap) move forward minute by minute to the first time that exists.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let pick = |n: &NaiveDateTime| {
        let local = tz.from_local_datetime(n);
        if earliest {
            local.earliest()
        } else {
            local.latest()
        }
    };
    (0..=MAX_GAP_MINUTES)
        .find_map(|m| pick(&(naive + TimeDelta::minutes(m))))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

const MAX_GAP_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    pub fn of<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> Self {
        txs.into_iter().fold(Totals::default(), |mut acc, t| {
            match t.r#type {
                TxType::Income => acc.income += t.amount,
                TxType::Expense => acc.expense += t.amount,
            }
            acc
        })
    }

    pub fn net_flow(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Sum of every investment's current value.
pub fn investment_total(investments: &[Investment]) -> Decimal {
    investments.iter().map(Investment::current_value).sum()
}

/// Period cash flow plus the whole portfolio's current value.
///
/// The flow side only sees the filtered transactions while the investment
/// side is never filtered; callers rely on that split.
pub fn net_worth(totals: &Totals, investments: &[Investment]) -> Decimal {
    totals.net_flow() + investment_total(investments)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// One point per transaction, oldest first. Same-day transactions stay
/// separate points sharing a label.
pub fn chart_series<Tz>(filtered: &[&Transaction], tz: &Tz) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut ordered: Vec<&Transaction> = filtered.iter().rev().copied().collect();
    // Store order is newest-first; the stable sort only matters once dates were edited.
    ordered.sort_by_key(|t| t.date);
    ordered
        .into_iter()
        .map(|t| {
            let (income, expense) = match t.r#type {
                TxType::Income => (t.amount, Decimal::ZERO),
                TxType::Expense => (Decimal::ZERO, t.amount),
            };
            ChartPoint {
                label: t.date.with_timezone(tz).format("%-d %b").to_string(),
                income,
                expense,
            }
        })
        .collect()
}

/// `part / whole * 100`, capped at 100.
///
/// A zero `whole` yields 0 when `part` is also zero and 100 otherwise.
pub fn clamped_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return if part > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    (part / whole * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
}

/// Expense total over all transactions whose category contains the budget's
/// category, ignoring case. Containment is one-directional: a "food" budget
/// counts "Food Delivery" but a "Food Delivery" budget does not count "food".
pub fn budget_spent(budget: &Budget, txs: &[Transaction]) -> Decimal {
    let needle = budget.category.to_lowercase();
    txs.iter()
        .filter(|t| t.r#type == TxType::Expense && t.category.to_lowercase().contains(&needle))
        .map(|t| t.amount)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub id: i64,
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub percent: Decimal,
    pub warning: bool,
}

/// Utilization per budget against the full, unfiltered transaction list.
pub fn budget_statuses(budgets: &[Budget], txs: &[Transaction]) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|b| {
            let spent = budget_spent(b, txs);
            let percent = clamped_percent(spent, b.limit);
            BudgetStatus {
                id: b.id,
                category: b.category.clone(),
                limit: b.limit,
                spent,
                percent,
                warning: percent > BUDGET_WARN_PERCENT,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_saved: Decimal,
    pub percent: Decimal,
}

pub fn goal_progress(goals: &[Goal]) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|g| GoalProgress {
            id: g.id,
            name: g.name.clone(),
            target_amount: g.target_amount,
            current_saved: g.current_saved,
            percent: clamped_percent(g.current_saved, g.target_amount),
        })
        .collect()
}

/// Everything the overview screen shows for one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub transaction_count: usize,
    pub totals: Totals,
    pub investment_total: Decimal,
    pub net_worth: Decimal,
    pub series: Vec<ChartPoint>,
}

impl Dashboard {
    pub fn compute<Tz>(
        transactions: &[Transaction],
        investments: &[Investment],
        filter: &TransactionFilter,
        tz: &Tz,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let filtered = filter.apply(transactions, tz);
        let totals = Totals::of(filtered.iter().copied());
        Dashboard {
            transaction_count: filtered.len(),
            totals,
            investment_total: investment_total(investments),
            net_worth: net_worth(&totals, investments),
            series: chart_series(&filtered, tz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult};

    /// UTC-4 until 2025-04-06 04:00 UTC, UTC-3 after; local clocks skip
    /// from 00:00 straight to 01:00 that night.
    #[derive(Debug, Clone, Copy)]
    struct MidnightSpringForward;

    impl MidnightSpringForward {
        fn before() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }

        fn after() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).unwrap()
        }

        fn gap_start() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2025, 4, 6).unwrap().and_time(NaiveTime::MIN)
        }
    }

    impl TimeZone for MidnightSpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            MidnightSpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let start = Self::gap_start();
            if *local < start {
                LocalResult::Single(Self::before())
            } else if *local < start + TimeDelta::hours(1) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::after())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::gap_start() + TimeDelta::hours(4) {
                Self::before()
            } else {
                Self::after()
            }
        }
    }

    #[test]
    fn day_starting_in_dst_gap_begins_at_first_existing_time() {
        let d = NaiveDate::from_ymd_opt(2025, 4, 6).unwrap();
        let (start, end) = TransactionFilter::new(d, Some(d)).bounds(&MidnightSpringForward);
        // 01:00 local at UTC-3.
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 4, 6, 4, 0, 0).unwrap());
        assert_eq!(
            end.unwrap().to_rfc3339(),
            "2025-04-07T02:59:59.999+00:00"
        );

        let before = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();
        let (start, _) = TransactionFilter::new(before, None).bounds(&MidnightSpringForward);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 4, 5, 4, 0, 0).unwrap());
    }

    #[test]
    fn zero_denominator_sentinel() {
        assert_eq!(clamped_percent(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(clamped_percent(Decimal::from(5), Decimal::ZERO), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn percent_is_capped() {
        assert_eq!(
            clamped_percent(Decimal::from(1500), Decimal::from(1000)),
            Decimal::ONE_HUNDRED
        );
        assert_eq!(
            clamped_percent(Decimal::from(250), Decimal::from(1000)),
            Decimal::from(25)
        );
    }

    #[test]
    fn end_bound_is_last_millisecond_of_day() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let (start, end) = TransactionFilter::new(d, Some(d)).bounds(&Utc);
        assert_eq!(start.to_rfc3339(), "2025-03-09T00:00:00+00:00");
        assert_eq!(
            end.unwrap().format("%H:%M:%S%.3f").to_string(),
            "23:59:59.999"
        );
    }
}
