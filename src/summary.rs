//! Read-only aggregate views over the ledger.
//!
//! Everything here is a pure function of the ledger (plus an explicit
//! reference date where "now" matters); nothing mutates state.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ledger::{Ledger, Transaction, TransactionKind};

/// Current-month spending measured against the configured budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
}

/// Per-category sums with the share of overall spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub percent: f64,
}

/// Aggregate expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Orderings accepted by transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Latest,
    Oldest,
    AmountHigh,
    AmountLow,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "latest" => Some(Self::Latest),
            "oldest" => Some(Self::Oldest),
            "amount-high" => Some(Self::AmountHigh),
            "amount-low" => Some(Self::AmountLow),
            _ => None,
        }
    }
}

pub fn total_income(ledger: &Ledger) -> f64 {
    ledger
        .transactions
        .iter()
        .filter(|txn| txn.is_income())
        .map(|txn| txn.amount)
        .sum()
}

pub fn total_expense(ledger: &Ledger) -> f64 {
    ledger
        .transactions
        .iter()
        .filter(|txn| txn.is_expense())
        .map(|txn| txn.amount)
        .sum()
}

pub fn balance(ledger: &Ledger) -> f64 {
    total_income(ledger) - total_expense(ledger)
}

/// Expense total for transactions dated in the same calendar month and year
/// as `today`.
pub fn month_expense(ledger: &Ledger, today: NaiveDate) -> f64 {
    ledger
        .transactions
        .iter()
        .filter(|txn| {
            txn.is_expense()
                && txn.date.month() == today.month()
                && txn.date.year() == today.year()
        })
        .map(|txn| txn.amount)
        .sum()
}

/// Budget view for the month containing `today`, or `None` while no budget
/// is set (callers hide the budget display entirely).
pub fn budget_progress(ledger: &Ledger, today: NaiveDate) -> Option<BudgetProgress> {
    if ledger.budget <= 0.0 {
        return None;
    }
    let spent = month_expense(ledger, today);
    Some(BudgetProgress {
        budget: ledger.budget,
        spent,
        remaining: (ledger.budget - spent).max(0.0),
        percentage: (spent / ledger.budget * 100.0).min(100.0),
    })
}

/// Income and expense sums per distinct category, in first-encounter order.
///
/// A category carrying both kinds is classified as income (income sums take
/// precedence), and its displayed amount is the classified side's sum. The
/// percentage is the amount's share of overall expenses, rounded to one
/// decimal, and zero whenever there are no expenses at all.
pub fn category_breakdown(ledger: &Ledger) -> Vec<CategoryBreakdown> {
    let mut sums: Vec<(String, f64, f64)> = Vec::new();
    for txn in &ledger.transactions {
        let index = match sums.iter().position(|(name, ..)| *name == txn.category) {
            Some(index) => index,
            None => {
                sums.push((txn.category.clone(), 0.0, 0.0));
                sums.len() - 1
            }
        };
        match txn.kind {
            TransactionKind::Income => sums[index].1 += txn.amount,
            TransactionKind::Expense => sums[index].2 += txn.amount,
        }
    }

    let overall_expense = total_expense(ledger);
    sums.into_iter()
        .map(|(category, income, expense)| {
            let kind = if income > 0.0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let amount = match kind {
                TransactionKind::Income => income,
                TransactionKind::Expense => expense,
            };
            let percent = if overall_expense > 0.0 {
                round_one_decimal(amount / overall_expense * 100.0)
            } else {
                0.0
            };
            CategoryBreakdown {
                category,
                kind,
                amount,
                percent,
            }
        })
        .collect()
}

/// Expense totals per category, largest first, truncated to `limit`.
///
/// Every category present in the ledger gets an entry (income-only ones sum
/// to zero), and ties keep first-encounter insertion order.
pub fn top_expense_categories(ledger: &Ledger, limit: usize) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for txn in &ledger.transactions {
        let index = match totals.iter().position(|entry| entry.category == txn.category) {
            Some(index) => index,
            None => {
                totals.push(CategoryTotal {
                    category: txn.category.clone(),
                    total: 0.0,
                });
                totals.len() - 1
            }
        };
        if txn.is_expense() {
            totals[index].total += txn.amount;
        }
    }
    totals.sort_by(|a, b| compare_amounts(b.total, a.total));
    totals.truncate(limit);
    totals
}

/// Applies the listing filter and ordering without touching ledger state.
///
/// `kind` of `None` passes everything through; `sort` of `None` preserves the
/// ledger's newest-first order. All sorts are stable.
pub fn filter_and_sort(
    transactions: &[Transaction],
    kind: Option<TransactionKind>,
    sort: Option<SortKey>,
) -> Vec<Transaction> {
    let mut selected: Vec<Transaction> = transactions
        .iter()
        .filter(|txn| kind.map_or(true, |wanted| txn.kind == wanted))
        .cloned()
        .collect();
    match sort {
        Some(SortKey::Latest) => selected.sort_by(|a, b| b.date.cmp(&a.date)),
        Some(SortKey::Oldest) => selected.sort_by(|a, b| a.date.cmp(&b.date)),
        Some(SortKey::AmountHigh) => selected.sort_by(|a, b| compare_amounts(b.amount, a.amount)),
        Some(SortKey::AmountLow) => selected.sort_by(|a, b| compare_amounts(a.amount, b.amount)),
        None => {}
    }
    selected
}

fn compare_amounts(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
