use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ledger::Ledger;
use crate::summary::{self, CategoryTotal};

/// Number of spending categories surfaced in the report.
pub const TOP_CATEGORY_COUNT: usize = 5;

/// Whole-ledger summary snapshot, ready for rendering or printing.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub transaction_count: usize,
    pub top_expense_categories: Vec<CategoryTotal>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Pure function of ledger state; the timestamp comes from the caller's
    /// clock reading at generation time.
    pub fn generate(ledger: &Ledger, generated_at: DateTime<Utc>) -> Self {
        Self {
            total_income: summary::total_income(ledger),
            total_expense: summary::total_expense(ledger),
            balance: summary::balance(ledger),
            transaction_count: ledger.transaction_count(),
            top_expense_categories: summary::top_expense_categories(ledger, TOP_CATEGORY_COUNT),
            generated_at,
        }
    }
}
