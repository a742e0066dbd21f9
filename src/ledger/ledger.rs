use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, TrackerError};

use super::transaction::{Transaction, TransactionKind};

/// The authoritative in-memory state: every recorded transaction plus the
/// monthly budget.
///
/// Transactions are kept newest-first. A budget of zero means unset. The
/// ledger is constructed and owned by the application context; persistence
/// only mirrors it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budget: f64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and records a new transaction at the head of the sequence,
    /// returning a copy of the stored entry.
    pub fn add_transaction(
        &mut self,
        category: &str,
        amount: f64,
        kind: TransactionKind,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<Transaction> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TrackerError::Validation(
                "category must not be empty".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TrackerError::Validation(
                "amount must be a positive number".into(),
            ));
        }
        let description = description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let transaction = Transaction::new(category, amount, kind, date, description);
        debug!(id = %transaction.id, category, amount, kind = %kind, "transaction recorded");
        self.transactions.insert(0, transaction.clone());
        Ok(transaction)
    }

    /// Removes the transaction with the given id. Unknown ids are a no-op;
    /// the return value reports whether anything was removed.
    pub fn delete_transaction(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id != id);
        let removed = self.transactions.len() != before;
        if removed {
            debug!(%id, "transaction deleted");
        }
        removed
    }

    /// Read-only lookup backing the edit flow. The caller re-adds a modified
    /// copy and deletes the original, so an edited transaction always gets a
    /// fresh id and moves to the head of the sequence.
    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sets the monthly budget. Zero or negative values are rejected;
    /// clearing the budget goes through [`Ledger::clear_all`] or
    /// [`Ledger::replace_state`].
    pub fn set_budget(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(TrackerError::Validation(
                "budget must be a positive number".into(),
            ));
        }
        self.budget = amount;
        Ok(())
    }

    /// Resets the ledger to its empty state.
    pub fn clear_all(&mut self) {
        self.transactions.clear();
        self.budget = 0.0;
    }

    /// Wholesale replacement used by import and load.
    ///
    /// Entries violating the positive-amount invariant are dropped, duplicate
    /// ids keep their first occurrence, soft-delete markers reset to `false`,
    /// and an invalid budget normalizes to zero (unset).
    pub fn replace_state(&mut self, transactions: Vec<Transaction>, budget: f64) {
        let total = transactions.len();
        let mut seen = HashSet::new();
        let mut accepted: Vec<Transaction> = transactions
            .into_iter()
            .filter(|txn| txn.amount.is_finite() && txn.amount > 0.0)
            .filter(|txn| seen.insert(txn.id.clone()))
            .collect();
        for txn in &mut accepted {
            txn.deleted = false;
        }
        let dropped = total - accepted.len();
        if dropped > 0 {
            debug!(dropped, "discarded entries while replacing ledger state");
        }
        self.transactions = accepted;
        self.budget = if budget.is_finite() && budget > 0.0 {
            budget
        } else {
            0.0
        };
    }
}
