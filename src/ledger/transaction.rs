use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded income or expense event.
///
/// Transactions are immutable once created: the edit flow deletes the
/// original and re-adds a replacement under a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Soft-delete marker retained for storage-blob compatibility.
    /// Always `false`; normalized back to `false` on import.
    #[serde(default)]
    pub deleted: bool,
}

impl Transaction {
    pub fn new(
        category: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        date: NaiveDate,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category: category.into(),
            amount,
            kind,
            date,
            description,
            deleted: false,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Direction of a transaction: money coming in or going out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_serialize_lowercase() {
        let json = serde_json::to_string(&TransactionKind::Income).unwrap();
        assert_eq!(json, "\"income\"");
        let parsed: TransactionKind = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(parsed, TransactionKind::Expense);
    }

    #[test]
    fn parse_accepts_mixed_case_and_rejects_unknown() {
        assert_eq!(TransactionKind::parse(" Income "), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("EXPENSE"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("transfer"), None);
    }

    #[test]
    fn new_transactions_get_distinct_ids() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let first = Transaction::new("Food", 10.0, TransactionKind::Expense, date, None);
        let second = Transaction::new("Food", 10.0, TransactionKind::Expense, date, None);
        assert_ne!(first.id, second.id);
        assert!(!first.deleted);
    }
}
