//! Ledger domain models and mutation operations.

pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;

pub use category::{is_suggested, SUGGESTED_CATEGORIES};
pub use ledger::Ledger;
pub use transaction::{Transaction, TransactionKind};
