#![doc(test(attr(deny(warnings))))]

//! Finance Core offers the ledger, derived statistics, reporting, and
//! persistence primitives behind a single-user personal finance tracker.

pub mod cli;
pub mod errors;
pub mod ledger;
pub mod report;
pub mod storage;
pub mod summary;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}
