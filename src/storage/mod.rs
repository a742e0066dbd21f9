//! Persistence gateway: whole-state JSON snapshots of the ledger.
//!
//! The stored blob only mirrors the in-memory ledger; it is overwritten in
//! full on every save and never holds independent state.

pub mod json_backend;

pub use json_backend::{
    export_json, export_to_path, import_from_path, import_json, JsonStorage,
    DEFAULT_EXPORT_FILE_NAME,
};
