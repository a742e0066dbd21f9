use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    errors::{Result, TrackerError},
    ledger::Ledger,
};

const DATA_DIR_NAME: &str = ".finance_core";
const DATA_FILE_NAME: &str = "finance.json";
const HOME_ENV: &str = "FINANCE_CORE_HOME";
const TMP_SUFFIX: &str = "tmp";

/// Default file name offered when exporting a snapshot for sharing.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "finance-data.json";

/// File-backed persistence for the single tracked ledger.
///
/// State lives in one JSON blob at a fixed path under the data directory.
/// The in-memory ledger stays authoritative even when a write fails.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_file: PathBuf,
}

impl JsonStorage {
    /// Storage rooted at the application data directory:
    /// `$FINANCE_CORE_HOME` when set, `~/.finance_core` otherwise.
    pub fn new_default() -> Result<Self> {
        Self::new(app_data_dir())
    }

    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        Ok(Self {
            data_file: root.join(DATA_FILE_NAME),
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Serializes the ledger and overwrites the stored blob atomically by
    /// staging to a temporary file first.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)
            .map_err(|err| TrackerError::Storage(err.to_string()))?;
        write_atomic(&self.data_file, &json)?;
        debug!(path = %self.data_file.display(), "ledger saved");
        Ok(())
    }

    /// Restores the stored ledger.
    ///
    /// A missing blob yields the default empty state. An unreadable or
    /// corrupt blob also yields the default state, paired with the
    /// recoverable error so the caller can surface it.
    pub fn load_or_default(&self) -> (Ledger, Option<TrackerError>) {
        if !self.data_file.exists() {
            return (Ledger::new(), None);
        }
        match self.try_load() {
            Ok(ledger) => (ledger, None),
            Err(err) => {
                warn!(path = %self.data_file.display(), %err, "stored ledger unreadable, starting empty");
                (Ledger::new(), Some(err))
            }
        }
    }

    fn try_load(&self) -> Result<Ledger> {
        let data = fs::read_to_string(&self.data_file)
            .map_err(|err| TrackerError::Storage(err.to_string()))?;
        let raw: Ledger = serde_json::from_str(&data)
            .map_err(|err| TrackerError::Storage(err.to_string()))?;
        let mut ledger = Ledger::new();
        ledger.replace_state(raw.transactions, raw.budget);
        Ok(ledger)
    }
}

/// Renders a ledger as the pretty JSON snapshot offered for download.
pub fn export_json(ledger: &Ledger) -> Result<String> {
    serde_json::to_string_pretty(ledger).map_err(|err| TrackerError::Storage(err.to_string()))
}

/// Writes an export snapshot to an arbitrary path.
pub fn export_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = export_json(ledger)?;
    write_atomic(path, &json)?;
    debug!(path = %path.display(), "snapshot exported");
    Ok(())
}

/// Parses an exported snapshot.
///
/// Missing `transactions`/`budget` keys fall back to empty/zero; anything
/// that is not the expected shape is a parse failure. The result is
/// normalized the same way as a state replacement.
pub fn import_json(data: &str) -> Result<Ledger> {
    let raw: Ledger = serde_json::from_str(data)?;
    let mut ledger = Ledger::new();
    ledger.replace_state(raw.transactions, raw.budget);
    Ok(ledger)
}

/// Reads and parses a snapshot file.
pub fn import_from_path(path: &Path) -> Result<Ledger> {
    let data =
        fs::read_to_string(path).map_err(|err| TrackerError::Storage(err.to_string()))?;
    import_json(&data)
}

fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| TrackerError::Storage(err.to_string()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = fs::File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionKind;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(temp.path().to_path_buf()).expect("json storage");
        (storage, temp)
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .add_transaction(
                "Food",
                200.0,
                TransactionKind::Expense,
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                Some("groceries".into()),
            )
            .expect("valid transaction");
        ledger.set_budget(1000.0).expect("valid budget");
        ledger
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = sample_ledger();
        storage.save(&ledger).expect("save ledger");
        let (loaded, warning) = storage.load_or_default();
        assert!(warning.is_none());
        assert_eq!(loaded.transaction_count(), 1);
        assert_eq!(loaded.budget, 1000.0);
        assert_eq!(loaded.transactions[0].category, "Food");
    }

    #[test]
    fn missing_blob_loads_default_without_warning() {
        let (storage, _guard) = storage_with_temp_dir();
        let (loaded, warning) = storage.load_or_default();
        assert!(warning.is_none());
        assert!(loaded.is_empty());
        assert_eq!(loaded.budget, 0.0);
    }

    #[test]
    fn corrupt_blob_loads_default_with_warning() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.data_file(), "{definitely not json").expect("write corrupt blob");
        let (loaded, warning) = storage.load_or_default();
        assert!(matches!(warning, Some(TrackerError::Storage(_))));
        assert!(loaded.is_empty());
    }

    #[test]
    fn export_then_import_roundtrips() {
        let ledger = sample_ledger();
        let json = export_json(&ledger).expect("export");
        let imported = import_json(&json).expect("import");
        assert_eq!(imported.transactions, ledger.transactions);
        assert_eq!(imported.budget, ledger.budget);
    }

    #[test]
    fn import_rejects_invalid_json() {
        let err = import_json("{not valid json").unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn import_rejects_wrong_shape() {
        let err = import_json("{\"transactions\": 5}").unwrap_err();
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn import_defaults_missing_keys() {
        let imported = import_json("{}").expect("empty object imports");
        assert!(imported.is_empty());
        assert_eq!(imported.budget, 0.0);
    }

    #[test]
    fn import_normalizes_deleted_flags() {
        let json = r#"{
            "transactions": [{
                "id": "1704067200000",
                "category": "Food",
                "amount": 20.0,
                "type": "expense",
                "date": "2024-01-01",
                "description": "",
                "deleted": true
            }],
            "budget": 500
        }"#;
        let imported = import_json(json).expect("import");
        assert_eq!(imported.transaction_count(), 1);
        assert!(!imported.transactions[0].deleted);
        assert_eq!(imported.budget, 500.0);
    }
}
