//! Persistence of the task map, notes and alerts as JSON text blobs.
//!
//! Loading never fails: a missing or unreadable blob yields an empty
//! collection and a warning in the log. A record that does not parse is
//! dropped on its own, and a blob that does not parse at all is set aside
//! under `<key>.corrupt` before anything can overwrite it. Saving reports
//! errors to the caller.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;

use crate::core::memo::{Memo, MemoList};
use crate::core::store::{TaskStore, TaskStoreState};
use crate::core::task::Task;
use crate::error::{Error, Result};

/// Storage key of the first web build; kept so its blobs still load.
pub const DEFAULT_STORAGE_KEY: &str = "faz_acleal_boston_v1";

/// String blobs addressed by key.
pub trait KeyValueStorage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Keep a copy of the blob under `key` at `<key>.corrupt`.
    fn preserve(&mut self, key: &str) -> Result<()> {
        if let Some(text) = self.read(key)? {
            self.write(&format!("{key}.corrupt"), &text)?;
        }
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file and renames it over the target.
    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Renames `<key>.json` to `<key>.json.corrupt`.
    fn preserve(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::rename(&path, path.with_extension("json.corrupt")) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn encode_store(store: &TaskStore) -> Result<String> {
    serde_json::to_string(store).map_err(Error::Serialization)
}

/// A JSON `null` decodes to an empty store. Records are decoded one at a
/// time: one that does not parse is dropped with a warning and the rest of
/// its day is kept. Only text that is not a JSON object fails.
pub fn decode_store(text: &str) -> Result<TaskStore> {
    let days: Option<BTreeMap<String, Value>> =
        serde_json::from_str(text).map_err(Error::Deserialization)?;

    let mut state = TaskStoreState::new();
    for (key, day) in days.unwrap_or_default() {
        let records = match day {
            Value::Array(records) => records,
            Value::Null => continue,
            _ => {
                log::warn!("Dropping day {} that is not a list of tasks", key);
                continue;
            }
        };
        for record in records {
            match serde_json::from_value::<Task>(record) {
                Ok(task) => {
                    let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d").unwrap_or(task.date);
                    state.entry(date).or_default().push(task);
                }
                Err(e) => log::warn!("Dropping unreadable task under {}: {}", key, e),
            }
        }
    }
    Ok(TaskStore::from_state(state))
}

pub fn encode_memos(memos: &MemoList) -> Result<String> {
    serde_json::to_string(memos).map_err(Error::Serialization)
}

/// Same leniency as [`decode_store`]: unreadable entries are dropped one by
/// one, then the list is repaired by [`MemoList::from_items`].
pub fn decode_memos(text: &str) -> Result<MemoList> {
    let records: Option<Vec<Value>> = serde_json::from_str(text).map_err(Error::Deserialization)?;
    let memos = records
        .unwrap_or_default()
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Memo>(record) {
            Ok(memo) => Some(memo),
            Err(e) => {
                log::warn!("Dropping unreadable memo: {}", e);
                None
            }
        })
        .collect();
    Ok(MemoList::from_items(memos))
}

/// Loads and saves the agenda collections under `<key>`, `<key>_notes` and
/// `<key>_alerts`.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> PersistenceAdapter<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn notes_key(&self) -> String {
        format!("{}_notes", self.key)
    }

    fn alerts_key(&self) -> String {
        format!("{}_alerts", self.key)
    }

    pub fn load(&mut self) -> TaskStore {
        let key = self.key.clone();
        self.load_or_default(&key, decode_store)
    }

    pub fn save(&mut self, store: &TaskStore) -> Result<()> {
        let text = encode_store(store)?;
        self.storage.write(&self.key, &text)
    }

    pub fn load_notes(&mut self) -> MemoList {
        let key = self.notes_key();
        self.load_or_default(&key, decode_memos)
    }

    pub fn save_notes(&mut self, notes: &MemoList) -> Result<()> {
        let text = encode_memos(notes)?;
        let key = self.notes_key();
        self.storage.write(&key, &text)
    }

    pub fn load_alerts(&mut self) -> MemoList {
        let key = self.alerts_key();
        self.load_or_default(&key, decode_memos)
    }

    pub fn save_alerts(&mut self, alerts: &MemoList) -> Result<()> {
        let text = encode_memos(alerts)?;
        let key = self.alerts_key();
        self.storage.write(&key, &text)
    }

    /// A blob that fails to decode is preserved before the empty default is
    /// handed out, so the next save cannot destroy it.
    fn load_or_default<T: Default>(&mut self, key: &str, decode: fn(&str) -> Result<T>) -> T {
        match self.storage.read(key) {
            Ok(Some(text)) => decode(&text).unwrap_or_else(|e| {
                log::warn!("Setting aside unreadable data under {}: {}", key, e);
                if let Err(e) = self.storage.preserve(key) {
                    log::error!("Failed to preserve {}: {}", key, e);
                }
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Failed to read {}: {}", key, e);
                T::default()
            }
        }
    }
}
