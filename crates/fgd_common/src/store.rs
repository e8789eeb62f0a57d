use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use walkdir::WalkDir;

use crate::types::{ClassRecord, RECORD_FIELDS};
use crate::{jsonc, FgdError, Result};

/// Source sub-directories scanned for definitions, in load order.
pub const SOURCE_DIRS: &[&str] = &["base", "entities"];

/// Sentence file expected at the source root.
pub const SENTENCES_FILE: &str = "sentences.json";

/// Table of class records keyed by class name.
///
/// The table loaded at startup is treated as immutable; generation passes
/// work on a clone and remove records from it as they are emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: BTreeMap<String, ClassRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` file under `<root>/base` and `<root>/entities`.
    /// Files that fail to read or parse are logged and skipped.
    pub fn load_dir(root: &Path) -> Self {
        let mut store = Self::new();
        let mut files = 0usize;
        let mut failed = 0usize;

        for side in SOURCE_DIRS {
            let dir = root.join(side);
            if !dir.exists() {
                tracing::warn!(path = %dir.display(), "Source directory does not exist");
                continue;
            }

            for entry in WalkDir::new(&dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| match e {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::error!("Failed to walk {}: {}", dir.display(), e);
                        None
                    }
                })
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
            {
                let path = entry.path();
                files += 1;

                let result = std::fs::read_to_string(path)
                    .map_err(|e| FgdError::io(path, e))
                    .and_then(|content| store.add_document(path, &content));

                if let Err(e) = result {
                    failed += 1;
                    tracing::error!("{}", e);
                }
            }
        }

        tracing::info!(files, failed, records = store.len(), "Loaded class definitions");
        store
    }

    /// Build a store from in-memory documents given as `(file name, text)`.
    /// Malformed documents are logged and skipped.
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut store = Self::new();
        for (file_name, content) in documents {
            if let Err(e) = store.add_document(Path::new(file_name), content) {
                tracing::error!("{}", e);
            }
        }
        store
    }

    /// Parse one JSONC document and merge its records. A document holding
    /// record fields at top level is a single record named after the file
    /// stem; otherwise each object entry is a record named by its key.
    /// Returns the number of records added.
    pub fn add_document(&mut self, path: &Path, content: &str) -> Result<usize> {
        let value = jsonc::parse(path, content)?;
        let Value::Object(object) = value else {
            return Err(FgdError::NotAnObject(path.to_path_buf()));
        };

        let is_single_record = RECORD_FIELDS.iter().any(|field| object.contains_key(*field));

        if is_single_record {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FgdError::InvalidFileName(path.to_path_buf()))?;
            self.insert(ClassRecord::from_json(name, &object));
            return Ok(1);
        }

        let mut added = 0;
        for (name, entry) in &object {
            if name == "$schema" {
                continue;
            }
            match entry {
                Value::Object(record) => {
                    self.insert(ClassRecord::from_json(name, record));
                    added += 1;
                }
                _ => tracing::warn!(
                    path = %path.display(),
                    entry = %name,
                    "Ignoring non-object entry"
                ),
            }
        }
        Ok(added)
    }

    /// Insert a record, replacing (and returning) any previous definition of the same name.
    pub fn insert(&mut self, record: ClassRecord) -> Option<ClassRecord> {
        let previous = self.records.insert(record.name.clone(), record);
        if let Some(previous) = &previous {
            tracing::warn!(
                class = %previous.name,
                "Class defined more than once, keeping the last definition"
            );
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ClassRecord> {
        self.records.remove(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Class names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &ClassRecord> {
        self.records.values()
    }
}

impl FromIterator<ClassRecord> for RecordStore {
    fn from_iter<T: IntoIterator<Item = ClassRecord>>(iter: T) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}
