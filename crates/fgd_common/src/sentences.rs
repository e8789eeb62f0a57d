use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::types::scalar_text;
use crate::{jsonc, FgdError, Result};

/// Language used when the sentence file declares none.
pub const DEFAULT_LANGUAGE: &str = "english";

/// Where a resolved sentence ends up. Titles fall back to a visible
/// placeholder, descriptions to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceContext {
    Title,
    Description,
}

/// A translation problem found by [`SentenceTable::audit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceIssue {
    Missing { key: String, language: String },
    Empty { key: String, language: String },
}

/// Localized titles and descriptions: sentence key -> language -> text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceTable {
    languages: Vec<String>,
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for SentenceTable {
    fn default() -> Self {
        Self {
            languages: vec![DEFAULT_LANGUAGE.to_string()],
            groups: BTreeMap::new(),
        }
    }
}

impl SentenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the sentence document. `languages` is read from its own
    /// entry, every other object entry is a sentence group.
    pub fn from_json(value: &Value) -> Self {
        let mut table = Self::default();

        let Some(object) = value.as_object() else {
            tracing::error!("Sentence document is not a json object");
            return table;
        };

        if let Some(Value::Array(languages)) = object.get("languages") {
            let declared: Vec<String> = languages.iter().filter_map(scalar_text).collect();
            if !declared.is_empty() {
                table.languages = declared;
            }
        }

        for (key, group) in object {
            if key == "languages" || key == "$schema" {
                continue;
            }
            match group {
                Value::Object(translations) => {
                    let group = translations
                        .iter()
                        .filter_map(|(language, text)| Some((language.clone(), scalar_text(text)?)))
                        .collect();
                    table.groups.insert(key.clone(), group);
                }
                _ => tracing::warn!(key = %key, "Sentence group is not an object, ignoring"),
            }
        }

        table
    }

    /// Load the sentence file. Any failure is logged and yields an empty
    /// table so generation can still produce placeholder text.
    pub fn load(path: &Path) -> Self {
        match jsonc::read(path) {
            Ok(value) => {
                let table = Self::from_json(&value);
                tracing::info!(
                    path = %path.display(),
                    groups = table.groups.len(),
                    languages = ?table.languages,
                    "Loaded sentences"
                );
                table
            }
            Err(e) => {
                tracing::error!("{}", e);
                Self::default()
            }
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn set_languages(&mut self, languages: Vec<String>) {
        if !languages.is_empty() {
            self.languages = languages;
        }
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        language: impl Into<String>,
        text: impl Into<String>,
    ) {
        self.groups
            .entry(key.into())
            .or_default()
            .insert(language.into(), text.into());
    }

    /// Look up one translation.
    pub fn get(&self, key: &str, language: &str) -> Result<&str> {
        let group = self
            .groups
            .get(key)
            .ok_or_else(|| FgdError::MissingSentenceGroup { key: key.to_string() })?;

        group
            .get(language)
            .map(String::as_str)
            .ok_or_else(|| FgdError::MissingSentenceLanguage {
                key: key.to_string(),
                language: language.to_string(),
            })
    }

    pub fn resolver<'a>(&'a self, language: &'a str) -> SentenceResolver<'a> {
        SentenceResolver { table: self, language }
    }

    /// Report every declared language missing from, or empty in, a group.
    pub fn audit(&self) -> Vec<SentenceIssue> {
        let mut issues = Vec::new();

        for language in &self.languages {
            for (key, group) in &self.groups {
                match group.get(language) {
                    None => issues.push(SentenceIssue::Missing {
                        key: key.clone(),
                        language: language.clone(),
                    }),
                    Some(text) if text.is_empty() => issues.push(SentenceIssue::Empty {
                        key: key.clone(),
                        language: language.clone(),
                    }),
                    Some(_) => {}
                }
            }
        }

        issues
    }
}

/// Sentence lookups bound to the language of one generation pass.
#[derive(Debug, Clone, Copy)]
pub struct SentenceResolver<'a> {
    table: &'a SentenceTable,
    language: &'a str,
}

impl<'a> SentenceResolver<'a> {
    pub fn language(&self) -> &'a str {
        self.language
    }

    /// Resolve `key`. Never fails: an absent key is empty, a missing
    /// translation is logged and becomes `#key` for titles, empty otherwise.
    pub fn resolve(&self, key: Option<&str>, context: SentenceContext) -> String {
        let Some(key) = key else {
            return String::new();
        };

        match self.table.get(key, self.language) {
            Ok(text) => text.to_string(),
            Err(e) => {
                tracing::warn!("{}", e);
                match context {
                    SentenceContext::Title => format!("#{}", key),
                    SentenceContext::Description => String::new(),
                }
            }
        }
    }

    pub fn title(&self, key: Option<&str>) -> String {
        self.resolve(key, SentenceContext::Title)
    }

    pub fn description(&self, key: Option<&str>) -> String {
        self.resolve(key, SentenceContext::Description)
    }
}
