//! Translation lookup.
//!
//! The host hands over flat keys (`"l10n.elements"`, `"a11y/toolbarLabel"`);
//! they are split on `.` or `/` into a nested tree and looked up the same way.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dictionary {
    root: Map<String, Value>,
}

fn split_key(key: &str) -> impl Iterator<Item = &str> {
    key.split(['.', '/']).filter(|s| !s.is_empty())
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one translation under a flat key, creating intermediate levels.
    pub fn insert(&mut self, key: &str, text: impl Into<String>) {
        let parts: Vec<&str> = split_key(key).collect();
        let Some((last, path)) = parts.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for part in path {
            let entry = current
                .entry((*part).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            current = next;
        }
        current.insert((*last).to_string(), Value::String(text.into()));
    }

    /// Merge translations. Nested objects and flat keys may be mixed.
    pub fn fill(&mut self, translations: &Map<String, Value>) {
        self.fill_prefixed("", translations);
    }

    fn fill_prefixed(&mut self, prefix: &str, translations: &Map<String, Value>) {
        for (key, value) in translations {
            let full = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                Value::Object(nested) => self.fill_prefixed(&full, nested),
                Value::String(text) => self.insert(&full, text.as_str()),
                other => self.insert(&full, other.to_string()),
            }
        }
    }

    /// Translation for `key`, or `None` when missing.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let mut parts = split_key(key).peekable();
        let mut current = &self.root;
        while let Some(part) = parts.next() {
            let value = current.get(part)?;
            if parts.peek().is_none() {
                return value.as_str();
            }
            current = value.as_object()?;
        }
        None
    }

    /// Translation for `key`, falling back to the key itself.
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }
}

impl<'de> Deserialize<'de> for Dictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut dict = Dictionary::new();
        dict.fill(&map);
        Ok(dict)
    }
}
