use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maps a request category to the interviewer flag required to take it.
/// Keys and flags are stored lower-case, lookups ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    entries: BTreeMap<String, String>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("generalist", "generalist");
        table.insert("engineering", "engineering");
        table
    }
}

impl CategoryTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces a mapping
    pub fn insert(&mut self, category: &str, flag: &str) {
        self.entries
            .insert(normalize(category), normalize(flag));
    }

    /// Parses a "REQUEST=FLAG" mapping and adds it
    pub fn insert_spec(&mut self, spec: &str) -> Result<(), ConfigError> {
        let (category, flag) = spec
            .split_once('=')
            .filter(|(c, f)| !c.trim().is_empty() && !f.trim().is_empty())
            .ok_or_else(|| ConfigError::InvalidCategoryMapping(spec.to_string()))?;
        self.insert(category, flag);
        Ok(())
    }

    /// Flag an interviewer must carry to take a request of `category`
    pub fn required_flag(&self, category: &str) -> Option<&str> {
        self.entries.get(&normalize(category)).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for CategoryTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::empty();
        for (category, flag) in iter {
            table.insert(category.as_ref(), flag.as_ref());
        }
        table
    }
}

/// Lower-case and trimmed, the form flags and categories are compared in
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
