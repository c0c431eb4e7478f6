use std::env;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const DEFAULT_PINYIN_INDEXES: &[&str] = &["a", "ai", "an", "ang", "ao"];

fn default_type() -> String {
    "core".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Dictionary category used when the route does not name one
    #[serde(default = "default_type")]
    pub default_type: String,
    pub pinyin_indexes: PinyinIndexTable,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            default_type: default_type(),
            pinyin_indexes: PinyinIndexTable::default(),
        }
    }
}

impl DictionaryConfig {
    pub fn new() -> Self {
        let default_type = env::var("DICTIONARY_TYPE").unwrap_or_else(|_| default_type());

        let pinyin_indexes = env::var("PINYIN_INDEXES")
            .ok()
            .map(|v| PinyinIndexTable::parse(&v))
            .filter(|table| !table.is_empty())
            .unwrap_or_default();

        Self {
            default_type,
            pinyin_indexes,
        }
    }
}

/// Valid pinyin syllable indexes, fixed once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PinyinIndexTable(Arc<[String]>);

impl PinyinIndexTable {
    pub fn new<I, S>(indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(indexes.into_iter().map(Into::into).collect())
    }

    /// Parse a comma separated list, blank entries are dropped
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim).filter(|s| !s.is_empty()))
    }

    pub fn contains(&self, index: &str) -> bool {
        self.0.iter().any(|i| i == index)
    }

    /// Longest index that prefixes `pinyin`
    pub fn index_for(&self, pinyin: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|index| pinyin.starts_with(index.as_str()))
            .max_by_key(|index| index.len())
            .map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

impl Default for PinyinIndexTable {
    fn default() -> Self {
        Self::new(DEFAULT_PINYIN_INDEXES.iter().copied())
    }
}

impl Deref for PinyinIndexTable {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for PinyinIndexTable {
    fn from(indexes: Vec<String>) -> Self {
        Self(indexes.into())
    }
}

impl From<PinyinIndexTable> for Vec<String> {
    fn from(table: PinyinIndexTable) -> Self {
        table.to_vec()
    }
}
