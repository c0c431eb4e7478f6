use serde::{Deserialize, Serialize};

/// Parameters of the current navigation, supplied by the router
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteParams {
    /// Dictionary category, e.g. "core"
    #[serde(rename = "type")]
    pub dictionary_type: String,
    /// Pinyin index selected in the index bar
    pub index: String,
    pub pinyin: String,
    #[serde(rename = "wordHead")]
    pub word_head: String,
}

impl RouteParams {
    pub fn new(
        dictionary_type: impl Into<String>,
        index: impl Into<String>,
        pinyin: impl Into<String>,
        word_head: impl Into<String>,
    ) -> Self {
        Self {
            dictionary_type: dictionary_type.into(),
            index: index.into(),
            pinyin: pinyin.into(),
            word_head: word_head.into(),
        }
    }
}

/// A single dictionary entry under a word head.
///
/// Only `word` is guaranteed by the backend, anything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordItem {
    pub word: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WordItem {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Part-of-speech reference record, shape owned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Concept(pub serde_json::Value);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Fields of the view that are filled by a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    WordHeads,
    WordItems,
    Concepts,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::WordHeads => "word heads",
            Field::WordItems => "word items",
            Field::Concepts => "concepts",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewStatus {
    pub word_heads: LoadState,
    pub word_items: LoadState,
    pub concepts: LoadState,
}

impl ViewStatus {
    pub fn get(&self, field: Field) -> &LoadState {
        match field {
            Field::WordHeads => &self.word_heads,
            Field::WordItems => &self.word_items,
            Field::Concepts => &self.concepts,
        }
    }

    pub fn set(&mut self, field: Field, state: LoadState) {
        match field {
            Field::WordHeads => self.word_heads = state,
            Field::WordItems => self.word_items = state,
            Field::Concepts => self.concepts = state,
        }
    }

    /// No fetch is outstanding
    pub fn is_settled(&self) -> bool {
        [&self.word_heads, &self.word_items, &self.concepts]
            .iter()
            .all(|state| **state != LoadState::Pending)
    }

    pub fn any_failed(&self) -> bool {
        self.word_heads.is_failed() || self.word_items.is_failed() || self.concepts.is_failed()
    }
}

/// State exposed to the renderer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DictionaryView {
    pub route: RouteParams,
    pub pinyin_indexes: Vec<String>,
    pub word_heads: Vec<String>,
    pub word_items: Vec<WordItem>,
    pub concepts: Vec<Concept>,
    pub status: ViewStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_params_use_router_names() {
        let route: RouteParams = serde_json::from_str(
            r#"{"type":"core","index":"a","pinyin":"a","wordHead":"啊"}"#,
        )
        .unwrap();

        assert_eq!(route, RouteParams::new("core", "a", "a", "啊"));
    }

    #[test]
    fn word_item_keeps_unknown_fields() {
        let item: WordItem =
            serde_json::from_str(r#"{"word":"啊呀","pinyin":"a ya"}"#).unwrap();

        assert_eq!(item.word, "啊呀");
        assert_eq!(item.extra["pinyin"], "a ya");
        assert_eq!(serde_json::to_value(&item).unwrap()["pinyin"], "a ya");
    }

    #[test]
    fn status_tracks_fields_independently() {
        let mut status = ViewStatus::default();
        status.set(Field::WordItems, LoadState::Failed("HTTP 500".to_string()));

        assert_eq!(status.get(Field::WordHeads), &LoadState::Pending);
        assert!(status.get(Field::WordItems).is_failed());
        assert!(status.any_failed());
    }
}
