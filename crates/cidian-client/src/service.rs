use cidian_types::{Concept, WordItem};

use crate::DictionaryError;

/// Queries against the dictionary backend
#[async_trait::async_trait]
pub trait DictionaryService: Send + Sync {
    /// Part-of-speech concepts, `GET /concept`
    async fn fetch_concept_list(&self) -> Result<Vec<Concept>, DictionaryError>;

    /// Head characters for a pinyin, in backend order
    async fn fetch_word_heads(
        &self,
        dictionary_type: &str,
        pinyin: &str,
    ) -> Result<Vec<String>, DictionaryError>;

    /// Entries grouped under a head character, in backend order
    async fn fetch_word_items(
        &self,
        dictionary_type: &str,
        head: &str,
    ) -> Result<Vec<WordItem>, DictionaryError>;
}

/// Part-of-speech reference data
#[async_trait::async_trait]
pub trait PartOfSpeechRepository: Send + Sync {
    async fn concepts(&self) -> Result<Vec<Concept>, DictionaryError>;
}
