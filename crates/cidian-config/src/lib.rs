use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::dictionary::DictionaryConfig;

pub mod api;
pub mod dictionary;

pub use self::dictionary::PinyinIndexTable;

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub dictionary: DictionaryConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            api: ApiConfig::new(),
            dictionary: DictionaryConfig::new(),
        }
    }
}
