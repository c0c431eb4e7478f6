mod client;
mod error;
mod inflight;
mod service;

pub use client::HttpDictionaryClient;
pub use error::DictionaryError;
pub use inflight::InFlight;
pub use service::{DictionaryService, PartOfSpeechRepository};
