use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use cidian_client::{DictionaryError, DictionaryService, PartOfSpeechRepository};
use cidian_config::PinyinIndexTable;
use cidian_types::{DictionaryView, Field, LoadState, RouteParams, ViewStatus};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::preprocess::{normalize, normalize_route};

type Apply<T> = fn(&mut DictionaryView, Vec<T>);

/// Controller behind the core dictionary page.
///
/// Construction publishes the pinyin index table and starts every fetch the
/// page needs. Each fetched field has a single writer at a time; starting a
/// new fetch for a field retires the previous one.
pub struct CoreDictionaryController {
    dictionary: Arc<dyn DictionaryService>,
    part_of_speech: Arc<dyn PartOfSpeechRepository>,
    pinyin_indexes: PinyinIndexTable,
    view: Arc<watch::Sender<DictionaryView>>,
    writers: Mutex<HashMap<Field, CancellationToken>>,
    cancel_token: CancellationToken,
}

impl CoreDictionaryController {
    /// Must be called from within a tokio runtime
    pub fn new(
        route: RouteParams,
        dictionary: Arc<dyn DictionaryService>,
        part_of_speech: Arc<dyn PartOfSpeechRepository>,
        pinyin_indexes: PinyinIndexTable,
    ) -> Self {
        let route = normalize_route(route);

        if !route.index.is_empty() && !pinyin_indexes.contains(&route.index) {
            tracing::warn!("Route index '{}' is not a known pinyin index", route.index);
        }

        let view = DictionaryView {
            route: route.clone(),
            pinyin_indexes: pinyin_indexes.to_vec(),
            word_heads: Vec::new(),
            word_items: Vec::new(),
            concepts: Vec::new(),
            status: ViewStatus::default(),
        };

        let controller = Self {
            dictionary,
            part_of_speech,
            pinyin_indexes,
            view: Arc::new(watch::Sender::new(view)),
            writers: Mutex::new(HashMap::new()),
            cancel_token: CancellationToken::new(),
        };

        controller.load_concepts();
        controller.load_word_heads(&route.dictionary_type, &route.pinyin);
        controller.load_reference_concepts();
        controller.load_word_items(&route.dictionary_type, &route.word_head);

        controller
    }

    /// Snapshot of the current view
    pub fn view(&self) -> DictionaryView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DictionaryView> {
        self.view.subscribe()
    }

    /// Wait until no fetch is outstanding, or the controller shuts down
    pub async fn settled(&self) {
        let mut rx = self.view.subscribe();

        tokio::select! {
            _ = self.cancel_token.cancelled() => {}
            _ = rx.wait_for(|view| view.status.is_settled()) => {}
        }
    }

    /// Show the word heads of another pinyin
    pub fn select_pinyin(&self, pinyin: &str) {
        let pinyin = normalize(pinyin);
        let dictionary_type = {
            let view = self.view.borrow();
            if view.route.pinyin == pinyin && !view.status.word_heads.is_failed() {
                return;
            }
            view.route.dictionary_type.clone()
        };

        let index = self.pinyin_indexes.index_for(&pinyin);
        self.view.send_modify(|view| {
            view.route.pinyin = pinyin.clone();
            // Pinyin outside the table keeps the index it was reached from
            if let Some(index) = index {
                view.route.index = index.to_string();
            }
        });
        self.load_word_heads(&dictionary_type, &pinyin);
    }

    /// Show the entries under another word head
    pub fn select_word_head(&self, head: &str) {
        let head = normalize(head);
        let dictionary_type = {
            let view = self.view.borrow();
            if view.route.word_head == head && !view.status.word_items.is_failed() {
                return;
            }
            view.route.dictionary_type.clone()
        };

        self.view.send_modify(|view| view.route.word_head = head.clone());
        self.load_word_items(&dictionary_type, &head);
    }

    /// Cancel every outstanding fetch
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    fn load_concepts(&self) {
        let repository = self.part_of_speech.clone();
        self.spawn_fetch(
            Field::Concepts,
            async move { repository.concepts().await },
            |view, concepts| view.concepts = concepts,
        );
    }

    /// Concept list the entry editor reads through the dictionary service.
    ///
    /// Issued alongside `load_concepts`; the shared in-flight request keeps it
    /// from reaching the backend twice. Nothing in the view depends on it.
    fn load_reference_concepts(&self) {
        let dictionary = self.dictionary.clone();
        let cancel = self.cancel_token.child_token();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = dictionary.fetch_concept_list() => match result {
                    Ok(concepts) => tracing::debug!("Reference concepts: {}", concepts.len()),
                    Err(e) => tracing::warn!("Failed to load reference concepts: {}", e),
                }
            }
        });
    }

    fn load_word_heads(&self, dictionary_type: &str, pinyin: &str) {
        let dictionary = self.dictionary.clone();
        let dictionary_type = dictionary_type.to_string();
        let pinyin = pinyin.to_string();

        self.spawn_fetch(
            Field::WordHeads,
            async move { dictionary.fetch_word_heads(&dictionary_type, &pinyin).await },
            |view, heads| view.word_heads = heads,
        );
    }

    fn load_word_items(&self, dictionary_type: &str, head: &str) {
        let dictionary = self.dictionary.clone();
        let dictionary_type = dictionary_type.to_string();
        let head = head.to_string();

        self.spawn_fetch(
            Field::WordItems,
            async move { dictionary.fetch_word_items(&dictionary_type, &head).await },
            |view, items| view.word_items = items,
        );
    }

    fn spawn_fetch<T, Fut>(&self, field: Field, fetch: Fut, apply: Apply<T>)
    where
        T: Send + 'static,
        Fut: Future<Output = Result<Vec<T>, DictionaryError>> + Send + 'static,
    {
        let token = self.claim(field, apply);
        let view = self.view.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("{} fetch cancelled", field);
                }
                result = fetch => publish(&view, &token, field, apply, result),
            }
        });
    }

    /// Retire the current writer of `field` and reset it to pending.
    ///
    /// Done under the view lock so a retiring writer either lands before the
    /// reset or sees its token cancelled.
    fn claim<T>(&self, field: Field, apply: Apply<T>) -> CancellationToken {
        let token = self.cancel_token.child_token();
        let mut writers = self.writers.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = writers.insert(field, token.clone());

        self.view.send_modify(|view| {
            if let Some(previous) = previous {
                previous.cancel();
            }
            apply(view, Vec::new());
            view.status.set(field, LoadState::Pending);
        });

        token
    }
}

impl Drop for CoreDictionaryController {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

fn publish<T>(
    view: &watch::Sender<DictionaryView>,
    token: &CancellationToken,
    field: Field,
    apply: Apply<T>,
    result: Result<Vec<T>, DictionaryError>,
) {
    view.send_if_modified(move |view| {
        if token.is_cancelled() {
            return false;
        }

        match result {
            Ok(data) => {
                tracing::info!("Loaded {} {}", data.len(), field);
                apply(view, data);
                view.status.set(field, LoadState::Loaded);
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", field, e);
                apply(view, Vec::new());
                view.status.set(field, LoadState::Failed(e.to_string()));
            }
        }

        true
    });
}
