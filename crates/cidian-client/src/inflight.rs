use std::collections::HashMap;
use std::collections::hash_map::Entry as Slot;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};

type SharedRequest<T> = Shared<BoxFuture<'static, T>>;

struct Entry<T: Clone> {
    id: u64,
    request: SharedRequest<T>,
}

/// Collapses identical concurrent requests into one.
///
/// Callers asking for a key that is already in flight await the same future
/// and get a clone of its output. Nothing is kept once the request resolves
/// or once every caller has given up on it, so a later call with the same key
/// starts a fresh request.
pub struct InFlight<T: Clone> {
    pending: Mutex<HashMap<String, Entry<T>>>,
    next_id: AtomicU64,
}

impl<T> InFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub async fn run<F, Fut>(&self, key: &str, start: F) -> T
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut waiter = {
            let mut pending = self.lock();
            let entry = match pending.entry(key.to_string()) {
                Slot::Occupied(slot) => {
                    tracing::debug!("joining in-flight request: {}", key);
                    slot.into_mut()
                }
                Slot::Vacant(slot) => {
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let request = start().boxed().shared();
                    slot.insert(Entry { id, request })
                }
            };

            Waiter {
                in_flight: self,
                key,
                id: entry.id,
                request: entry.request.clone(),
                resolved: false,
            }
        };

        let output = (&mut waiter.request).await;
        waiter.resolved = true;
        output
    }

    /// Number of distinct requests currently in flight
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry<T>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One caller's interest in an in-flight request.
///
/// Clears the slot when the request resolves, or when the last caller is
/// dropped before it does.
struct Waiter<'a, T: Clone> {
    in_flight: &'a InFlight<T>,
    key: &'a str,
    id: u64,
    request: SharedRequest<T>,
    resolved: bool,
}

impl<T: Clone> Drop for Waiter<'_, T> {
    fn drop(&mut self) {
        let mut pending = self
            .in_flight
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let Some(entry) = pending.get(self.key) else {
            return;
        };
        if entry.id != self.id {
            return;
        }

        // The slot's own handle plus this waiter's means nobody else is left
        let abandoned = entry.request.strong_count() == Some(2);
        if self.resolved || abandoned {
            pending.remove(self.key);
        }
    }
}

impl<T> Default for InFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    fn counted(calls: &Arc<AtomicUsize>, value: u32) -> impl Future<Output = u32> + Send + 'static {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            value
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_request() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            in_flight.run("/concept", || counted(&calls, 1)),
            in_flight.run("/concept", || counted(&calls, 2)),
        );

        assert_eq!((a, b), (1, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(in_flight.is_empty());
    }

    #[tokio::test]
    async fn distinct_keys_run_separately() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            in_flight.run("/dictionary/core/pinyin/a", || counted(&calls, 1)),
            in_flight.run("/dictionary/core/pinyin/ai", || counted(&calls, 2)),
        );

        assert_eq!((a, b), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sequential_calls_are_not_cached() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = in_flight.run("/concept", || counted(&calls, 1)).await;
        let second = in_flight.run("/concept", || counted(&calls, 2)).await;

        assert_eq!((first, second), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    fn stalled(calls: &Arc<AtomicUsize>) -> impl Future<Output = u32> + Send + 'static {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            0
        }
    }

    #[tokio::test]
    async fn abandoned_request_is_not_reused() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let abandoned = timeout(
            Duration::from_millis(10),
            in_flight.run("/dictionary/core/pinyin/a", || stalled(&calls)),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(in_flight.is_empty());

        let fresh = in_flight
            .run("/dictionary/core/pinyin/a", || counted(&calls, 7))
            .await;

        assert_eq!(fresh, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(in_flight.is_empty());
    }

    #[tokio::test]
    async fn remaining_caller_keeps_request_alive() {
        let in_flight = InFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (dropped, kept) = tokio::join!(
            timeout(
                Duration::from_millis(5),
                in_flight.run("/concept", || counted(&calls, 3)),
            ),
            in_flight.run("/concept", || counted(&calls, 4)),
        );

        assert!(dropped.is_err());
        assert_eq!(kept, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(in_flight.is_empty());
    }
}
