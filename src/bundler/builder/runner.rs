//! Bounded, chunked execution of per-file operations.
//!
//! Files are processed in consecutive chunks of at most `max_parallel`
//! operations. Every operation of a chunk is polled concurrently on the
//! calling task and the whole chunk settles before the next one is
//! dispatched.

use crate::bundler::Result;
use futures::future::join_all;
use std::future::Future;

/// Runs `op` over `items[start..]` with at most `max_parallel` operations in
/// flight.
///
/// Values of `max_parallel` below 1 are treated as 1. Results are returned
/// in item order.
///
/// # Errors
///
/// If any operation of a chunk fails, the chunk is still driven to
/// completion and the first failure in item order is returned. Later chunks
/// are not dispatched.
pub async fn run_bounded<T, R, F, Fut>(
    items: &[T],
    max_parallel: usize,
    start: usize,
    mut op: F,
) -> Result<Vec<R>>
where
    T: Clone,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let max_parallel = max_parallel.max(1);
    let mut cursor = start.min(items.len());
    let mut results = Vec::with_capacity(items.len() - cursor);

    while cursor < items.len() {
        let end = (cursor + max_parallel).min(items.len());
        log::trace!("Dispatching chunk {}..{} of {}", cursor, end, items.len());

        let chunk: Vec<Fut> = items[cursor..end].iter().cloned().map(&mut op).collect();
        for outcome in join_all(chunk).await {
            results.push(outcome?);
        }

        cursor = end;
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct Tracker {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        events: Mutex<Vec<String>>,
    }

    impl Tracker {
        fn start(&self, item: usize) {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.events.lock().unwrap().push(format!("start {}", item));
        }

        fn finish(&self, item: usize) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.events.lock().unwrap().push(format!("end {}", item));
        }

        fn position(&self, event: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .position(|e| e == event)
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_concurrency_bound_and_chunk_barrier() {
        let tracker = Arc::new(Tracker::default());
        let items: Vec<usize> = (0..5).collect();

        let results = run_bounded(&items, 2, 0, |item| {
            let tracker = Arc::clone(&tracker);
            async move {
                tracker.start(item);
                // Uneven durations so completion order differs from dispatch order.
                tokio::time::sleep(Duration::from_millis(((5 - item) * 5) as u64)).await;
                tracker.finish(item);
                Ok::<_, Error>(item * 10)
            }
        })
        .await
        .unwrap();

        assert_eq!(results, vec![0, 10, 20, 30, 40]);
        assert_eq!(tracker.peak.load(Ordering::SeqCst), 2);

        // Chunk [2, 3] starts only after chunk [0, 1] fully settles.
        assert!(tracker.position("end 0") < tracker.position("start 2"));
        assert!(tracker.position("end 1") < tracker.position("start 2"));
        assert!(tracker.position("end 3") < tracker.position("start 4"));
    }

    #[tokio::test]
    async fn test_failure_surfaces_after_chunk_settles() {
        let tracker = Arc::new(Tracker::default());
        let items: Vec<usize> = (0..5).collect();

        let err = run_bounded(&items, 2, 0, |item| {
            let tracker = Arc::clone(&tracker);
            async move {
                tracker.start(item);
                if item == 2 {
                    tracker.finish(item);
                    return Err(Error::GenericError(format!("item {} failed", item)));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
                tracker.finish(item);
                Ok(item)
            }
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "item 2 failed");

        let events = tracker.events.lock().unwrap().clone();
        // The sibling in the failing chunk was allowed to finish...
        assert!(events.contains(&"end 3".to_string()));
        // ...and the next chunk was never dispatched.
        assert!(!events.contains(&"start 4".to_string()));
    }

    #[tokio::test]
    async fn test_first_failure_in_item_order() {
        let items = vec![0usize, 1, 2];
        let err = run_bounded(&items, 3, 0, |item| async move {
            if item == 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err::<(), _>(Error::GenericError(format!("{}", item)))
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "0");
    }

    #[tokio::test]
    async fn test_start_offset_and_clamped_max() {
        let items = vec!["a", "b", "c", "d"];
        let seen = Arc::new(Mutex::new(Vec::new()));

        let results = run_bounded(&items, 0, 1, |item| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(item);
                Ok::<_, Error>(item.to_uppercase())
            }
        })
        .await
        .unwrap();

        assert_eq!(results, vec!["B", "C", "D"]);
        assert_eq!(*seen.lock().unwrap(), vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_empty_and_out_of_range_start() {
        let empty: Vec<u8> = Vec::new();
        let results = run_bounded(&empty, 4, 0, |x| async move { Ok::<_, Error>(x) }).await.unwrap();
        assert!(results.is_empty());

        let items = vec![1u8, 2];
        let results = run_bounded(&items, 4, 10, |x| async move { Ok::<_, Error>(x) }).await.unwrap();
        assert!(results.is_empty());
    }
}
