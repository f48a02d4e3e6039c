//! Concurrent fan-out of independent reads.
//!
//! Every registered read runs to completion: a failing read does not cancel
//! its siblings, their results are simply discarded. The caller resumes once
//! all reads have settled, with either every result or the first failure in
//! completion order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::{future::BoxFuture, stream::FuturesUnordered, StreamExt};
use indexmap::IndexMap;

use crate::error::AppResult;

/// A keyed set of independent reads producing values of the same type
pub struct Aggregate<'a, T> {
    reads: IndexMap<&'static str, BoxFuture<'a, AppResult<T>>>,
}

impl<'a, T: Send + 'a> Default for Aggregate<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Send + 'a> Aggregate<'a, T> {
    pub fn new() -> Self {
        Self {
            reads: IndexMap::new(),
        }
    }

    /// Register a read under `key`. Registering a key twice keeps the later read.
    pub fn read<F>(mut self, key: &'static str, read: F) -> Self
    where
        F: Future<Output = AppResult<T>> + Send + 'a,
    {
        self.reads.insert(key, Box::pin(read));
        self
    }

    /// Run all reads concurrently and join them.
    ///
    /// On success the map holds exactly the registered keys, in registration
    /// order.
    pub async fn join(self) -> AppResult<IndexMap<&'static str, T>> {
        let keys: Vec<&'static str> = self.reads.keys().copied().collect();

        let mut pending: FuturesUnordered<_> = self
            .reads
            .into_iter()
            .map(|(key, read)| async move { (key, read.await) })
            .collect();

        let mut settled = HashMap::with_capacity(keys.len());
        let mut first_failure = None;

        while let Some((key, result)) = pending.next().await {
            match result {
                Ok(value) => {
                    settled.insert(key, value);
                }
                Err(e) if first_failure.is_none() => {
                    tracing::debug!("Aggregated read '{}' failed: {}", key, e);
                    first_failure = Some(e);
                }
                Err(e) => {
                    tracing::debug!("Discarding later failure of read '{}': {}", key, e);
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }

        Ok(keys
            .into_iter()
            .filter_map(|key| settled.remove(key).map(|value| (key, value)))
            .collect())
    }
}

/// Join two independent reads of different types with the same semantics as
/// [`Aggregate::join`]: both run to completion, the first failure wins.
pub async fn both<A, B, FA, FB>(a: FA, b: FB) -> AppResult<(A, B)>
where
    FA: Future<Output = AppResult<A>>,
    FB: Future<Output = AppResult<B>>,
{
    let finished = AtomicUsize::new(0);

    let (a, b) = tokio::join!(
        async {
            let result = a.await;
            (finished.fetch_add(1, Ordering::Relaxed), result)
        },
        async {
            let result = b.await;
            (finished.fetch_add(1, Ordering::Relaxed), result)
        },
    );

    match (a, b) {
        ((_, Ok(a)), (_, Ok(b))) => Ok((a, b)),
        ((_, Err(e)), (_, Ok(_))) | ((_, Ok(_)), (_, Err(e))) => Err(e),
        ((seq_a, Err(ea)), (seq_b, Err(eb))) => Err(if seq_a < seq_b { ea } else { eb }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    async fn value_after(ms: u64, value: i64) -> AppResult<i64> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(value)
    }

    async fn failure_after(ms: u64, what: &str) -> AppResult<i64> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Err(AppError::Store(what.to_string()))
    }

    #[tokio::test]
    async fn test_join_returns_exactly_the_registered_keys() {
        let joined = Aggregate::new()
            .read("book_count", value_after(30, 1))
            .read("book_instance_count", value_after(5, 2))
            .read("book_instance_available_count", value_after(20, 3))
            .read("author_count", value_after(0, 4))
            .read("genre_count", value_after(10, 5))
            .join()
            .await
            .unwrap();

        let keys: Vec<_> = joined.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "book_count",
                "book_instance_count",
                "book_instance_available_count",
                "author_count",
                "genre_count"
            ]
        );
        assert_eq!(joined["book_instance_available_count"], 3);
        assert_eq!(joined["genre_count"], 5);
    }

    #[tokio::test]
    async fn test_empty_aggregate_joins_to_empty_map() {
        let joined = Aggregate::<i64>::new().join().await.unwrap();
        assert!(joined.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_key_keeps_later_read() {
        let joined = Aggregate::new()
            .read("count", value_after(0, 1))
            .read("count", value_after(0, 2))
            .join()
            .await
            .unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined["count"], 2);
    }

    #[tokio::test]
    async fn test_single_failure_fails_the_whole_join() {
        for failing in 0..3 {
            let mut aggregate = Aggregate::new();
            for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
                aggregate = if i == failing {
                    aggregate.read(key, failure_after(10 * i as u64, key))
                } else {
                    aggregate.read(key, value_after(10 * i as u64, i as i64))
                };
            }
            match aggregate.join().await {
                Err(AppError::Store(what)) => assert_eq!(what, ["a", "b", "c"][failing]),
                other => panic!("expected failure, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_siblings() {
        let finished = Arc::new(AtomicUsize::new(0));
        let slow = |ms: u64| {
            let finished = finished.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<i64, AppError>(0)
            }
        };

        let result = Aggregate::new()
            .read("fails_fast", failure_after(0, "fails_fast"))
            .read("slow_1", slow(20))
            .read("slow_2", slow(40))
            .join()
            .await;

        assert!(result.is_err());
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_failure_in_completion_order_wins() {
        let result = Aggregate::new()
            .read("late", failure_after(50, "late"))
            .read("early", failure_after(0, "early"))
            .join()
            .await;
        assert!(matches!(result, Err(AppError::Store(what)) if what == "early"));
    }

    #[tokio::test]
    async fn test_reads_run_concurrently() {
        // Each read waits for all three to start; sequential execution would hang.
        let barrier = Arc::new(Barrier::new(3));
        let rendezvous = |value: i64| {
            let barrier = barrier.clone();
            async move {
                barrier.wait().await;
                Ok::<i64, AppError>(value)
            }
        };

        let joined = tokio::time::timeout(
            Duration::from_secs(5),
            Aggregate::new()
                .read("x", rendezvous(1))
                .read("y", rendezvous(2))
                .read("z", rendezvous(3))
                .join(),
        )
        .await
        .expect("reads did not run concurrently")
        .unwrap();
        assert_eq!(joined.values().sum::<i64>(), 6);
    }

    #[tokio::test]
    async fn test_both_joins_heterogeneous_reads() {
        let (count, name) = both(value_after(10, 3), async {
            Ok::<_, AppError>("Fantasy".to_string())
        })
        .await
        .unwrap();
        assert_eq!(count, 3);
        assert_eq!(name, "Fantasy");
    }

    #[tokio::test]
    async fn test_both_reports_earliest_failure() {
        let result = both(failure_after(40, "first arg"), failure_after(0, "second arg")).await;
        assert!(matches!(result, Err(AppError::Store(what)) if what == "second arg"));

        let result = both(value_after(0, 1), failure_after(10, "only")).await;
        assert!(matches!(result, Err(AppError::Store(what)) if what == "only"));
    }
}
