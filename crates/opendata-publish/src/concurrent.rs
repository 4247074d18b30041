use crate::error::Result;
use futures_util::stream::{self, StreamExt};
use opendata_table::TableProgress;
use std::sync::Arc;

/// Runs blocking work for every item on tokio's blocking pool, with at most
/// `workers` tasks in flight. Results come back in input order.
pub async fn parallel_map<T, R, F>(
    items: Vec<T>,
    workers: usize,
    progress: &TableProgress,
    f: F,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let tasks = items.into_iter().map(|item| {
        let f = Arc::clone(&f);
        tokio::task::spawn_blocking(move || f(item))
    });

    let joined: Vec<_> = stream::iter(tasks)
        .buffered(workers.max(1))
        .inspect(|_| progress.inc())
        .collect()
        .await;
    progress.finish();

    joined
        .into_iter()
        .map(|r| r.map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parallel_map_preserves_order() {
        let progress = TableProgress::new(5, "test", false);
        let result = parallel_map(vec![5u64, 1, 4, 2, 3], 3, &progress, |n| {
            std::thread::sleep(std::time::Duration::from_millis(n * 5));
            n * 10
        })
        .await
        .unwrap();

        assert_eq!(result, vec![50, 10, 40, 20, 30]);
        assert_eq!(progress.position(), 5);
    }

    #[tokio::test]
    async fn test_parallel_map_empty() {
        let progress = TableProgress::new(0, "test", false);
        let result: Vec<u32> = parallel_map(Vec::<u32>::new(), 2, &progress, |n| n)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_parallel_map_reports_panics() {
        let progress = TableProgress::new(1, "test", false);
        let result = parallel_map(vec![1], 1, &progress, |_: i32| -> i32 { panic!("boom") }).await;
        assert!(result.is_err());
    }
}
