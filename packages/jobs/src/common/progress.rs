//! Bounded, order-preserving async map with a terminal progress bar.

use std::future::Future;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// Run `f` over `items` with at most `concurrency` futures in flight.
///
/// Results come back in submission order no matter which task finishes
/// first. The bar advances as each task completes. A failing task is not
/// isolated: map to `Result` and collect to surface the first error once
/// the whole batch has run.
pub async fn map_progress<I, T, F, Fut>(items: Vec<I>, concurrency: usize, mut f: F) -> Vec<T>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = T>,
{
    let progress = ProgressBar::new(items.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let results = stream::iter(items)
        .map(|item| {
            let task = f(item);
            let progress = progress.clone();
            async move {
                let output = task.await;
                progress.inc(1);
                output
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<T>>()
        .await;

    progress.finish_and_clear();
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn results_follow_submission_order() {
        // Earlier items sleep longer so they finish last.
        let items: Vec<u64> = (0..6).collect();
        let results = map_progress(items, 6, |n| async move {
            tokio::time::sleep(Duration::from_millis(60 - n * 10)).await;
            n * 2
        })
        .await;

        assert_eq!(results, vec![0, 2, 4, 6, 8, 10]);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = map_progress((0..20).collect(), 3, |n: usize| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                n
            }
        })
        .await;

        assert_eq!(results.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn failures_surface_after_batch_completes() {
        let completed = Arc::new(AtomicUsize::new(0));

        let results = map_progress((0..5).collect(), 2, |n: u32| {
            let completed = completed.clone();
            async move {
                completed.fetch_add(1, Ordering::SeqCst);
                if n == 1 {
                    Err(format!("task {} failed", n))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(completed.load(Ordering::SeqCst), 5);
        let collected: Result<Vec<u32>, String> = results.into_iter().collect();
        assert_eq!(collected, Err("task 1 failed".to_string()));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let results: Vec<u8> = map_progress(Vec::<u8>::new(), 4, |n| async move { n }).await;
        assert!(results.is_empty());
    }
}
