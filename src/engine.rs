//! Parallel Engine (H): resolves inputs once, then fans work out across a
//! bounded pool of blocking workers.

use std::sync::Arc;
use std::time::Instant;

use futures::future;
use tokio::sync::{watch, Semaphore};

use crate::options::OptionContext;
use crate::pathsrc;
use crate::pool::MatchPool;
use crate::strategy;
use crate::types::SearchResult;
use crate::worker;

/// Compute the worker parallelism from file count `f` and CPU count `c`
/// (§4.5's exact formula), clamped to at least 1.
#[must_use]
pub fn parallelism(f: usize, c: usize) -> usize {
    let c = c.max(1);
    let p = if f == 0 {
        1
    } else if f <= 4 {
        f.min(c)
    } else if f <= 20 {
        c
    } else {
        (2 * c).min(f)
    };
    p.max(1)
}

/// Run a full search: resolve the strategy, expand paths, dispatch workers
/// with bounded concurrency, and aggregate the results.
///
/// Never raises on cancellation — the cancellation receiver's current value
/// is sampled by every worker at each suspension point, and whatever partial
/// work has accumulated is returned as a normal `SearchResult` (§4.5, §5).
pub async fn run(options: Arc<OptionContext>, cancel: watch::Receiver<bool>) -> SearchResult {
    let started = Instant::now();

    let strategy = strategy::select(&options);
    let tokens = pathsrc::expand_paths(&options);

    let cpu_count = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    let p = parallelism(tokens.len(), cpu_count);

    let semaphore = Arc::new(Semaphore::new(p));
    let pool = MatchPool::new();
    let strategy = Arc::new(strategy);

    let mut handles = Vec::with_capacity(tokens.len());
    for token in tokens {
        let semaphore = Arc::clone(&semaphore);
        let strategy = Arc::clone(&strategy);
        let options = Arc::clone(&options);
        let pool = pool.clone();
        let cancel = cancel.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            tokio::task::spawn_blocking(move || {
                worker::run(&token, &strategy, &options, &pool, cancel)
            })
            .await
        }));
    }

    // Join every worker concurrently rather than one at a time, matching the
    // teacher's `future::join_all` fan-in for parallel per-item work.
    let joined = future::join_all(handles).await;
    let mut file_results = Vec::with_capacity(joined.len());
    for outcome in joined {
        match outcome {
            Ok(Ok(result)) => file_results.push(result),
            // A worker task panicking is treated the same as a per-file I/O
            // error: it never aborts the rest of the search.
            Ok(Err(join_err)) => log::warn!("worker task failed: {join_err}"),
            Err(join_err) => log::warn!("worker task join failed: {join_err}"),
        }
    }

    SearchResult {
        file_results,
        elapsed: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallelism_matches_the_formula() {
        assert_eq!(parallelism(0, 8), 1);
        assert_eq!(parallelism(3, 8), 3);
        assert_eq!(parallelism(4, 2), 2);
        assert_eq!(parallelism(10, 8), 8);
        assert_eq!(parallelism(100, 8), 16);
        assert_eq!(parallelism(100, 0), 100.min(2));
    }

    #[tokio::test]
    async fn empty_path_list_yields_empty_result() {
        let options = Arc::new(OptionContext {
            pattern: "x".to_string(),
            paths: vec![],
            ignore_case: false,
            invert_match: false,
            line_number: false,
            count_only: false,
            files_with_matches: false,
            no_filename: false,
            silent: false,
            extended_regexp: false,
            fixed_strings: false,
            word_regexp: false,
            recursive: false,
            max_count: None,
            context_before: 0,
            context_after: 0,
            include: vec![],
            exclude: vec![],
        });
        let (_tx, rx) = watch::channel(false);
        let result = run(options, rx).await;
        assert_eq!(result.total_files(), 0);
        assert_eq!(result.total_matches(), 0);
    }
}
