//! Fixed-width fan-out / fan-in over a list of work items.

use std::future::Future;

use futures::future::join_all;

use crate::error::Result;

/// Default number of requests in flight per batch.
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Runs `task` over `items`, `width` at a time, and returns every outcome
/// paired with its item, in input order.
///
/// A batch finishes only once all of its members have settled; the next
/// batch starts after that. A failed member never cancels its siblings.
pub async fn settle_in_batches<'a, T, R, F, Fut>(
    items: &'a [T],
    width: usize,
    task: F,
) -> Vec<(&'a T, Result<R>)>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let mut settled = Vec::with_capacity(items.len());
    for chunk in items.chunks(width.max(1)) {
        let outcomes = join_all(chunk.iter().map(&task)).await;
        settled.extend(chunk.iter().zip(outcomes));
    }
    settled
}
