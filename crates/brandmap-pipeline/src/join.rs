//! Collect-all fan-in combinators.
//!
//! Every unit is driven to completion. A unit that returns `Err` or panics
//! yields an `Err` in its own slot; siblings keep running untouched.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use crate::error::StageError;

/// Runs one unit, converting a panic into [`StageError::Panicked`].
pub async fn settle<T, F>(unit: F) -> Result<T, StageError>
where
    F: Future<Output = Result<T, StageError>>,
{
    match AssertUnwindSafe(unit).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(StageError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Runs all units concurrently and returns their outcomes in input order.
pub async fn join_settled<T, I>(units: I) -> Vec<Result<T, StageError>>
where
    I: IntoIterator,
    I::Item: Future<Output = Result<T, StageError>>,
{
    join_all(units.into_iter().map(settle)).await
}

/// Runs labeled units concurrently and returns `(label, outcome)` pairs in
/// completion order.
///
/// Each label travels with its own unit, so callers must regroup by label;
/// the output order carries no meaning.
pub async fn join_labeled<L, T, F, I>(units: I) -> Vec<(L, Result<T, StageError>)>
where
    I: IntoIterator<Item = (L, F)>,
    F: Future<Output = Result<T, StageError>>,
{
    units
        .into_iter()
        .map(|(label, unit)| async move { (label, settle(unit).await) })
        .collect::<FuturesUnordered<_>>()
        .collect()
        .await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
