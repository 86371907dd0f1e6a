//! Generic polling engine shared by the waiters.
//!
//! The engine owns the loop: fetch, classify, decide, then either return or sleep
//! and fetch again. Waiters only supply a decision function, a pure mapping from
//! one classified [`PollOutcome`] to a [`Decision`].
//!
//! # Example
//!
//! ```no_run
//! use search_deployment_waiter::polling::{poll, Decision, PollOutcome};
//! use search_deployment_waiter::{
//!     CancellationToken, RetryConfig, SearchDeployment, StatusFetcher, WaitResult,
//! };
//!
//! # async fn example(fetcher: &dyn StatusFetcher) -> WaitResult<()> {
//! let cancel = CancellationToken::new();
//! poll(
//!     &cancel,
//!     &RetryConfig::default(),
//!     "Cluster0",
//!     || fetcher.fetch("32b6e34b3d91647abb20e7b8", "Cluster0"),
//!     |outcome: PollOutcome<SearchDeployment>| match outcome {
//!         PollOutcome::Snapshot(d) if d.state_name.as_deref() == Some("IDLE") => Decision::Done(()),
//!         _ => Decision::Continue,
//!     },
//! )
//! .await
//! # }
//! ```

mod classify;

pub use classify::{classify, is_absence_signal, is_transient};

use crate::atlas::FetchError;
use crate::config::RetryConfig;
use crate::error::{WaitError, WaitResult};
use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Stand-in deadline for timeouts too large to represent as an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// A classified poll attempt
#[derive(Debug)]
pub enum PollOutcome<S> {
    Snapshot(S),
    /// Retry without surfacing the error
    Transient(FetchError),
    Fatal(FetchError),
}

/// What the engine does after one poll attempt
#[derive(Debug)]
pub enum Decision<T> {
    Continue,
    Done(T),
    Abort(WaitError),
}

/// Snapshot types that expose a state label, for progress logs and timeout reports
pub trait ReportsState {
    fn state_label(&self) -> Option<&str>;
}

/// Poll until `decide` returns `Done` or `Abort`, the deadline passes, or `cancel` fires.
///
/// Fetches run strictly one after another. Cancellation interrupts both an
/// in-flight fetch and a pending sleep. A fetch still in flight when the deadline
/// passes ends the wait with [`WaitError::Timeout`].
pub async fn poll<S, T, F, Fut, D>(
    cancel: &CancellationToken,
    config: &RetryConfig,
    resource: &str,
    mut fetch: F,
    mut decide: D,
) -> WaitResult<T>
where
    S: ReportsState,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, FetchError>>,
    D: FnMut(PollOutcome<S>) -> Decision<T>,
{
    config.validate()?;

    let started = Instant::now();
    let deadline = started
        .checked_add(config.timeout)
        .unwrap_or_else(|| started + FAR_FUTURE);
    let mut backoff = config.backoff();
    let mut attempts = 0u32;
    let mut last_state: Option<String> = None;

    let timed_out = |attempts: u32, last_state: Option<String>| WaitError::Timeout {
        timeout: config.timeout,
        attempts,
        last_state,
    };

    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }
        attempts += 1;

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(WaitError::Cancelled),
            result = fetch() => result,
            () = tokio::time::sleep_until(deadline) => {
                return Err(timed_out(attempts, last_state));
            }
        };

        let outcome = classify(result);
        match &outcome {
            PollOutcome::Snapshot(snapshot) => {
                let label = snapshot.state_label().unwrap_or_default();
                debug!("{resource}: attempt {attempts} observed state '{label}'");
                last_state = Some(label.to_string());
            }
            PollOutcome::Transient(e) => {
                warn!("{resource}: attempt {attempts} failed with a transient error, retrying: {e}");
            }
            PollOutcome::Fatal(e) => {
                debug!("{resource}: attempt {attempts} failed: {e}");
            }
        }

        match decide(outcome) {
            Decision::Done(value) => {
                info!(
                    "{resource}: wait completed after {attempts} attempts in {:?}",
                    started.elapsed()
                );
                return Ok(value);
            }
            Decision::Abort(e) => return Err(e),
            Decision::Continue => {}
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(timed_out(attempts, last_state));
        }

        let delay = backoff.next_delay(deadline - now);
        debug!("{resource}: next attempt in {delay:?}");
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(WaitError::Cancelled),
            () = tokio::time::sleep(delay) => {}
        }
    }
}
