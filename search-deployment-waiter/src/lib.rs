//! This crate provides the state-transition waiters for Atlas Search deployments:
//! - A generic polling engine with backoff, deadline and cancellation
//! - Classification of each status response (transient, fatal, absent)
//! - Waiters for "deployment is ready" and "deployment is gone"
//! - A status fetcher seam with an HTTP implementation for the Atlas Admin API
//!

mod atlas;
mod config;
mod error;
pub mod polling;
mod types;
mod waiter;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports for a small, focused public API
pub use atlas::{
    AtlasSearchClient, FetchError, StatusFetcher, DEFAULT_BASE_URL, DEPLOYMENT_DOES_NOT_EXIST,
};
pub use config::{Backoff, RetryConfig};
pub use error::{WaitError, WaitResult};
pub use tokio_util::sync::CancellationToken;
pub use types::{DeploymentState, SearchDeployment, SearchNodeSpec, IDLE_STATE, UPDATING_STATE};
pub use waiter::{wait_for_deletion, wait_for_state};
