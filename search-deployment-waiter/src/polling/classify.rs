//! Classification of raw status fetch results into poll outcomes

use crate::atlas::{FetchError, DEPLOYMENT_DOES_NOT_EXIST};
use crate::polling::PollOutcome;

const BAD_REQUEST: u16 = 400;
const SERVICE_UNAVAILABLE: u16 = 503;

/// Classify one fetch result.
///
/// Only 503 and transport failures the fetcher marked transient are retried.
/// Other 5xx codes are fatal.
pub fn classify<S>(result: Result<S, FetchError>) -> PollOutcome<S> {
    match result {
        Ok(snapshot) => PollOutcome::Snapshot(snapshot),
        Err(e) if is_transient(&e) => PollOutcome::Transient(e),
        Err(e) => PollOutcome::Fatal(e),
    }
}

pub fn is_transient(err: &FetchError) -> bool {
    match err {
        FetchError::Api { status, .. } => *status == SERVICE_UNAVAILABLE,
        FetchError::Transport { transient, .. } => *transient,
        FetchError::Decode(_) => false,
    }
}

/// 400 carrying the "deployment does not exist" error code.
///
/// Success for a delete flow, failure everywhere else.
pub fn is_absence_signal(err: &FetchError) -> bool {
    matches!(
        err,
        FetchError::Api { status, message }
            if *status == BAD_REQUEST && message.contains(DEPLOYMENT_DOES_NOT_EXIST)
    )
}
