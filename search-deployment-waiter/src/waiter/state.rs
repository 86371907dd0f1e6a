//! Wait for a search deployment to become ready after a create or update

use crate::atlas::StatusFetcher;
use crate::config::RetryConfig;
use crate::error::{WaitError, WaitResult};
use crate::polling::{is_absence_signal, poll, Decision, PollOutcome};
use crate::types::{DeploymentState, SearchDeployment, IDLE_STATE, UPDATING_STATE};
use log::info;
use tokio_util::sync::CancellationToken;

const EXPECTED_STATES: &[&str] = &[IDLE_STATE, UPDATING_STATE];

/// Poll until the deployment reports `IDLE` and return that first `IDLE` snapshot.
///
/// `UPDATING` and transient errors keep polling. An unknown or unrecognized
/// state, a missing deployment, or any other fatal error ends the wait.
pub async fn wait_for_state<F>(
    cancel: &CancellationToken,
    project_id: &str,
    cluster_name: &str,
    fetcher: &F,
    config: &RetryConfig,
) -> WaitResult<SearchDeployment>
where
    F: StatusFetcher + ?Sized,
{
    info!(
        "Waiting for search deployment of cluster '{cluster_name}' in project '{project_id}' to reach {IDLE_STATE}"
    );
    poll(
        cancel,
        config,
        cluster_name,
        || fetcher.fetch(project_id, cluster_name),
        decide_ready,
    )
    .await
}

fn decide_ready(outcome: PollOutcome<SearchDeployment>) -> Decision<SearchDeployment> {
    match outcome {
        PollOutcome::Transient(_) => Decision::Continue,
        PollOutcome::Fatal(e) if is_absence_signal(&e) => {
            Decision::Abort(WaitError::ResourceAbsent(e))
        }
        PollOutcome::Fatal(e) => Decision::Abort(WaitError::Remote(e)),
        PollOutcome::Snapshot(deployment) => match deployment.state() {
            DeploymentState::Idle => Decision::Done(deployment),
            DeploymentState::Updating => Decision::Continue,
            state @ (DeploymentState::Unknown | DeploymentState::Unrecognized(_)) => {
                Decision::Abort(WaitError::unexpected_state(&state, EXPECTED_STATES))
            }
        },
    }
}
