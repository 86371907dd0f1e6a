//! Wait for a search deployment to disappear after a delete

use crate::atlas::StatusFetcher;
use crate::config::RetryConfig;
use crate::error::{WaitError, WaitResult};
use crate::polling::{is_absence_signal, poll, Decision, PollOutcome};
use crate::types::{DeploymentState, SearchDeployment, IDLE_STATE, UPDATING_STATE};
use log::info;
use tokio_util::sync::CancellationToken;

const PENDING_STATES: &[&str] = &[IDLE_STATE, UPDATING_STATE];

/// Poll until the remote reports that the deployment no longer exists.
///
/// Deletion is detected by its absence: the "does not exist" 400 is the one
/// error shape that completes this wait successfully. `IDLE` and `UPDATING`
/// mean the delete is still pending.
pub async fn wait_for_deletion<F>(
    cancel: &CancellationToken,
    project_id: &str,
    cluster_name: &str,
    fetcher: &F,
    config: &RetryConfig,
) -> WaitResult<()>
where
    F: StatusFetcher + ?Sized,
{
    info!(
        "Waiting for search deployment of cluster '{cluster_name}' in project '{project_id}' to be deleted"
    );
    poll(
        cancel,
        config,
        cluster_name,
        || fetcher.fetch(project_id, cluster_name),
        decide_deleted,
    )
    .await
}

fn decide_deleted(outcome: PollOutcome<SearchDeployment>) -> Decision<()> {
    match outcome {
        PollOutcome::Transient(_) => Decision::Continue,
        PollOutcome::Fatal(e) if is_absence_signal(&e) => Decision::Done(()),
        PollOutcome::Fatal(e) => Decision::Abort(WaitError::Remote(e)),
        PollOutcome::Snapshot(deployment) => match deployment.state() {
            DeploymentState::Idle | DeploymentState::Updating => Decision::Continue,
            state @ (DeploymentState::Unknown | DeploymentState::Unrecognized(_)) => {
                Decision::Abort(WaitError::unexpected_state(&state, PENDING_STATES))
            }
        },
    }
}
