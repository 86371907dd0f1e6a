//! Test utilities: a scripted status fetcher that replays canned responses.

use crate::atlas::{FetchError, StatusFetcher};
use crate::types::{SearchDeployment, SearchNodeSpec};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub(crate) const PROJECT_ID: &str = "111111111111111111111111";
pub(crate) const CLUSTER_NAME: &str = "Cluster0";
pub(crate) const DEPLOYMENT_ID: &str = "222222222222222222222222";

/// Snapshot as the remote reports it, with the given state label
pub(crate) fn deployment(state: Option<&str>) -> SearchDeployment {
    SearchDeployment {
        group_id: Some(PROJECT_ID.to_string()),
        id: Some(DEPLOYMENT_ID.to_string()),
        specs: vec![SearchNodeSpec {
            instance_size: "S20_HIGHCPU_NVME".to_string(),
            node_count: 2,
        }],
        state_name: state.map(ToString::to_string),
    }
}

pub(crate) fn state(label: &str) -> Result<SearchDeployment, FetchError> {
    Ok(deployment(Some(label)))
}

pub(crate) fn http_error(status: u16, message: &str) -> Result<SearchDeployment, FetchError> {
    Err(FetchError::api(status, message))
}

/// Replays responses in order and panics if asked for more than it holds,
/// so tests fail loudly when polling continues past a terminal response.
pub(crate) struct ScriptedFetcher {
    responses: Mutex<VecDeque<Result<SearchDeployment, FetchError>>>,
    calls: AtomicU32,
}

impl ScriptedFetcher {
    pub(crate) fn new(responses: Vec<Result<SearchDeployment, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Responses that were never requested
    pub(crate) fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<SearchDeployment, FetchError> {
        assert_eq!(project_id, PROJECT_ID);
        assert_eq!(cluster_name, CLUSTER_NAME);
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected fetch #{call}: no scripted response left"))
    }
}
