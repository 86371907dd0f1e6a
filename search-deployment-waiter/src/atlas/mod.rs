//! Atlas Admin API integration: status fetcher seam and HTTP client.

mod client;

pub use client::{AtlasSearchClient, DEFAULT_BASE_URL};

use crate::types::SearchDeployment;
use async_trait::async_trait;
use thiserror::Error;

/// Error code the Atlas Admin API reports once a search deployment is gone
pub const DEPLOYMENT_DOES_NOT_EXIST: &str = "ATLAS_FTS_DEPLOYMENT_DOES_NOT_EXIST";

/// Failure of a single status request, before any classification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
    /// No usable response. `transient` marks failures worth retrying (connect, timeouts).
    #[error("transport error: {message}")]
    Transport { message: String, transient: bool },
    /// A 2xx response whose body is not a search deployment
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>, transient: bool) -> Self {
        Self::Transport {
            message: message.into(),
            transient,
        }
    }

    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode(_) => None,
        }
    }
}

/// One remote "get search deployment" query.
///
/// Injected by the caller; the waiters never build requests themselves.
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<SearchDeployment, FetchError>;
}
