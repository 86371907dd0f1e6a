//! HTTP status fetcher for the Atlas Admin API search deployment endpoint
//!
//! Authentication is the caller's concern: hand in a configured `reqwest::Client`
//! and, optionally, a bearer token for service account access.

use crate::atlas::{FetchError, StatusFetcher};
use crate::types::SearchDeployment;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::ACCEPT;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com";

/// Versioned media type of the search deployment endpoint
const ATLAS_API_MEDIA_TYPE: &str = "application/vnd.atlas.2023-01-01+json";

/// Characters escaped inside one path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>');

/// Error payload returned by the Atlas Admin API on non-2xx responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    error_code: Option<String>,
    detail: Option<String>,
    reason: Option<String>,
}

/// Fetches search deployment status over HTTP
#[derive(Debug, Clone)]
pub struct AtlasSearchClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl AtlasSearchClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            access_token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    fn deployment_url(&self, project_id: &str, cluster_name: &str) -> String {
        format!(
            "{}/api/atlas/v2/groups/{}/clusters/{}/search/deployment",
            self.base_url.trim_end_matches('/'),
            utf8_percent_encode(project_id, PATH_SEGMENT),
            utf8_percent_encode(cluster_name, PATH_SEGMENT)
        )
    }
}

#[async_trait]
impl StatusFetcher for AtlasSearchClient {
    async fn fetch(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<SearchDeployment, FetchError> {
        let url = self.deployment_url(project_id, cluster_name);
        log::trace!("GET {url}");

        let mut request = self.http.get(&url).header(ACCEPT, ATLAS_API_MEDIA_TYPE);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            log::debug!("GET {url} returned HTTP {}: {message}", status.as_u16());
            return Err(FetchError::api(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    let transient = e.is_timeout() || e.is_connect() || e.is_body();
    FetchError::transport(e.to_string(), transient)
}

/// Render an Atlas error payload so the error code stays matchable, falling back
/// to the raw body for non-JSON responses
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(trimmed) else {
        return Some(trimmed.to_string());
    };

    let mut message = match (parsed.error_code, parsed.detail) {
        (Some(code), Some(detail)) => format!("{code}: {detail}"),
        (Some(code), None) => code,
        (None, Some(detail)) => detail,
        (None, None) => trimmed.to_string(),
    };
    if let Some(reason) = parsed.reason {
        message.push_str(&format!(" ({reason})"));
    }
    Some(message)
}
