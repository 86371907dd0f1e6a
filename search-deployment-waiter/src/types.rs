//! Search deployment model as reported by the Atlas Admin API

use crate::polling::ReportsState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal stable state: the deployment is ready for use.
pub const IDLE_STATE: &str = "IDLE";
/// The deployment is being provisioned, resized or torn down.
pub const UPDATING_STATE: &str = "UPDATING";

/// Size and count of the search nodes in one deployment spec.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNodeSpec {
    /// Hardware tier, e.g. "S20_HIGHCPU_NVME"
    pub instance_size: String,
    pub node_count: u32,
}

/// One point-in-time snapshot of a search deployment.
///
/// `state_name` is kept exactly as reported. An absent label and an empty label
/// both map to [`DeploymentState::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDeployment {
    /// Owning project id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Deployment id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub specs: Vec<SearchNodeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
}

impl SearchDeployment {
    /// Interpret the reported state label
    pub fn state(&self) -> DeploymentState {
        DeploymentState::from_label(self.state_name.as_deref())
    }
}

impl ReportsState for SearchDeployment {
    fn state_label(&self) -> Option<&str> {
        self.state_name.as_deref()
    }
}

/// Interpreted state label of a search deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentState {
    Idle,
    Updating,
    /// No label, or an empty one. The remote never reports this in normal operation.
    Unknown,
    /// Any label outside the known set
    Unrecognized(String),
}

impl DeploymentState {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None | Some("") => Self::Unknown,
            Some(IDLE_STATE) => Self::Idle,
            Some(UPDATING_STATE) => Self::Updating,
            Some(other) => Self::Unrecognized(other.to_string()),
        }
    }

    /// The label as reported by the remote ("" for unknown)
    pub fn label(&self) -> &str {
        match self {
            Self::Idle => IDLE_STATE,
            Self::Updating => UPDATING_STATE,
            Self::Unknown => "",
            Self::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "<unknown>"),
            other => write!(f, "{}", other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_label() {
        assert_eq!(DeploymentState::from_label(Some("IDLE")), DeploymentState::Idle);
        assert_eq!(
            DeploymentState::from_label(Some("UPDATING")),
            DeploymentState::Updating
        );
        assert_eq!(
            DeploymentState::from_label(Some("PAUSED")),
            DeploymentState::Unrecognized("PAUSED".to_string())
        );
    }

    #[test]
    fn test_empty_and_absent_labels_are_unknown() {
        assert_eq!(DeploymentState::from_label(None), DeploymentState::Unknown);
        assert_eq!(DeploymentState::from_label(Some("")), DeploymentState::Unknown);

        // Labels are case sensitive
        assert_eq!(
            DeploymentState::from_label(Some("idle")),
            DeploymentState::Unrecognized("idle".to_string())
        );
    }

    #[test]
    fn test_missing_state_name_deserializes_as_none() {
        let parsed: SearchDeployment =
            serde_json::from_str(r#"{"groupId":"p1","specs":[]}"#).expect("should parse");
        assert_eq!(parsed.state_name, None);
        assert_eq!(parsed.state(), DeploymentState::Unknown);

        let parsed: SearchDeployment =
            serde_json::from_str(r#"{"groupId":"p1","stateName":""}"#).expect("should parse");
        assert_eq!(parsed.state_name.as_deref(), Some(""));
        assert_eq!(parsed.state(), DeploymentState::Unknown);
    }

    #[test]
    fn test_serializes_camel_case() {
        let deployment = SearchDeployment {
            group_id: Some("p1".to_string()),
            id: None,
            specs: vec![SearchNodeSpec {
                instance_size: "S30_HIGHCPU_NVME".to_string(),
                node_count: 3,
            }],
            state_name: Some(UPDATING_STATE.to_string()),
        };
        let json = serde_json::to_value(&deployment).unwrap();
        assert_eq!(json["groupId"], "p1");
        assert_eq!(json["specs"][0]["instanceSize"], "S30_HIGHCPU_NVME");
        assert_eq!(json["specs"][0]["nodeCount"], 3);
        assert_eq!(json["stateName"], "UPDATING");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(DeploymentState::Unknown.to_string(), "<unknown>");
        assert_eq!(DeploymentState::Idle.to_string(), "IDLE");
    }
}
