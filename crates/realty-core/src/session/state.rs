//! Session state types for the query lifecycle.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::query::Query;
use super::result::AnalysisResult;

/// Identifies one outbound analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents the current state of the query session.
///
/// Exactly one variant holds at any time. `Idle`, `Success` and `Error` are rest
/// states waiting for the next query; `Pending` is the only state with a
/// request in flight. The result is shared behind an `Arc` so snapshots handed
/// to renderers are cheap to clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionState {
    /// No query has been submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending {
        /// Request that will settle this state.
        request_id: RequestId,
        /// The query being analyzed.
        query: Query,
    },
    /// The last request produced a normalized result.
    Success(Arc<AnalysisResult>),
    /// The last request failed; carries the user-facing notice.
    Error(String),
}

impl SessionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// True while `request_id` is the request in flight.
    pub fn is_pending_for(&self, request_id: RequestId) -> bool {
        matches!(self, Self::Pending { request_id: current, .. } if *current == request_id)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Short label used in logs and the status command.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn test_pending_matches_only_its_request() {
        let request_id = RequestId::new();
        let state = SessionState::Pending {
            request_id,
            query: Query::parse("Wakad").unwrap(),
        };
        assert!(state.is_pending_for(request_id));
        assert!(!state.is_pending_for(RequestId::new()));
        assert!(state.result().is_none());
    }

    #[test]
    fn test_state_serialization_roundtrip() {
        let original = SessionState::Success(Arc::new(AnalysisResult {
            summary: "Wakad is trending up".to_string(),
            ..Default::default()
        }));

        let json_string = serde_json::to_string(&original).unwrap();
        let deserialized: SessionState = serde_json::from_str(&json_string).unwrap();

        assert_eq!(original, deserialized);
        assert_eq!(deserialized.label(), "success");
    }
}
