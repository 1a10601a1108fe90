//! HTTP DTOs for broadcast endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::BroadcastJobId;

/// Request to announce updated legal documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegalBroadcastRequest {
    #[serde(default)]
    pub include_terms: bool,
    #[serde(default)]
    pub include_policy: bool,
}

/// Answer to an accepted broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAcceptedResponse {
    pub job_id: BroadcastJobId,
}
