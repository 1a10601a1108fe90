//! HTTP DTOs for email endpoints.

use serde::{Deserialize, Serialize};

/// Request to send one email. Missing text fields arrive blank and are
/// rejected by the handler with 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomEmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// URL of a PDF to attach as `Report.pdf`.
    #[serde(default, alias = "attachmentUrl")]
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEmailResponse {
    pub success: bool,
    pub attachment_included: bool,
}
