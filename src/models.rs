use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub name: String,
    pub reason: String,
    pub date: String,
}

impl Report {
    pub fn new(name: String, reason: String, date: String) -> Self {
        Self {
            // Millisecond timestamp as the id. Uniqueness is assumed, not
            // enforced: two submissions in the same millisecond collide.
            id: Utc::now().timestamp_millis().to_string(),
            name,
            reason,
            date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub name: String,
    pub reason: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub report: Report,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}
