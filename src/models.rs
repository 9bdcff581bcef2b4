use serde::Serialize;

// JSON error envelope matching what the upstream API emits, so callers see
// one consistent shape whether the failure is local or passed through.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize, Debug)]
pub struct ErrorDetail {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time_hours: Option<f64>,
}

impl ErrorBody {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                kind: None,
                message: message.into(),
                remaining_time_hours: None,
            },
        }
    }

    pub fn rate_limited(reset_hours: f64) -> Self {
        Self {
            error: ErrorDetail {
                kind: Some("rate_limit_exceeded"),
                message: "Daily limit reached".to_string(),
                remaining_time_hours: Some(reset_hours),
            },
        }
    }
}

/// Body of the optimistic `/usage` snapshot.
#[derive(Serialize, Debug)]
pub struct UsageResponse {
    pub uses_remaining: u32,
    pub reset_time_hours: f64,
    pub note: &'static str,
}
