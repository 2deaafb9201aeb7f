use serde::{Deserialize, Serialize};

/// Uniform response envelope returned by every generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Per-call accounting attached to a response.
///
/// `tokens_estimated` is set when the provider did not report usage and the
/// count was approximated from the output word count. Such counts are not
/// billing-accurate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub tokens_used: u32,
    #[serde(default)]
    pub tokens_estimated: bool,
    pub latency_ms: u64,
    pub model: String,
    pub cached: bool,
}

impl ResponseMetadata {
    /// Metadata for a failed call: only the elapsed time is meaningful.
    pub fn latency_only(latency_ms: u64) -> Self {
        Self {
            latency_ms,
            ..Self::default()
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, metadata: ResponseMetadata) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: Some(metadata),
        }
    }

    pub fn failure(
        code: &str,
        message: impl Into<String>,
        metadata: Option<ResponseMetadata>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message: message.into(),
                trace_id: crate::error::current_trace_id(),
            }),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::ok(
            json!({"title": "x"}),
            ResponseMetadata {
                tokens_used: 42,
                tokens_estimated: false,
                latency_ms: 120,
                model: "gpt-4o-mini".to_string(),
                cached: false,
            },
        );
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["title"], "x");
        assert!(value["error"].is_null());
        assert_eq!(value["metadata"]["tokens_used"], 42);
        assert_eq!(value["metadata"]["cached"], false);
    }

    #[test]
    fn test_failure_envelope_shape() {
        let resp = ApiResponse::<()>::failure(
            "GENERATION_FAILED",
            "boom",
            Some(ResponseMetadata::latency_only(15)),
        );
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["data"].is_null());
        assert_eq!(value["error"]["code"], "GENERATION_FAILED");
        assert_eq!(value["error"]["message"], "boom");
        assert_eq!(value["metadata"]["latency_ms"], 15);
        assert_eq!(value["metadata"]["model"], "");
        assert_eq!(value["metadata"]["tokens_used"], 0);
    }
}
