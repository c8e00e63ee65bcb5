//! Uniform response envelope returned by every engine operation.

use serde::{Deserialize, Serialize};

/// Outward envelope: a boolean outcome, a human-readable message and an
/// optional payload. Error paths never leak backend-native error shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Successful response without a payload.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Failed response; `data` stays empty.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let resp = ApiResponse::ok("Item created successfully", 7u32);
        assert!(resp.success);
        assert_eq!(resp.data, Some(7));
    }

    #[test]
    fn test_error_envelope_omits_data() {
        let resp: ApiResponse<u32> = ApiResponse::error("Record is required");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("data"));
        assert!(json.contains("\"success\":false"));
    }
}
