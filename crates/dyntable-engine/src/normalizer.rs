//! Maps engine results onto the uniform response envelope.
//!
//! Client faults (validation, not-found) carry their message outward
//! verbatim. Store faults are logged with full detail and replaced by a
//! generic message so backend internals never leak to callers.

use crate::error::{EngineError, Result};
use crate::results::BatchSummary;
use dyntable_commons::ApiResponse;
use log::error;

const SERVER_FAULT_MESSAGE: &str = "An error occurred";

/// Normalize an operation result into a response envelope.
pub fn to_response<T>(result: Result<T>, success_message: impl Into<String>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::ok(success_message, data),
        Err(err) => to_error_response(err),
    }
}

/// Normalize a batch result: the envelope reports failure when any chunk
/// failed, even though the summary itself is returned.
pub fn batch_to_response(
    result: Result<BatchSummary>,
    success_message: impl Into<String>,
) -> ApiResponse<BatchSummary> {
    match result {
        Ok(summary) if summary.success() => ApiResponse::ok(success_message, summary),
        Ok(summary) => {
            let message = format!(
                "{} of {} items processed, {} failed",
                summary.total_processed, summary.total_requested, summary.total_errors
            );
            ApiResponse {
                success: false,
                message,
                data: Some(summary),
            }
        }
        Err(err) => to_error_response(err),
    }
}

fn to_error_response<T>(err: EngineError) -> ApiResponse<T> {
    if err.is_client_fault() {
        ApiResponse::error(err.to_string())
    } else {
        error!("{err}");
        ApiResponse::error(SERVER_FAULT_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::BatchErrorDetail;
    use dyntable_store::StoreError;

    #[test]
    fn test_success_envelope() {
        let resp = to_response(Ok(5u32), "Item created successfully");
        assert!(resp.success);
        assert_eq!(resp.message, "Item created successfully");
        assert_eq!(resp.data, Some(5));
    }

    #[test]
    fn test_client_fault_message_passes_through() {
        let resp: ApiResponse<u32> = to_response(
            Err(EngineError::validation("Record is required")),
            "unused",
        );
        assert!(!resp.success);
        assert_eq!(resp.message, "Record is required");
    }

    #[test]
    fn test_store_fault_is_masked() {
        let resp: ApiResponse<u32> = to_response(
            Err(EngineError::Store(StoreError::Backend(
                "secret endpoint timed out".to_string(),
            ))),
            "unused",
        );
        assert!(!resp.success);
        assert_eq!(resp.message, SERVER_FAULT_MESSAGE);
    }

    #[test]
    fn test_partial_batch_failure_flips_success() {
        let summary = BatchSummary {
            total_requested: 30,
            total_processed: 25,
            total_errors: 5,
            errors: vec![BatchErrorDetail {
                chunk_index: 1,
                item_count: 5,
                error: "backend error: throttled".to_string(),
            }],
            duplicates_removed: 0,
        };
        let resp = batch_to_response(Ok(summary), "unused");
        assert!(!resp.success);
        assert!(resp.message.contains("25 of 30"));
        assert!(resp.data.is_some());
    }
}
