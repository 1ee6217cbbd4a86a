// Shared HTTP response types for consistent API error payloads.

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    // Human-readable error string.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
