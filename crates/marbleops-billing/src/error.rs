//! # Billing Errors
//!
//! Error type for the billing layer and the serialized form the dashboard
//! receives.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  ├──► BillingError ──► ErrorResponse    │
//! │  io / toml / bad settings ───────┘                     { code, message }│
//! │                                                                         │
//! │  code = "INVALID_INPUT"  form shows message inline, blocks submit       │
//! │  code = "CONFIG_ERROR"   settings page needs fixing                     │
//! │  code = "INTERNAL"       generic toast; details only in the log         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use marbleops_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Convenience alias.
pub type BillingResult<T> = Result<T, BillingError>;

/// Errors from the billing layer.
#[derive(Debug, Error)]
pub enum BillingError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Tax computation rejected the input.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Settings are present but inconsistent or unusable.
    #[error("Invalid billing configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse billing.toml.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write billing.toml.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Other Errors
    // =========================================================================
    /// Logging could not be initialized.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl From<std::io::Error> for BillingError {
    fn from(err: std::io::Error) -> Self {
        BillingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for BillingError {
    fn from(err: toml::de::Error) -> Self {
        BillingError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for BillingError {
    fn from(err: toml::ser::Error) -> Self {
        BillingError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Response
// =============================================================================

/// Error codes for dashboard responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quantity, price, rate, dimensions, state code or GSTIN rejected.
    InvalidInput,
    /// Billing settings are missing or inconsistent.
    ConfigError,
    /// Anything else.
    Internal,
}

/// What the dashboard receives when a quote fails.
///
/// ```json
/// { "code": "INVALID_INPUT", "message": "Invalid input on line 2: quantity must be positive" }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            code,
            message: message.into(),
        }
    }
}

impl From<BillingError> for ErrorResponse {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Core(e) => ErrorResponse::new(ErrorCode::InvalidInput, e.to_string()),
            BillingError::InvalidConfig(_)
            | BillingError::ConfigLoadFailed(_)
            | BillingError::ConfigSaveFailed(_) => {
                ErrorResponse::new(ErrorCode::ConfigError, err.to_string())
            }
            BillingError::Logging(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Logging setup failed: {}", e);
                ErrorResponse::new(ErrorCode::Internal, "Internal error")
            }
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;
    use marbleops_core::ValidationError;

    #[test]
    fn test_core_error_maps_to_invalid_input() {
        let err = BillingError::from(CoreError::InvalidLine {
            index: 1,
            source: ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        });
        let resp = ErrorResponse::from(err);
        assert_eq!(resp.code, ErrorCode::InvalidInput);
        assert_eq!(resp.message, "Invalid input on line 2: quantity must be positive");
    }

    #[test]
    fn test_config_errors_map_to_config_error() {
        let resp = ErrorResponse::from(BillingError::InvalidConfig("no seller".into()));
        assert_eq!(resp.code, ErrorCode::ConfigError);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let resp = ErrorResponse::from(BillingError::from(io));
        assert_eq!(resp.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_response_json_shape() {
        let resp = ErrorResponse::new(ErrorCode::InvalidInput, "GST rate must be one of: [\"0%\"]");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], "INVALID_INPUT");
        assert!(json["message"].as_str().unwrap().starts_with("GST rate"));
    }
}
