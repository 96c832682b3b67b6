//! # Error Types
//!
//! Domain-specific error types for marbleops-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  marbleops-core errors (this file)                                     │
//! │  ├── CoreError        - Rejected tax computation                       │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  marbleops-billing errors (separate crate)                             │
//! │  ├── BillingError     - Config / IO failures around the core           │
//! │  └── ErrorResponse    - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BillingError → ErrorResponse      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Kind Only
//! Tax math is pure, so the only thing that can go wrong is bad input.
//! Every `CoreError` reports [`ErrorKind::InvalidInput`]; the variants only
//! differ in how much context they carry (which line, which field).

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Machine-readable classification of a core error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Quantity, price, rate, dimensions, state code or GSTIN rejected.
    InvalidInput,
}

impl ErrorKind {
    /// Returns the wire code (`"INVALID_INPUT"`).
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// A tax computation that was rejected.
///
/// ## User Workflow
/// ```text
/// Invoice form, line 3: quantity = 0
///      │
///      ▼
/// compute_document_totals(...)
///      │
///      ▼
/// CoreError::InvalidLine { index: 2, source: MustBePositive { "quantity" } }
///      │
///      ▼
/// Form layer decides: highlight row 3, disable "Save"
/// ```
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single input (line item, state code, GSTIN) failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// One line of a multi-line document failed validation.
    ///
    /// `index` is zero-based, in the order the lines were supplied.
    #[error("Invalid input on line {}: {source}", index + 1)]
    InvalidLine {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// A draft document has no line with this id.
    #[error("Invalid input: document line {0} not found")]
    LineNotFound(String),

    /// A draft document is already at its line limit.
    #[error("Invalid input: document cannot have more than {max} lines")]
    TooManyLines { max: usize },
}

impl CoreError {
    /// Every core error is an input error.
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }

    /// Attaches a line index to a validation failure.
    pub(crate) fn on_line(index: usize, err: CoreError) -> CoreError {
        match err {
            CoreError::InvalidInput(source) => CoreError::InvalidLine { index, source },
            other => other,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when form input doesn't meet requirements.
/// Used for early validation before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Invalid format (e.g. malformed GSTIN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Arithmetic left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = CoreError::InvalidLine {
            index: 2,
            source: ValidationError::Negative {
                field: "unit price".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid input on line 3: unit price cannot be negative"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "state code".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidInput);
        assert_eq!(core_err.kind().code(), "INVALID_INPUT");
    }

    #[test]
    fn test_on_line_wraps_only_validation_errors() {
        let err = CoreError::on_line(
            4,
            CoreError::InvalidInput(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }),
        );
        assert!(matches!(err, CoreError::InvalidLine { index: 4, .. }));

        let err = CoreError::on_line(4, CoreError::TooManyLines { max: 200 });
        assert!(matches!(err, CoreError::TooManyLines { max: 200 }));
    }
}
