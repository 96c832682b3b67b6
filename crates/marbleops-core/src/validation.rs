//! # Validation Module
//!
//! Input checks that run before any tax arithmetic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form (TypeScript)                                  │
//! │  ├── Required fields, numeric inputs                                   │
//! │  └── Immediate inline feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity > 0, unit price ≥ 0                                      │
//! │  ├── GST rate in {0, 5, 12, 18, 28}                                    │
//! │  └── slab dimensions > 0, state code present                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: tax::compute_* (assumes valid input)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use marbleops_core::validation::{validate_gst_rate, validate_quantity};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_quantity(Decimal::new(25, 1)).is_ok()); // 2.5 boxes
//! assert!(validate_gst_rate(18).is_ok());
//! assert!(validate_gst_rate(15).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Dimensions, GstRate, LineItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be strictly positive. Fractions are fine (2.5 boxes of tiles).
pub fn validate_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed (free samples still go on the challan)
///
/// ## Example
/// ```rust
/// use marbleops_core::money::Money;
/// use marbleops_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_rupees(750)).is_ok());
/// assert!(validate_unit_price(Money::zero()).is_ok());
/// assert!(validate_unit_price(Money::from_paise(-1)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates a GST percentage and resolves it to a slab.
pub fn validate_gst_rate(percent: u32) -> ValidationResult<GstRate> {
    GstRate::try_from(percent)
}

/// Validates slab dimensions.
///
/// ## Rules
/// - Length and width must both be strictly positive.
pub fn validate_dimensions(dims: &Dimensions) -> ValidationResult<()> {
    if dims.length <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "length".to_string(),
        });
    }

    if dims.width <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "width".to_string(),
        });
    }

    Ok(())
}

/// Validates a whole line item, returning its resolved slab.
///
/// Checks run in form order: quantity, price, rate, dimensions. The first
/// failure is reported.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<GstRate> {
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price)?;
    let rate = validate_gst_rate(item.gst_rate_percent)?;

    if let Some(dims) = &item.dimensions {
        validate_dimensions(dims)?;
    }

    Ok(rate)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a state code.
///
/// ## Rules
/// - Must not be empty after trimming
///
/// Unknown codes are accepted; the supply-type check is a plain comparison
/// and some parties are recorded by state abbreviation.
pub fn validate_state_code(field: &str, code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
