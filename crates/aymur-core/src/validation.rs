//! # Validation Module
//!
//! Boundary input validation for Aymur.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: State containers (aymur-state)                               │
//! │  └── THIS MODULE: Business rule validation before a mutation runs      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: The engines (cart, permissions)                              │
//! │  └── Non-throwing by contract; trust already-validated input and       │
//! │      degrade fail-closed on anything else                              │
//! │                                                                         │
//! │  Defense in depth: caps and formats are rejected HERE so the engine    │
//! │  transitions below stay total functions                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aymur_core::validation::{validate_quantity, validate_percentage_bps};
//!
//! // Validate quantity before a cart mutation
//! validate_quantity(5).unwrap();
//!
//! // Validate a percentage discount entered at the register
//! validate_percentage_bps(1000).unwrap(); // 10%
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (gifted items)
///
/// ## Example
/// ```rust
/// use aymur_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(125_000).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a percentage discount in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_percentage_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a fixed discount amount in cents.
///
/// ## Rules
/// - Must be non-negative; the engine clamps it against the base, so any
///   non-negative amount is acceptable here
pub fn validate_fixed_discount_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
/// - Most jurisdictions are 0-2500 (0% to 25%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a held-order label.
///
/// ## Rules
/// - May be empty (labels are optional; empty becomes "no label")
/// - Maximum 80 characters
///
/// ## Returns
/// The trimmed label, or `None` when blank.
pub fn validate_label(label: &str) -> ValidationResult<Option<String>> {
    let label = label.trim();

    if label.len() > 80 {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: 80,
        });
    }

    if label.is_empty() {
        Ok(None)
    } else {
        Ok(Some(label.to_string()))
    }
}

/// Validates cart notes.
///
/// ## Rules
/// - May be empty
/// - Maximum 500 characters
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: 500,
        });
    }

    Ok(())
}

/// Validates an ISO 4217 currency code.
///
/// ## Rules
/// - Exactly 3 ASCII uppercase letters ("PKR", "USD", "AED")
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency_code".to_string(),
            reason: "must be 3 uppercase letters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines) before adding a NEW line.
///
/// ## Rules
/// - Must not exceed MAX_CART_LINES (100)
/// - Coalescing onto an existing line is always allowed
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
