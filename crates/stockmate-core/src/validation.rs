//! # Validation Module
//!
//! Form-layer checks that run before a weighing is evaluated or a master
//! record is saved.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  ├── Required fields, numeric inputs                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── gross > 0, dozens > 0, tare >= 0, finite numbers                  │
//! │  └── master record fields (codes, names, contact numbers)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: tolerance::evaluate                                          │
//! │  └── Assumes validated input; computes only                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockmate_core::validation::{validate_dozens, validate_gross_weight};
//!
//! assert!(validate_gross_weight(12.5).is_ok());
//! assert!(validate_gross_weight(0.0).is_err());
//! assert!(validate_dozens(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::tolerance::WeighingInput;
use crate::types::{BagTypeForm, ItemForm, PolisherForm};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 100;
const MAX_CODE_LEN: usize = 20;

// =============================================================================
// Numeric Validators
// =============================================================================

fn finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> ValidationResult<()> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> ValidationResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Gross weight must be a finite number greater than zero.
pub fn validate_gross_weight(kg: f64) -> ValidationResult<()> {
    positive("Gross weight", kg)
}

/// Bag (tare) weight must be finite and zero or greater.
pub fn validate_bag_weight(kg: f64) -> ValidationResult<()> {
    non_negative("Bag weight", kg)
}

/// Dozens must be greater than zero.
pub fn validate_dozens(dozens: u32) -> ValidationResult<()> {
    if dozens == 0 {
        return Err(ValidationError::MustBePositive {
            field: "Dozens".to_string(),
        });
    }
    Ok(())
}

/// Standard weight per dozen must be finite and zero or greater.
pub fn validate_standard_weight(kg: f64) -> ValidationResult<()> {
    non_negative("Standard weight", kg)
}

/// Validates all four numbers of a weighing before evaluation.
///
/// ## User Workflow
/// ```text
/// Entry form submit
///      │
///      ▼
/// validate_weighing_input ← THIS FUNCTION
///      │
///      ├── gross <= 0?  → "Gross weight must be greater than 0"
///      ├── dozens == 0? → "Dozens must be greater than 0"
///      │
///      └── OK → ToleranceEngine::evaluate
/// ```
pub fn validate_weighing_input(input: &WeighingInput) -> ValidationResult<()> {
    validate_gross_weight(input.gross_weight)?;
    validate_bag_weight(input.bag_weight)?;
    validate_dozens(input.dozens)?;
    validate_standard_weight(input.standard_weight_per_dozen)?;
    Ok(())
}

/// Tolerance fraction must be finite and in `[0, 1)`.
///
/// 0 means "exact weight only"; 1 or more would accept an empty bag.
pub fn validate_tolerance_fraction(fraction: f64) -> ValidationResult<()> {
    finite("Tolerance", fraction)?;
    if !(0.0..1.0).contains(&fraction) {
        return Err(ValidationError::OutOfRange {
            field: "Tolerance".to_string(),
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item code (e.g., "C001").
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Letters, numbers, hyphens, underscores only
pub fn validate_item_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("Item code"));
    }

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "Item code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "Item code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name field (item name, bag type, polisher name).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a polisher contact number.
///
/// ## Rules
/// - 7 to 15 digits
/// - Optional leading `+`, spaces and hyphens allowed as separators
pub fn validate_contact_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::required("Contact number"));
    }

    let body = number.strip_prefix('+').unwrap_or(number);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "Contact number".to_string(),
            reason: "must contain only digits, spaces, and hyphens".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "Contact number".to_string(),
            reason: "must have between 7 and 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use stockmate_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required("id"));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

impl ItemForm {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_item_code(&self.code)?;
        validate_name("Item name", &self.name)?;
        validate_standard_weight(self.standard_weight)
    }
}

impl BagTypeForm {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("Bag type name", &self.name)?;
        validate_bag_weight(self.weight)
    }
}

impl PolisherForm {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_name("First name", &self.first_name)?;
        validate_name("Last name", &self.last_name)?;
        validate_contact_number(&self.contact_number)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_gross_weight() {
        assert!(validate_gross_weight(0.001).is_ok());
        assert!(validate_gross_weight(25.0).is_ok());

        assert!(validate_gross_weight(0.0).is_err());
        assert!(validate_gross_weight(-1.0).is_err());
        assert!(matches!(
            validate_gross_weight(f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_bag_weight() {
        assert!(validate_bag_weight(0.0).is_ok());
        assert!(validate_bag_weight(1.6).is_ok());
        assert!(validate_bag_weight(-0.1).is_err());
        assert!(validate_bag_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_weighing_input() {
        let mut input = WeighingInput {
            gross_weight: 10.2,
            bag_weight: 0.6,
            dozens: 12,
            standard_weight_per_dozen: 0.8,
        };
        assert!(validate_weighing_input(&input).is_ok());

        input.dozens = 0;
        let err = validate_weighing_input(&input).unwrap_err();
        assert_eq!(err.to_string(), "Dozens must be greater than 0");

        input.dozens = 12;
        input.standard_weight_per_dozen = 0.0;
        assert!(validate_weighing_input(&input).is_ok());
    }

    #[test]
    fn test_validate_tolerance_fraction() {
        assert!(validate_tolerance_fraction(0.02).is_ok());
        assert!(validate_tolerance_fraction(0.0).is_ok());
        assert!(validate_tolerance_fraction(1.0).is_err());
        assert!(validate_tolerance_fraction(-0.01).is_err());
        assert!(validate_tolerance_fraction(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_item_code() {
        assert!(validate_item_code("C001").is_ok());
        assert!(validate_item_code("RING_22-K").is_ok());

        assert!(validate_item_code("").is_err());
        assert!(validate_item_code("has space").is_err());
        assert!(validate_item_code(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_contact_number() {
        assert!(validate_contact_number("0771234567").is_ok());
        assert!(validate_contact_number("+94 77 123-4567").is_ok());

        assert!(validate_contact_number("").is_err());
        assert!(validate_contact_number("12345").is_err());
        assert!(validate_contact_number("077-CALL-ME").is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }

    #[test]
    fn test_form_validation() {
        let item = ItemForm {
            code: "C002".to_string(),
            name: "Item B".to_string(),
            standard_weight: 0.8,
        };
        assert!(item.validate().is_ok());

        let bag = BagTypeForm {
            name: "  ".to_string(),
            weight: 0.6,
        };
        assert!(matches!(bag.validate(), Err(ValidationError::Required { .. })));

        let polisher = PolisherForm {
            first_name: "Nimal".to_string(),
            last_name: "Perera".to_string(),
            contact_number: "0771234567".to_string(),
        };
        assert!(polisher.validate().is_ok());
    }
}
