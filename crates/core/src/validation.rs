//! Payload checks for device writes.

use crate::error::CoreError;

/// Maximum length of a device name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Validate a device name: non-blank and at most [`MAX_NAME_LEN`] characters.
pub fn validate_device_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a daily price: finite and non-negative.
pub fn validate_price(price_per_day: f64) -> Result<(), CoreError> {
    if !price_per_day.is_finite() || price_per_day < 0.0 {
        return Err(CoreError::Validation(
            "price_per_day must be a non-negative number".into(),
        ));
    }
    Ok(())
}
