//! Error types shared across the fleet state crates
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Identifier validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VinError {
    #[error("empty vin")]
    Empty,

    #[error("malformed vin {0:?}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vin_error_display() {
        assert_eq!(VinError::Empty.to_string(), "empty vin");
        assert_eq!(
            VinError::Malformed("THE-VIN".to_string()).to_string(),
            "malformed vin \"THE-VIN\""
        );
    }
}
