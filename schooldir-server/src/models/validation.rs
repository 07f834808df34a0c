//! Validation error types

use std::fmt;

/// Validation error for incoming school records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trimming
    Missing { field: &'static str },

    /// Field doesn't match its required format
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::InvalidFormat { reason, .. } => f.write_str(reason),
        }
    }
}

impl std::error::Error for ValidationError {}
