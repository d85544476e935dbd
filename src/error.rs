// Copyright (c) 2025 Kona Bloom Authors
//
// Licensed under the MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)

//! Error types for the Bloom filter family.

/// Errors that can occur in Bloom filter operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum BloomFilterError {
    /// A construction parameter was out of range: zero slots or probes,
    /// zero expected items, or a false-positive rate outside (0, 1).
    #[error("Invalid filter parameter: {0}")]
    InvalidParameter(String),

    /// Element serialization failed inside a serializing hash family.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for Bloom filter operations.
pub type Result<T> = std::result::Result<T, BloomFilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BloomFilterError::InvalidParameter("m must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid filter parameter: m must be positive");

        let err = BloomFilterError::Serialization("unsupported value".to_string());
        assert_eq!(err.to_string(), "Serialization error: unsupported value");
    }

    #[test]
    fn test_error_equality() {
        let err1 = BloomFilterError::InvalidParameter("k".to_string());
        let err2 = BloomFilterError::InvalidParameter("k".to_string());
        let err3 = BloomFilterError::Serialization("k".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
