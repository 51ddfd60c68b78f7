//! Error types for payload decoding and selector compilation.

use thiserror::Error;

/// Maximum payload size accepted from a mirror page or API response.
/// Larger payloads are rejected before parsing to keep the scan bounded.
pub const MAX_PAYLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Errors that can occur while turning raw input into a parseable payload.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// Payload bytes are not valid UTF-8
    #[error("payload is not valid UTF-8 (invalid byte at offset {offset})\n  Suggestion: {suggestion}")]
    InvalidEncoding {
        /// Byte offset of the first invalid sequence
        offset: usize,
        /// How to fix the issue
        suggestion: String,
    },

    /// Payload exceeds the maximum accepted size
    #[error(
        "payload too large ({length} bytes, max {max})\n  Suggestion: Pass a single mirror page or API response, not a concatenation"
    )]
    PayloadTooLarge {
        /// Actual length in bytes
        length: usize,
        /// Maximum allowed
        max: usize,
    },

    /// CSS selector could not be compiled
    #[error("invalid CSS selector '{selector}': {reason}\n  Suggestion: {suggestion}")]
    InvalidSelector {
        /// The selector that failed to compile
        selector: String,
        /// Why compilation failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },
}

impl ParseError {
    /// Creates an `InvalidEncoding` error for a payload that failed UTF-8 validation.
    #[must_use]
    pub fn invalid_encoding(offset: usize) -> Self {
        Self::InvalidEncoding {
            offset,
            suggestion: "Re-fetch the page and pipe the raw response body unchanged".to_string(),
        }
    }

    /// Creates a `PayloadTooLarge` error.
    #[must_use]
    pub fn too_large(length: usize) -> Self {
        Self::PayloadTooLarge {
            length,
            max: MAX_PAYLOAD_BYTES,
        }
    }

    /// Creates an `InvalidSelector` error.
    #[must_use]
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
            suggestion: "Check the selector syntax (e.g. `div.class`, `a#id`, `span[data-x]`)"
                .to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_invalid_encoding_message() {
        let err = ParseError::invalid_encoding(17);
        let msg = err.to_string();
        assert!(msg.contains("UTF-8"), "should mention encoding");
        assert!(msg.contains("17"), "should contain offset");
        assert!(msg.contains("Suggestion"), "should have suggestion");
    }

    #[test]
    fn test_parse_error_too_large_message() {
        let err = ParseError::too_large(MAX_PAYLOAD_BYTES + 1);
        let msg = err.to_string();
        assert!(msg.contains(&(MAX_PAYLOAD_BYTES + 1).to_string()));
        assert!(msg.contains(&MAX_PAYLOAD_BYTES.to_string()));
    }

    #[test]
    fn test_parse_error_invalid_selector_message() {
        let err = ParseError::invalid_selector("div..x", "unexpected token");
        let msg = err.to_string();
        assert!(msg.contains("div..x"), "should contain selector");
        assert!(msg.contains("unexpected token"), "should contain reason");
    }

    #[test]
    fn test_parse_error_clone() {
        let err = ParseError::invalid_selector("p[", "eof");
        assert_eq!(err.to_string(), err.clone().to_string());
    }
}
