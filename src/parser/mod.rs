//! Payload decoding and HTML extraction primitives.
//!
//! Mirror pages and API responses arrive as already-fetched bytes. This module
//! turns them into text ([`decode_payload`]) and provides the leaf operations
//! the source adapters are built from ([`html`]).
//!
//! # Example
//!
//! ```
//! use apk_finder_core::parser::{compile_selector, decode_payload, parse_document, scrape_text};
//!
//! let payload = decode_payload(b"<span class=\"v\">1.2.3</span>").unwrap();
//! let doc = parse_document(payload);
//! let selector = compile_selector("span.v").unwrap();
//! assert_eq!(scrape_text(&doc, &selector), vec!["1.2.3"]);
//! ```

mod error;
pub mod html;

pub use error::{MAX_PAYLOAD_BYTES, ParseError};
pub use html::{
    compile_selector, element_attribute, element_text, flatten_text, parse_document,
    parse_fragment, scrape_attribute, scrape_text,
};

use tracing::debug;

/// Validates raw payload bytes and returns them as text.
///
/// # Errors
///
/// Returns [`ParseError::PayloadTooLarge`] when the payload exceeds
/// [`MAX_PAYLOAD_BYTES`], or [`ParseError::InvalidEncoding`] when it is not UTF-8.
#[tracing::instrument(skip(bytes), fields(payload_len = bytes.len()))]
pub fn decode_payload(bytes: &[u8]) -> Result<&str, ParseError> {
    if bytes.len() > MAX_PAYLOAD_BYTES {
        debug!("Payload rejected: too large");
        return Err(ParseError::too_large(bytes.len()));
    }
    std::str::from_utf8(bytes).map_err(|e| ParseError::invalid_encoding(e.valid_up_to()))
}
