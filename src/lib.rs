//! APK Finder Core Library
//!
//! This library locates the download artifact for an Android package on
//! third-party mirror sources. Callers fetch the mirror page or API response
//! themselves; the library turns that payload plus a request (architecture,
//! density, package format, version) into a download locator, a version list,
//! or a distinguished "not found" outcome.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Payload decoding and HTML text/attribute extraction primitives
//! - [`resolver`] - Architecture fallback resolution and the per-source adapters

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod parser;
pub mod resolver;

// Re-export commonly used types
pub use parser::{MAX_PAYLOAD_BYTES, ParseError, decode_payload};
pub use resolver::{
    ApkMirrorSource, ApkPureSource, AptoideSource, ArchPolicy, ArchitectureFallbackChain,
    BundleType, CandidateEntry, CandidateSource, RequestedVersion, ResolutionRequest,
    ResolutionResult, UptodownSource,
};
