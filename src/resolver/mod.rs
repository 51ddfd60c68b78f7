//! APK variant resolution across third-party mirror sources.
//!
//! Each source adapter turns one already-fetched payload (HTML page, HTML
//! fragment, or JSON API response) into [`CandidateEntry`] rows and then
//! into a single decision: a download locator, a version list, or a
//! distinguished "not found" outcome. Nothing here performs network I/O.
//!
//! # Architecture
//!
//! - [`CandidateSource`] - Trait every adapter implements to expose its candidate rows
//! - [`ArchPolicy`] - Architecture fallback expansion and first-match selection
//! - [`ApkMirrorSource`] - Variant table rows (bundle type, architecture, density)
//! - [`ApkPureSource`] - Latest-version, version-list and download pages
//! - [`AptoideSource`] - JSON search, list-versions and metadata endpoints
//! - [`UptodownSource`] - Architecture label followed by an adjacent file-id element
//!
//! # Example
//!
//! ```
//! use apk_finder_core::resolver::{
//!     ApkMirrorSource, BundleType, ResolutionRequest, ResolutionResult,
//! };
//!
//! let html = r#"<div class="table-row headerFont">
//!   <div><a href="/apk/app/v1-release/">v1</a></div>
//!   <div>10MB</div><div>APK</div><div>arm64-v8a</div><div>Android 5+</div><div>nodpi</div>
//! </div>"#;
//!
//! let request = ResolutionRequest::new("com.example.app")
//!     .with_arch("arm64-v8a")
//!     .with_density("nodpi")
//!     .with_bundle(BundleType::SingleApk);
//!
//! let result = ApkMirrorSource::new().resolve(html, &request);
//! assert_eq!(
//!     result,
//!     ResolutionResult::Found("https://www.apkmirror.com/apk/app/v1-release/".to_string())
//! );
//! ```

mod apkmirror;
mod apkpure;
mod aptoide;
pub mod arch;
mod uptodown;
mod utils;

pub use apkmirror::{ApkMirrorSource, DEFAULT_ORIGIN as APKMIRROR_DEFAULT_ORIGIN};
pub use apkpure::{ApkPureSource, DEFAULT_BASE_URL as APKPURE_DEFAULT_BASE_URL};
pub use aptoide::{
    AptoideSource, DEFAULT_API_BASE as APTOIDE_DEFAULT_API_BASE, DEFAULT_VERSIONS_LIMIT,
    arch_filter,
};
pub use arch::{ArchPolicy, ArchitectureFallbackChain, first_match};
pub use uptodown::UptodownSource;
pub use utils::{dedup_preserving_order, normalize_href};

use std::fmt;
use std::str::FromStr;

use crate::parser::ParseError;

/// Sentinel accepted wherever a version is requested.
pub const LATEST_VERSION: &str = "latest";

/// Whether a release is a single monolithic package or a split bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundleType {
    /// A single `.apk` file.
    #[default]
    SingleApk,
    /// A split-format bundle.
    SplitBundle,
}

impl BundleType {
    /// Returns the label mirrors print in their variant tables.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleApk => "APK",
            Self::SplitBundle => "BUNDLE",
        }
    }
}

impl fmt::Display for BundleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APK" => Ok(Self::SingleApk),
            "BUNDLE" => Ok(Self::SplitBundle),
            other => Err(format!("unknown bundle type '{other}' (expected APK or BUNDLE)")),
        }
    }
}

/// A requested version: the newest build, or an exact version name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestedVersion {
    /// Whatever the source currently lists as newest.
    #[default]
    Latest,
    /// An exact version name such as `19.16.39`.
    Exact(String),
}

impl RequestedVersion {
    /// Parses a version string; `latest` (any case) maps to [`RequestedVersion::Latest`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case(LATEST_VERSION) {
            Self::Latest
        } else {
            Self::Exact(value.trim().to_string())
        }
    }
}

impl fmt::Display for RequestedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST_VERSION),
            Self::Exact(version) => f.write_str(version),
        }
    }
}

/// Parameters for one resolution attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Android package identifier, e.g. `com.google.android.youtube`.
    pub package: String,
    /// Requested architecture token; `all` for any.
    pub arch: String,
    /// Requested screen density bucket (variant tables only).
    pub density: String,
    /// Requested package format (variant tables only).
    pub bundle: BundleType,
    /// Requested version.
    pub version: RequestedVersion,
}

impl ResolutionRequest {
    /// Creates a request for `package` with defaults: any architecture,
    /// `nodpi`, single APK, latest version.
    #[must_use]
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            arch: arch::WILDCARD_ARCH.to_string(),
            density: "nodpi".to_string(),
            bundle: BundleType::SingleApk,
            version: RequestedVersion::Latest,
        }
    }

    /// Sets the requested architecture.
    #[must_use]
    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    /// Sets the requested density.
    #[must_use]
    pub fn with_density(mut self, density: impl Into<String>) -> Self {
        self.density = density.into();
        self
    }

    /// Sets the requested bundle type.
    #[must_use]
    pub fn with_bundle(mut self, bundle: BundleType) -> Self {
        self.bundle = bundle;
        self
    }

    /// Sets the requested version.
    #[must_use]
    pub fn with_version(mut self, version: RequestedVersion) -> Self {
        self.version = version;
        self
    }
}

/// One candidate row or entry extracted from a source payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    /// Extracted text fields, in the order the source lays them out.
    pub fields: Vec<String>,
    /// Download locator (URL or opaque file identifier), if the entry carries one.
    pub locator: Option<String>,
    /// Position in the source document; lower wins ties.
    pub position: usize,
}

impl CandidateEntry {
    /// Creates a candidate entry.
    #[must_use]
    pub fn new(fields: Vec<String>, locator: Option<String>, position: usize) -> Self {
        Self {
            fields,
            locator,
            position,
        }
    }

    /// Returns the field at `index`, if present.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// Final decision of a table-based resolution.
#[derive(Debug, Clone)]
pub enum ResolutionResult {
    /// A matching variant was found at this locator.
    Found(String),
    /// The variant table was present but no row matched.
    NoMatchInTable,
    /// No variant table was present at all.
    NoTableFound,
    /// The payload could not be parsed.
    ParseFailure(ParseError),
}

impl ResolutionResult {
    /// Returns the locator when the outcome is [`ResolutionResult::Found`].
    #[must_use]
    pub fn locator(&self) -> Option<&str> {
        match self {
            Self::Found(locator) => Some(locator),
            _ => None,
        }
    }

    /// Short outcome label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NoMatchInTable => "no_match_in_table",
            Self::NoTableFound => "no_table_found",
            Self::ParseFailure(_) => "parse_failure",
        }
    }
}

impl PartialEq for ResolutionResult {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Found(lhs), Self::Found(rhs)) => lhs == rhs,
            (Self::ParseFailure(lhs), Self::ParseFailure(rhs)) => {
                lhs.to_string() == rhs.to_string()
            }
            _ => self.label() == other.label(),
        }
    }
}

impl Eq for ResolutionResult {}

/// Trait that all source adapters implement.
///
/// An adapter exposes the candidate rows it can see in a payload; the
/// source-specific operations then select among them.
pub trait CandidateSource {
    /// Returns the source name (e.g. "apkmirror", "uptodown").
    fn name(&self) -> &'static str;

    /// Extracts every candidate entry from `payload`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] only when the payload cannot be scanned at all.
    fn candidates(&self, payload: &str) -> Result<Vec<CandidateEntry>, ParseError>;
}
