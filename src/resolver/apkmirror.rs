//! APKMirror resolver for release-page variant tables.
//!
//! A release page lists one row per variant. Each row is a `div` carrying both
//! the `table-row` and `headerFont` classes; its flattened text nodes hold the
//! bundle type, architecture and density at fixed positions, and its first
//! child element links to the variant page.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use tracing::{debug, trace};

use crate::parser::html::{compile_static_selector, element_attribute, flatten_text};
use crate::parser::parse_document;

use super::arch::{ArchPolicy, first_match};
use super::utils::normalize_href;
use super::{CandidateEntry, CandidateSource, ParseError, ResolutionRequest, ResolutionResult};

/// Default APKMirror origin used to absolutize variant links.
pub const DEFAULT_ORIGIN: &str = "https://www.apkmirror.com";

/// Minimum flattened text fields a row needs to be considered.
const MIN_ROW_FIELDS: usize = 6;
const BUNDLE_FIELD: usize = 2;
const ARCH_FIELD: usize = 3;
const DENSITY_FIELD: usize = 5;

// Class matching is token-exact: `my-table-row` does not match `.table-row`.
static VARIANT_ROW: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.table-row.headerFont"));

/// Variant-table adapter for APKMirror release pages.
#[derive(Debug, Clone)]
pub struct ApkMirrorSource {
    origin: String,
    policy: ArchPolicy,
}

impl ApkMirrorSource {
    /// Creates an adapter with the default origin and fallback policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }

    /// Creates an adapter with a custom origin (for mirrors of the mirror, and tests).
    #[must_use]
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            policy: ArchPolicy::default(),
        }
    }

    /// Replaces the architecture fallback policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ArchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the origin relative hrefs are joined to.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Finds the download page for the variant described by `request`.
    ///
    /// Rows are scanned in document order; the first row whose bundle type and
    /// density equal the request and whose architecture is in the request's
    /// fallback chain wins. Rows with fewer than six text fields, or without a
    /// link, are skipped.
    #[tracing::instrument(
        skip(self, html, request),
        fields(
            source = self.name(),
            package = %request.package,
            version = %request.version,
            arch = %request.arch,
            density = %request.density,
            bundle = %request.bundle
        )
    )]
    pub fn resolve(&self, html: &str, request: &ResolutionRequest) -> ResolutionResult {
        let rows = match self.candidates(html) {
            Ok(rows) => rows,
            Err(error) => {
                debug!(error = %error, "Variant table could not be parsed");
                return ResolutionResult::ParseFailure(error);
            }
        };

        if rows.is_empty() {
            debug!("No variant table rows present");
            return ResolutionResult::NoTableFound;
        }

        let chain = self.policy.expand(&request.arch);
        let bundle = request.bundle.as_str();

        let hit = first_match(&rows, |row| {
            if row.fields.len() < MIN_ROW_FIELDS {
                trace!(position = row.position, fields = row.fields.len(), "Skipping short row");
                return false;
            }
            row.field(BUNDLE_FIELD) == Some(bundle)
                && row.field(DENSITY_FIELD) == Some(request.density.as_str())
                && row.field(ARCH_FIELD).is_some_and(|arch| chain.contains(arch))
                && row.locator.is_some()
        });

        let result = match hit.and_then(|row| row.locator.as_deref()) {
            Some(href) => ResolutionResult::Found(normalize_href(href, self.origin())),
            None => ResolutionResult::NoMatchInTable,
        };
        debug!(rows = rows.len(), outcome = result.label(), "Variant table scanned");
        result
    }
}

impl Default for ApkMirrorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for ApkMirrorSource {
    fn name(&self) -> &'static str {
        "apkmirror"
    }

    fn candidates(&self, payload: &str) -> Result<Vec<CandidateEntry>, ParseError> {
        let document = parse_document(payload);
        Ok(document
            .select(&VARIANT_ROW)
            .enumerate()
            .map(|(position, row)| {
                CandidateEntry::new(flatten_text(row), row_link(row), position)
            })
            .collect())
    }
}

/// Returns the `href` of the first anchor directly inside the row's first child element.
fn row_link(row: ElementRef<'_>) -> Option<String> {
    let first_child = row.children().find_map(ElementRef::wrap)?;
    let anchor = first_child
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "a")?;
    element_attribute(anchor, "href")
}
