//! APKPure resolver for versions and download pages.
//!
//! APKPure exposes one versions page per app (latest version plus a version
//! list) and one download page per version. Each lookup is a single-element
//! CSS query with a secondary selector to fall back on when the page layout
//! differs.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::parser::html::{
    compile_static_selector, element_attribute, element_text, select_first,
};
use crate::parser::parse_document;

use super::utils::dedup_preserving_order;
use super::{CandidateEntry, CandidateSource, ParseError};

/// Default APKPure site base.
pub const DEFAULT_BASE_URL: &str = "https://apkpure.net";

static LATEST_BANNER: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.ver-top-down"));
static VERSION_ITEM_LINK: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.ver-item a"));
static VERSION_NAME: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("span.ver-item-n"));
static PRIMARY_DOWNLOAD: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a#download_link"));
static SECONDARY_DOWNLOAD: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a.da"));

const LATEST_VERSION_ATTR: &str = "data-dt-version";

/// Page-based adapter for APKPure.
#[derive(Debug, Clone)]
pub struct ApkPureSource {
    base_url: String,
}

impl ApkPureSource {
    /// Creates an adapter for the public APKPure site.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates an adapter with a custom site base (for tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Extracts the latest version from a versions page.
    ///
    /// Prefers the `data-dt-version` attribute of the download banner and falls
    /// back to the first version-list entry.
    #[tracing::instrument(skip(self, html), fields(source = self.name()))]
    pub fn latest_version(&self, html: &str) -> Option<String> {
        let document = parse_document(html);

        let from_banner = select_first(&document, &LATEST_BANNER)
            .and_then(|banner| element_attribute(banner, LATEST_VERSION_ATTR));
        if from_banner.is_some() {
            return from_banner;
        }

        debug!("Latest-version banner absent; falling back to version list");
        version_items(&document)
            .into_iter()
            .map(|(version, _)| version)
            .next()
    }

    /// Collects every listed version, de-duplicated, in document order.
    #[tracing::instrument(skip(self, html), fields(source = self.name()))]
    pub fn all_versions(&self, html: &str) -> Vec<String> {
        let document = parse_document(html);
        dedup_preserving_order(version_items(&document).into_iter().map(|(version, _)| version))
    }

    /// Extracts the download link from a download page.
    ///
    /// Hrefs are returned as found; APKPure serves absolute links.
    #[tracing::instrument(skip(self, html), fields(source = self.name()))]
    pub fn download_link(&self, html: &str) -> Option<String> {
        let document = parse_document(html);
        let primary =
            select_first(&document, &PRIMARY_DOWNLOAD).and_then(|a| element_attribute(a, "href"));
        if primary.is_some() {
            return primary;
        }

        debug!("Primary download anchor absent; trying secondary anchor");
        select_first(&document, &SECONDARY_DOWNLOAD).and_then(|a| element_attribute(a, "href"))
    }

    /// Builds the versions-page URL for an app.
    #[must_use]
    pub fn versions_url(&self, name: &str, package: &str) -> String {
        format!("{}/{name}/{package}/versions", self.base())
    }

    /// Builds the download-page URL for one version of an app.
    #[must_use]
    pub fn download_page_url(&self, name: &str, package: &str, version: &str) -> String {
        format!("{}/{name}/{package}/download/{version}", self.base())
    }

    /// Builds the page URL a caller should fetch: the versions page when no
    /// version is given, otherwise that version's download page.
    #[must_use]
    pub fn page_url(&self, name: &str, package: &str, version: Option<&str>) -> String {
        match version {
            Some(version) => self.download_page_url(name, package, version),
            None => self.versions_url(name, package),
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ApkPureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for ApkPureSource {
    fn name(&self) -> &'static str {
        "apkpure"
    }

    fn candidates(&self, payload: &str) -> Result<Vec<CandidateEntry>, ParseError> {
        let document = parse_document(payload);
        Ok(version_items(&document)
            .into_iter()
            .enumerate()
            .map(|(position, (version, href))| CandidateEntry::new(vec![version], href, position))
            .collect())
    }
}

/// Returns `(version, href)` for each version-list link that names a version.
fn version_items(document: &Html) -> Vec<(String, Option<String>)> {
    document
        .select(&VERSION_ITEM_LINK)
        .flat_map(|link| {
            link.select(&VERSION_NAME)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .map(move |text| (text, link_href(link)))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn link_href(link: ElementRef<'_>) -> Option<String> {
    element_attribute(link, "href")
}
