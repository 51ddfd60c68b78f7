//! Aptoide resolver - decodes Aptoide REST API responses.
//!
//! Three endpoints matter: `apps/search` (newest build only), `listAppVersions`
//! (every published version with its version code) and `getAppMeta` (one
//! version, keyed by version code). All decoders here are tolerant: malformed
//! JSON, missing keys and mistyped fields all yield an absent result instead
//! of an error.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::utils::dedup_preserving_order;
use super::{CandidateEntry, CandidateSource, ParseError};

/// Default Aptoide API base URL.
pub const DEFAULT_API_BASE: &str = "https://ws75.aptoide.com/api/7";

/// Default page size for the list-versions endpoint.
pub const DEFAULT_VERSIONS_LIMIT: u32 = 50;

/// Architectures the API understands, mapped to the CPU-compatibility list it filters on.
/// Anything not listed here (including `universal` and `all`) disables filtering.
const CPU_COMPATIBILITY: [(&str, &str); 2] = [
    ("arm64-v8a", "arm64-v8a,armeabi-v7a,armeabi"),
    ("armeabi-v7a", "armeabi-v7a,armeabi"),
];

// ==================== Aptoide API Response Types ====================

/// Response of `apps/search` and `listAppVersions`.
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default, deserialize_with = "lenient")]
    datalist: Option<DataList>,
}

#[derive(Debug, Deserialize)]
struct DataList {
    /// Entries are decoded one at a time so a bad entry does not hide the rest.
    #[serde(default, deserialize_with = "lenient")]
    list: Option<Vec<Value>>,
}

/// One app entry in a list response.
#[derive(Debug, Deserialize)]
struct AppEntry {
    #[serde(default, deserialize_with = "lenient")]
    file: Option<AppFile>,
}

/// Response of `getAppMeta`.
#[derive(Debug, Deserialize)]
struct MetaResponse {
    #[serde(default, deserialize_with = "lenient")]
    data: Option<AppEntry>,
}

/// The `file` object shared by every endpoint.
#[derive(Debug, Default, Deserialize)]
struct AppFile {
    #[serde(default, deserialize_with = "lenient")]
    vername: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    vercode: Option<VersionCode>,
    #[serde(default, deserialize_with = "lenient")]
    path: Option<String>,
}

/// Version codes arrive as integers, occasionally as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionCode {
    Number(i64),
    Text(String),
}

impl VersionCode {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(code) => Some(*code),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Decodes a field, mapping a type mismatch to `None` instead of failing the parent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

// ==================== AptoideSource ====================

/// JSON API adapter for Aptoide.
#[derive(Debug, Clone)]
pub struct AptoideSource {
    api_base: String,
}

impl AptoideSource {
    /// Creates an adapter for the public Aptoide API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Creates an adapter with a custom API base (for tests).
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    /// Latest version name from an `apps/search` response.
    #[tracing::instrument(skip(self, json), fields(source = self.name()))]
    pub fn latest_version_from_search(&self, json: &str) -> Option<String> {
        first_entry_file(json).and_then(|file| non_empty(file.vername))
    }

    /// Download path of the newest build from an `apps/search` response.
    #[tracing::instrument(skip(self, json), fields(source = self.name()))]
    pub fn download_from_search(&self, json: &str) -> Option<String> {
        first_entry_file(json).and_then(|file| non_empty(file.path))
    }

    /// Every version name in a `listAppVersions` response, de-duplicated, first-seen order.
    #[tracing::instrument(skip(self, json), fields(source = self.name()))]
    pub fn list_versions(&self, json: &str) -> Vec<String> {
        dedup_preserving_order(
            list_entries(json)
                .into_iter()
                .filter_map(|file| non_empty(file.vername)),
        )
    }

    /// Version code paired with the first entry named `version` in a `listAppVersions` response.
    #[tracing::instrument(skip(self, json), fields(source = self.name()))]
    pub fn find_version_code(&self, json: &str, version: &str) -> Option<i64> {
        list_entries(json)
            .into_iter()
            .find(|file| file.vername.as_deref() == Some(version))
            .and_then(|file| file.vercode)
            .and_then(|code| code.as_i64())
    }

    /// Download path from a `getAppMeta` response.
    #[tracing::instrument(skip(self, json), fields(source = self.name()))]
    pub fn download_from_metadata(&self, json: &str) -> Option<String> {
        let response: MetaResponse = decode(json)?;
        response
            .data
            .and_then(|data| data.file)
            .and_then(|file| non_empty(file.path))
    }

    /// Builds the `apps/search` URL for a package.
    #[must_use]
    pub fn search_url(&self, package: &str, arch: &str) -> String {
        format!(
            "{}/apps/search?query={}&limit=1&trusted=true{}",
            self.base(),
            urlencoding::encode(package),
            filter_fragment(arch)
        )
    }

    /// Builds the `listAppVersions` URL for a package.
    #[must_use]
    pub fn versions_url(&self, package: &str, arch: &str, limit: u32) -> String {
        format!(
            "{}/listAppVersions?package_name={}&limit={limit}{}",
            self.base(),
            urlencoding::encode(package),
            filter_fragment(arch)
        )
    }

    /// Builds the `getAppMeta` URL for one version code of a package.
    #[must_use]
    pub fn meta_url(&self, package: &str, vercode: i64, arch: &str) -> String {
        format!(
            "{}/getAppMeta?package_name={}&vercode={vercode}{}",
            self.base(),
            urlencoding::encode(package),
            filter_fragment(arch)
        )
    }

    fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}

impl Default for AptoideSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSource for AptoideSource {
    fn name(&self) -> &'static str {
        "aptoide"
    }

    fn candidates(&self, payload: &str) -> Result<Vec<CandidateEntry>, ParseError> {
        Ok(list_entries(payload)
            .into_iter()
            .enumerate()
            .map(|(position, file)| {
                let mut fields = vec![file.vername.unwrap_or_default()];
                if let Some(code) = file.vercode.as_ref().and_then(VersionCode::as_i64) {
                    fields.push(code.to_string());
                }
                CandidateEntry::new(fields, non_empty(file.path), position)
            })
            .collect())
    }
}

/// Base64 architecture filter value for the `q` query parameter.
///
/// Returns `None` for `universal`, `all` and any architecture the API has no
/// compatibility list for.
#[must_use]
pub fn arch_filter(arch: &str) -> Option<String> {
    CPU_COMPATIBILITY
        .iter()
        .find(|(name, _)| *name == arch)
        .map(|(_, cpus)| STANDARD.encode(format!("myCPU={cpus}&leanback=0")))
}

fn filter_fragment(arch: &str) -> String {
    arch_filter(arch)
        .map(|encoded| format!("&q={encoded}"))
        .unwrap_or_default()
}

fn decode<T: DeserializeOwned>(json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(error = %error, "Aptoide payload could not be decoded");
            None
        }
    }
}

fn list_entries(json: &str) -> Vec<AppFile> {
    let Some(response) = decode::<ListResponse>(json) else {
        return Vec::new();
    };
    response
        .datalist
        .and_then(|datalist| datalist.list)
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_value::<AppEntry>(raw) {
            Ok(entry) => Some(entry.file.unwrap_or_default()),
            Err(error) => {
                debug!(index, error = %error, "Skipping undecodable Aptoide entry");
                None
            }
        })
        .collect()
}

fn first_entry_file(json: &str) -> Option<AppFile> {
    let response: ListResponse = decode(json)?;
    let first = response.datalist?.list?.into_iter().next()?;
    serde_json::from_value::<AppEntry>(first).ok()?.file
}
