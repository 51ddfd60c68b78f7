//! Uptodown resolver for version file-list fragments.
//!
//! The file list is a flat run of siblings: a `<p>` naming an architecture,
//! immediately followed by an element whose `.v-report` node carries the
//! file id. Only the structurally adjacent sibling counts; a whitespace text
//! node between the label and the detail element breaks the pair.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::node::Node;
use scraper::{ElementRef, Selector};
use tracing::debug;

use crate::parser::html::{
    compile_static_selector, element_attribute, element_text, fragment_root,
    select_self_or_descendant,
};
use crate::parser::parse_fragment;

use super::arch::first_match;
use super::{CandidateEntry, CandidateSource, ParseError};

const LABEL_TAG: &str = "p";
const FILE_ID_ATTR: &str = "data-file-id";

static REPORT_NODE: LazyLock<Selector> = LazyLock::new(|| compile_static_selector(".v-report"));

/// Sibling-element adapter for Uptodown file lists.
#[derive(Debug, Clone, Default)]
pub struct UptodownSource;

impl UptodownSource {
    /// Creates a new `UptodownSource`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the file id paired with the first label, in document order,
    /// whose text is one of `allowed_archs`.
    ///
    /// The order of `allowed_archs` does not matter. Labels without an
    /// adjacent detail element, or whose detail carries no file id, are skipped.
    #[tracing::instrument(
        skip(self, fragment, allowed_archs),
        fields(source = self.name(), allowed = allowed_archs.len())
    )]
    pub fn resolve(&self, fragment: &str, allowed_archs: &HashSet<String>) -> Option<String> {
        if fragment.trim().is_empty() {
            debug!("Empty file-list fragment");
            return None;
        }

        let entries = match self.candidates(fragment) {
            Ok(entries) => entries,
            Err(error) => {
                debug!(error = %error, "File-list fragment could not be parsed");
                return None;
            }
        };

        let hit = first_match(&entries, |entry| {
            entry.locator.is_some()
                && entry
                    .field(0)
                    .is_some_and(|arch| allowed_archs.contains(arch))
        });
        debug!(labels = entries.len(), found = hit.is_some(), "File list scanned");
        hit.and_then(|entry| entry.locator.clone())
    }
}

impl CandidateSource for UptodownSource {
    fn name(&self) -> &'static str {
        "uptodown"
    }

    fn candidates(&self, payload: &str) -> Result<Vec<CandidateEntry>, ParseError> {
        let fragment = parse_fragment(payload);
        let Some(root) = fragment_root(&fragment) else {
            return Ok(Vec::new());
        };

        Ok(root
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == LABEL_TAG)
            .enumerate()
            .map(|(position, label)| {
                CandidateEntry::new(vec![element_text(label)], adjacent_file_id(label), position)
            })
            .collect())
    }
}

/// Reads the file id from the node immediately after `label`, if that node is an element.
fn adjacent_file_id(label: ElementRef<'_>) -> Option<String> {
    let next = label.next_sibling()?;
    if let Node::Text(text) = next.value() {
        debug!(text = %text.escape_debug(), "Label followed by a text node; not adjacent");
        return None;
    }
    let detail = ElementRef::wrap(next)?;
    let report = select_self_or_descendant(detail, &REPORT_NODE)?;
    element_attribute(report, FILE_ID_ATTR)
}
