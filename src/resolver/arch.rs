//! Architecture compatibility resolution.
//!
//! A requested architecture expands into a fallback chain: the requested token
//! followed by the universal fallbacks every mirror uses for
//! architecture-independent builds. The chain is a membership set. Which
//! candidate wins is decided by document order, never by chain order.

use super::CandidateEntry;

/// Wildcard token meaning "any architecture".
pub const WILDCARD_ARCH: &str = "all";

/// Mirror convention for a combined 64-/32-bit ARM build advertised as one variant.
pub const DUAL_ARCH_TOKEN: &str = "arm64-v8a + armeabi-v7a";

/// Default universal fallbacks, in the order they are appended.
pub const UNIVERSAL_FALLBACKS: [&str; 3] = ["universal", "noarch", DUAL_ARCH_TOKEN];

/// Immutable fallback table handed to the adapters that match on architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchPolicy {
    universal: Vec<String>,
}

impl ArchPolicy {
    /// Creates a policy with a custom universal fallback list.
    #[must_use]
    pub fn with_fallbacks<I, S>(fallbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            universal: fallbacks.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the universal fallback tokens.
    #[must_use]
    pub fn universal(&self) -> &[String] {
        &self.universal
    }

    /// Expands `requested` into its fallback chain.
    ///
    /// `"all"` yields only the universal fallbacks. Any other token, known or
    /// not, is prepended verbatim; duplicates are kept.
    #[must_use]
    pub fn expand(&self, requested: &str) -> ArchitectureFallbackChain {
        let tokens = if requested == WILDCARD_ARCH {
            self.universal().to_vec()
        } else {
            std::iter::once(requested.to_string())
                .chain(self.universal().iter().cloned())
                .collect()
        };
        ArchitectureFallbackChain { tokens }
    }
}

impl Default for ArchPolicy {
    fn default() -> Self {
        Self::with_fallbacks(UNIVERSAL_FALLBACKS)
    }
}

/// Ordered architecture tokens, head-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureFallbackChain {
    tokens: Vec<String>,
}

impl ArchitectureFallbackChain {
    /// Returns true if `arch` appears verbatim in the chain.
    #[must_use]
    pub fn contains(&self, arch: &str) -> bool {
        self.tokens.iter().any(|token| token == arch)
    }

    /// Returns the tokens in chain order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the chain has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Selects the earliest candidate, by document position, that satisfies `matches`.
#[must_use]
pub fn first_match<'a, F>(entries: &'a [CandidateEntry], matches: F) -> Option<&'a CandidateEntry>
where
    F: Fn(&CandidateEntry) -> bool,
{
    entries
        .iter()
        .filter(|entry| matches(entry))
        .min_by_key(|entry| entry.position)
}
