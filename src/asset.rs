//! Overlay asset resolution.
//!
//! A placement names its overlay by the identifier the user typed plus the
//! collection generation chosen in the prompt. The URL is assembled without
//! checking that the asset exists; a missing file surfaces later as a load
//! failure, which the compositor logs and skips.

#[cfg(test)]
#[path = "asset_test.rs"]
mod asset_test;

use serde::{Deserialize, Serialize};

/// Overlay collection generation. Only one is published today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Generation {
    #[default]
    #[serde(rename = "Generation 3")]
    Gen3,
}

impl Generation {
    /// Path segment used in asset URLs.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Gen3 => "gen3",
        }
    }

    /// Human-readable label shown in the prompt's generation picker.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gen3 => "Generation 3",
        }
    }

    /// All selectable generations, in picker order.
    #[must_use]
    pub fn all() -> &'static [Generation] {
        &[Self::Gen3]
    }
}

/// Builds overlay URLs of the form `/<collection>/<generation>/<identifier>.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    collection: String,
    generation: Generation,
}

impl AssetResolver {
    #[must_use]
    pub fn new(collection: impl Into<String>, generation: Generation) -> Self {
        Self { collection: collection.into(), generation }
    }

    /// Resolve an identifier to its transparent-background overlay URL.
    ///
    /// The identifier is trimmed; callers reject empty identifiers before this point.
    #[must_use]
    pub fn overlay_url(&self, identifier: &str) -> String {
        format!("/{}/{}/{}.png", self.collection, self.generation.tag(), identifier.trim())
    }
}
