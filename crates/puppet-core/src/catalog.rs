//! Animation catalog and fuzzy name resolution.
//!
//! The catalog is supplied by the rig at session start and never mutated
//! afterwards. Labels coming from the prompt service are loose: they may lack
//! the namespace folder the rig stores them under, or carry stray whitespace.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Namespace folders used by the character rig, in resolution priority order.
pub const NAMESPACES: [&str; 5] = [
    "indianDances",
    "faceAnimation",
    "memeBeats",
    "UpperBodyBits",
    "general",
];

/// Length assumed for an animation whose catalog entry has no usable duration.
pub const DEFAULT_ANIMATION_SECS: f32 = 2.0;

/// A single playable animation as declared by the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationCatalogEntry {
    pub name: String,
    #[serde(rename = "durationSeconds", alias = "duration_secs")]
    pub duration_secs: f32,
}

impl AnimationCatalogEntry {
    pub fn new(name: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }
}

/// Read-only lookup over the rig's animations.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, AnimationCatalogEntry>,
    order: Vec<String>,
}

impl Catalog {
    /// Builds a catalog. Later duplicates replace earlier ones but keep the
    /// original position in [`Catalog::names`].
    pub fn new(entries: impl IntoIterator<Item = AnimationCatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            if !catalog.entries.contains_key(&entry.name) {
                catalog.order.push(entry.name.clone());
            }
            catalog.entries.insert(entry.name.clone(), entry);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AnimationCatalogEntry> {
        self.entries.get(name)
    }

    /// Names in the order the rig declared them.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Declared duration in seconds, ignoring non-positive values.
    pub fn duration_of(&self, name: &str) -> Option<f32> {
        self.entries
            .get(name)
            .map(|e| e.duration_secs)
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Declared duration, or [`DEFAULT_ANIMATION_SECS`] when unknown.
    pub fn duration_or_default(&self, name: &str) -> f32 {
        self.duration_of(name).unwrap_or(DEFAULT_ANIMATION_SECS)
    }

    /// Maps a loose label onto a catalog name.
    ///
    /// Tries, in order: the exact label; the whitespace-collapsed label; the
    /// collapsed label under each of [`NAMESPACES`]; the label with all
    /// whitespace removed; and that compact form under the first namespace.
    /// Returns `None` when nothing matches.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        if label.is_empty() {
            return None;
        }
        if let Some((name, _)) = self.entries.get_key_value(label) {
            return Some(name.as_str());
        }

        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return None;
        }
        let compact: String = normalized.chars().filter(|c| !c.is_whitespace()).collect();

        let mut candidates = Vec::with_capacity(NAMESPACES.len() + 3);
        candidates.push(normalized.clone());
        candidates.extend(NAMESPACES.iter().map(|ns| format!("{ns}/{normalized}")));
        candidates.push(compact.clone());
        candidates.push(format!("{}/{compact}", NAMESPACES[0]));

        candidates
            .iter()
            .find_map(|c| self.entries.get_key_value(c.as_str()))
            .map(|(name, _)| name.as_str())
    }

    /// First name from `names` present in the catalog.
    pub fn first_available<'a>(&self, names: &'a [String]) -> Option<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .find(|n| self.contains(n))
    }
}

impl FromIterator<AnimationCatalogEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = AnimationCatalogEntry>>(iter: T) -> Self {
        Self::new(iter)
    }
}
