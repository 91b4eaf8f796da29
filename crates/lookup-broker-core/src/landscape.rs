//! The landscape directory and its sources.
//!
//! A landscape is a named Cloud Foundry environment described by its cloud
//! controller URL, its UAA URL and free-form labels. The directory is read
//! through a [`LandscapeSource`] on every request; sources never fail; a
//! missing or malformed input yields an empty directory.
//!
//! # Example
//!
//! ```
//! use lookup_broker_core::{JsonLandscapeSource, LandscapeSource};
//!
//! let source = JsonLandscapeSource::new("this is not json");
//! assert!(source.get_all().is_empty());
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Process variable read by [`EnvLandscapeSource::default`].
pub const DEFAULT_LANDSCAPES_ENV: &str = "LANDSCAPES";

/// Endpoints and labels of one landscape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandscapeDescriptor {
    /// Cloud controller API URL.
    #[serde(rename = "cloudcontroller", default)]
    pub controller_url: String,

    /// UAA (authorization server) URL.
    #[serde(rename = "uaa", default)]
    pub auth_url: String,

    /// Descriptive labels, in order.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Snapshot of all landscapes, keyed by name.
///
/// Backed by an ordered map so that serialization, and therefore
/// [`content_digest`](Self::content_digest), is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandscapeDirectory(BTreeMap<String, LandscapeDescriptor>);

impl LandscapeDirectory {
    /// Parses a directory from its JSON object form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of landscapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a landscape by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LandscapeDescriptor> {
        self.0.get(name)
    }

    /// Iterates landscapes in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, LandscapeDescriptor> {
        self.0.iter()
    }

    /// Lowercase hex SHA-1 of the canonical JSON form.
    ///
    /// Equal directories always produce equal digests.
    #[must_use]
    pub fn content_digest(&self) -> String {
        let mut hasher = Sha1::new();
        // A BTreeMap of plain strings always serializes.
        if let Ok(canonical) = serde_json::to_vec(&self.0) {
            hasher.update(&canonical);
        }
        format!("{:x}", hasher.finalize())
    }
}

impl FromIterator<(String, LandscapeDescriptor)> for LandscapeDirectory {
    fn from_iter<I: IntoIterator<Item = (String, LandscapeDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LandscapeDirectory {
    type Item = (&'a String, &'a LandscapeDescriptor);
    type IntoIter = btree_map::Iter<'a, String, LandscapeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Read-only access to the landscape directory.
///
/// Implementations are called concurrently, once per request, and must
/// return a fresh snapshot each time.
pub trait LandscapeSource: Send + Sync {
    /// Returns the current directory, or an empty one if it is unavailable.
    fn get_all(&self) -> LandscapeDirectory;
}

impl<T: LandscapeSource + ?Sized> LandscapeSource for Arc<T> {
    fn get_all(&self) -> LandscapeDirectory {
        (**self).get_all()
    }
}

/// Reads the directory from a process environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvLandscapeSource {
    var: String,
}

impl EnvLandscapeSource {
    /// Creates a source reading `var`.
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable read.
    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvLandscapeSource {
    fn default() -> Self {
        Self::new(DEFAULT_LANDSCAPES_ENV)
    }
}

impl LandscapeSource for EnvLandscapeSource {
    fn get_all(&self) -> LandscapeDirectory {
        match std::env::var(&self.var) {
            Ok(raw) if !raw.trim().is_empty() => parse_or_empty(&self.var, &raw),
            _ => {
                tracing::warn!(variable = %self.var, "landscape variable not set");
                LandscapeDirectory::default()
            }
        }
    }
}

/// Parses an injected JSON document on every call.
#[derive(Debug, Clone)]
pub struct JsonLandscapeSource {
    json: Arc<str>,
}

impl JsonLandscapeSource {
    /// Creates a source over `json`.
    #[must_use]
    pub fn new(json: impl AsRef<str>) -> Self {
        Self {
            json: Arc::from(json.as_ref()),
        }
    }
}

impl LandscapeSource for JsonLandscapeSource {
    fn get_all(&self) -> LandscapeDirectory {
        parse_or_empty("inline", &self.json)
    }
}

fn parse_or_empty(origin: &str, raw: &str) -> LandscapeDirectory {
    match LandscapeDirectory::from_json(raw) {
        Ok(directory) => directory,
        Err(e) => {
            tracing::error!(
                origin = %origin,
                error = %e,
                json = %raw,
                "failed to parse landscape directory"
            );
            LandscapeDirectory::default()
        }
    }
}
