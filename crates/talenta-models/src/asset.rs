//! Remote asset references.
//!
//! The remote API stores file fields in two shapes: an expanded file object
//! (`{"id": "<uuid>", ...}`) or a plain string, which is either an external
//! URL (e.g. a Drive link) or a bare asset id. All three must resolve to a
//! fetchable URL for the dashboard.

use serde::{Deserialize, Serialize};

/// A file field as it appears on a remote document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetRef {
    /// Expanded file object; extra fields are ignored.
    File { id: String },
    /// External URL or bare asset id.
    Url(String),
}

impl AssetRef {
    /// Resolve to the canonical fetch URL.
    ///
    /// File objects and bare ids become `<base>/assets/<id>`; strings that
    /// are already URLs are left untouched.
    pub fn to_fetch_url(&self, base_url: &str) -> String {
        match self {
            AssetRef::File { id } => asset_url(base_url, id),
            AssetRef::Url(s) if is_url(s) => s.clone(),
            AssetRef::Url(id) => asset_url(base_url, id),
        }
    }

    /// Normalize into the URL representation. Applying this twice yields
    /// the same value as applying it once.
    pub fn normalize(self, base_url: &str) -> AssetRef {
        AssetRef::Url(self.to_fetch_url(base_url))
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Build the public fetch URL for an asset id.
pub fn asset_url(base_url: &str, id: &str) -> String {
    format!("{}/assets/{}", base_url.trim_end_matches('/'), id)
}
