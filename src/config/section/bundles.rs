//! `[bundles]` section configuration.
//!
//! Each key is the URI of a bundle the external bundler produces. Options other
//! than `entry_points` are passed through to the bundler untouched.
//!
//! # Example
//!
//! ```toml
//! [bundles."/main.bundled.js"]
//! entry_points = ["main.js"]
//! format = "esm"
//! minify = true
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Bundle URI -> bundler options, ordered by URI.
pub type BundleRoutes = BTreeMap<String, BundleConfig>;

/// Redirect source URI -> target URL, ordered by source.
pub type RedirectRoutes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Source files fed to the bundler (relative to the site root).
    pub entry_points: Vec<String>,

    /// Remaining bundler options.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl BundleConfig {
    pub fn new<I, S>(entry_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entry_points: entry_points.into_iter().map(Into::into).collect(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

pub const BUNDLES: FieldPath = FieldPath::new("bundles");
pub const REDIRECTS: FieldPath = FieldPath::new("redirects");

/// Check bundle and redirect keys.
///
/// Trailing-slash URIs address a directory index, which is allowed for
/// redirects but not for bundles (a bundle is a single file).
pub fn validate_routes(
    bundles: &BundleRoutes,
    redirects: &RedirectRoutes,
    diag: &mut ConfigDiagnostics,
) {
    for (uri, bundle) in bundles {
        check_uri(diag, BUNDLES, uri);
        if uri.ends_with('/') {
            diag.error_with_hint(
                BUNDLES,
                format!("bundle `{uri}` ends with `/`"),
                "name the output file, e.g. `/main.bundled.js`",
            );
        }
        if bundle.entry_points.is_empty() {
            diag.error(BUNDLES, format!("bundle `{uri}` has no entry_points"));
        }
        if redirects.contains_key(uri) {
            diag.error(
                REDIRECTS,
                format!("`{uri}` is declared as both a bundle and a redirect"),
            );
        }
    }

    for uri in redirects.keys() {
        check_uri(diag, REDIRECTS, uri);
    }
}

fn check_uri(diag: &mut ConfigDiagnostics, field: FieldPath, uri: &str) {
    if !uri.starts_with('/') {
        diag.error_with_hint(
            field,
            format!("`{uri}` is not an absolute URI"),
            format!("use `/{uri}`"),
        );
    }
}
