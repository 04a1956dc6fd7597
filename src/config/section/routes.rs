//! `[routes]` section configuration.
//!
//! File naming conventions the classifier relies on.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! template_index = "index.ejs.html"     # Rendered into the directory's index.html
//! static_index = "index.html"           # Copied as the directory's index
//! index_script = "index.routes.toml"    # Declares virtual routes
//! access_control = [".htaccess"]        # Copied, but flagged as forbidden
//! hidden_prefixes = ["."]               # Hide a path segment and its subtree
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Template-flavored index of a directory.
    pub template_index: String,

    /// Plain static index of a directory.
    pub static_index: String,

    /// File declaring virtual routes.
    pub index_script: String,

    /// Access-control file names.
    pub access_control: Vec<String>,

    /// Path segment prefixes that hide a path and its subtree.
    pub hidden_prefixes: Vec<String>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            template_index: "index.ejs.html".to_string(),
            static_index: crate::core::INDEX_HTML.to_string(),
            index_script: "index.routes.toml".to_string(),
            access_control: vec![".htaccess".to_string()],
            hidden_prefixes: vec![".".to_string()],
        }
    }
}

impl RoutesConfig {
    pub const TEMPLATE_INDEX: FieldPath = FieldPath::new("routes.template_index");
    pub const STATIC_INDEX: FieldPath = FieldPath::new("routes.static_index");
    pub const INDEX_SCRIPT: FieldPath = FieldPath::new("routes.index_script");
    pub const ACCESS_CONTROL: FieldPath = FieldPath::new("routes.access_control");
    pub const HIDDEN_PREFIXES: FieldPath = FieldPath::new("routes.hidden_prefixes");

    /// Whether a single path segment is hidden.
    pub fn is_hidden_name(&self, name: &str) -> bool {
        self.hidden_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Whether any segment of `path` is hidden.
    pub fn is_hidden_path(&self, path: &Path) -> bool {
        path.components()
            .any(|c| self.is_hidden_name(&c.as_os_str().to_string_lossy()))
    }

    /// Whether `name` is either form of a directory index.
    pub fn is_directory_index(&self, name: &str) -> bool {
        name == self.template_index || name == self.static_index
    }

    pub fn is_index_script(&self, name: &str) -> bool {
        name == self.index_script
    }

    pub fn is_access_control(&self, name: &str) -> bool {
        self.access_control.iter().any(|n| n == name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let names = [
            (Self::TEMPLATE_INDEX, &self.template_index),
            (Self::STATIC_INDEX, &self.static_index),
            (Self::INDEX_SCRIPT, &self.index_script),
        ];
        for (field, name) in names {
            check_file_name(diag, field, name);
        }
        for name in &self.access_control {
            check_file_name(diag, Self::ACCESS_CONTROL, name);
        }

        if self.template_index == self.static_index {
            diag.error_with_hint(
                Self::TEMPLATE_INDEX,
                "template index and static index must differ",
                format!("`{}` would always be ambiguous", self.static_index),
            );
        }
        if self.hidden_prefixes.iter().any(String::is_empty) {
            diag.error_with_hint(
                Self::HIDDEN_PREFIXES,
                "empty prefix would hide every path",
                "remove the empty string",
            );
        }
    }
}

/// A convention must be a bare file name, not a path.
fn check_file_name(diag: &mut ConfigDiagnostics, field: FieldPath, name: &str) {
    if name.is_empty() {
        diag.error(field, "must not be empty");
    } else if name.contains(['/', '\\']) {
        diag.error_with_hint(
            field,
            format!("`{name}` is a path, expected a file name"),
            "conventions apply in every directory",
        );
    }
}
