//! Virtual route declarations from index scripts.
//!
//! An index script declares routes that have no file of their own. The
//! planner loads them through [`RouteLoader`] and never depends on how the
//! loading happens. The default loader reads a TOML manifest:
//!
//! ```toml
//! [routes."/blog/hello/"]
//! type = "build-template"
//! path = "post.ejs.html"      # relative to the manifest's directory
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Virtual URI -> descriptor, ordered by URI.
pub type RouteTable = BTreeMap<String, RouteDescriptor>;

/// What produces a virtual route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDescriptor {
    /// Render `path` (relative to the script's directory).
    BuildTemplate { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read index script")]
    Io(#[from] io::Error),

    #[error("index script is not valid TOML")]
    Parse(#[from] toml::de::Error),

    #[error("index script does not export `routes`")]
    MissingRoutes,

    #[error("route `{uri}`: unsupported route type `{kind}`")]
    UnsupportedType { uri: String, kind: String },

    #[error("route `{uri}`: virtual URI must start with `/`")]
    RelativeUri { uri: String },

    #[error("route `{uri}`: template path `{}` must be relative", path.display())]
    AbsoluteTemplate { uri: String, path: PathBuf },

    #[error("route `{uri}`: `{}` must not contain `..`", path.display())]
    ParentTraversal { uri: String, path: PathBuf },
}

/// Loads the virtual routes declared by an index script.
pub trait RouteLoader {
    fn load_routes(&self, path: &Path) -> Result<RouteTable, ScriptError>;
}

impl<F> RouteLoader for F
where
    F: Fn(&Path) -> Result<RouteTable, ScriptError>,
{
    fn load_routes(&self, path: &Path) -> Result<RouteTable, ScriptError> {
        self(path)
    }
}

/// Reads index scripts as TOML manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl RouteLoader for ManifestLoader {
    fn load_routes(&self, path: &Path) -> Result<RouteTable, ScriptError> {
        let content = fs::read_to_string(path)?;
        parse_manifest(&content)
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    routes: Option<BTreeMap<String, RawDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(rename = "type")]
    kind: String,
    path: PathBuf,
}

/// Parse and validate a manifest. Any invalid route fails the whole manifest.
pub fn parse_manifest(content: &str) -> Result<RouteTable, ScriptError> {
    let manifest: RawManifest = toml::from_str(content)?;
    let routes = manifest.routes.ok_or(ScriptError::MissingRoutes)?;

    let mut table = RouteTable::new();
    for (uri, raw) in routes {
        let descriptor = validate_descriptor(&uri, raw)?;
        table.insert(uri, descriptor);
    }
    Ok(table)
}

fn validate_descriptor(uri: &str, raw: RawDescriptor) -> Result<RouteDescriptor, ScriptError> {
    if raw.kind != "build-template" {
        return Err(ScriptError::UnsupportedType {
            uri: uri.to_string(),
            kind: raw.kind,
        });
    }
    if !uri.starts_with('/') {
        return Err(ScriptError::RelativeUri {
            uri: uri.to_string(),
        });
    }
    if raw.path.is_absolute() || raw.path.has_root() {
        return Err(ScriptError::AbsoluteTemplate {
            uri: uri.to_string(),
            path: raw.path,
        });
    }
    // Destinations stay inside the output root, templates inside the site root
    for path in [Path::new(uri), raw.path.as_path()] {
        if has_parent_dir(path) {
            return Err(ScriptError::ParentTraversal {
                uri: uri.to_string(),
                path: path.to_path_buf(),
            });
        }
    }
    Ok(RouteDescriptor::BuildTemplate { path: raw.path })
}

fn has_parent_dir(path: &Path) -> bool {
    path.components().any(|c| c == Component::ParentDir)
}
