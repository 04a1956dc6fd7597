//! Site configuration management for `routeplan.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── bundles    # [bundles] and [redirects]
//! │   └── routes     # [routes]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! root = "www"
//!
//! [routes]
//! template_index = "index.ejs.html"
//!
//! [bundles."/main.bundled.js"]
//! entry_points = ["main.js"]
//!
//! [redirects]
//! "/old.html" = "https://example.com/new/"
//! ```
//!
//! The configuration is read once and never mutated afterwards.

pub mod section;
pub mod types;
mod util;

pub use section::{BundleConfig, BundleRoutes, RedirectRoutes, RoutesConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::{find_config_file, find_config_file_from};

use crate::{cli::Cli, debug, utils::path::normalize_path};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing routeplan.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site source directory. Relative paths resolve against the config file.
    pub root: PathBuf,

    /// File naming conventions
    pub routes: RoutesConfig,

    /// Bundles produced by the external bundler
    pub bundles: BundleRoutes,

    /// HTML redirect stubs
    pub redirects: RedirectRoutes,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::from("www"),
            routes: RoutesConfig::default(),
            bundles: BundleRoutes::new(),
            redirects: RedirectRoutes::new(),
        }
    }
}

impl SiteConfig {
    /// Create a configuration for `root` with default conventions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Declare a bundle URI.
    pub fn with_bundle(mut self, uri: impl Into<String>, bundle: BundleConfig) -> Self {
        self.bundles.insert(uri.into(), bundle);
        self
    }

    /// Declare a redirect source URI.
    pub fn with_redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.redirects.insert(from.into(), to.into());
        self
    }

    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, `--root`
    /// is required and default conventions apply.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.finalize(&path);
                config
            }
            None if cli.root().is_some() => Self::default(),
            None => return Err(ConfigError::NotFound(cli.config.clone())),
        };

        if let Some(root) = cli.root() {
            config.root = normalize_path(root);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, diag) = Self::parse_with_ignored(&content)?;
        diag.print_warnings();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            diag.unknown_field(path.to_string());
        })?;
        Ok((config, diag))
    }

    /// Resolve the root against the config file's directory.
    fn finalize(&mut self, config_path: &Path) {
        let base = config_path.parent().unwrap_or(Path::new(""));
        self.root = normalize_path(&base.join(&self.root));
        self.config_path = config_path.to_path_buf();
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.routes.validate(&mut diag);
        section::validate_routes(&self.bundles, &self.redirects, &mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    ///
    /// Shorthand for `config.get_root().join(path)`.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

// ============================================================================
// tests
// ============================================================================
