//! Route classification.
//!
//! Decides, for a path relative to the site root, what produces its content:
//!
//! ```text
//! www/
//! ├── index.ejs.html       -> directory "" is BuildTemplate
//! ├── logo.png             -> Static
//! ├── .htaccess            -> Forbidden (still copied)
//! ├── blog/
//! │   ├── index.routes.toml -> IndexScript (declares virtual routes)
//! │   └── post.ejs.html    -> Static
//! ├── both/
//! │   ├── index.ejs.html   -> directory "both" is Ambiguous
//! │   └── index.html
//! └── dead-link -> gone    -> Missing { BrokenSymlink }
//! ```
//!
//! Classification only reads the filesystem through [`SourceTree`].

mod rules;
mod tree;


use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::config::{BundleConfig, SiteConfig};
use crate::core::{INDEX_HTML, uri_to_file_path};

pub use rules::{FILE_RULES, FileRule};
pub use tree::{DirEntry, EntryKind, OsTree, SourceTree};

/// Disposition of one path.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Copy the file verbatim.
    Static,
    /// Copy a directory's static index.
    Copy { path: PathBuf },
    /// Render a template into the directory's `index.html`.
    BuildTemplate { path: PathBuf },
    /// Output of a configured bundle.
    Esbuild { config: BundleConfig },
    /// Source of a configured redirect.
    Redirect { target: String },
    /// File declaring virtual routes.
    IndexScript,
    /// Both index forms exist; neither is used.
    Ambiguous,
    /// Access-control file; copied, but kept distinct for future policy.
    Forbidden,
    DoesNotExist,
    /// Existed but cannot be used.
    Missing { why: MissingReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    BrokenSymlink,
    PermissionDenied,
}

impl MissingReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BrokenSymlink => "broken-symlink",
            Self::PermissionDenied => "permission-denied",
        }
    }
}

impl Route {
    /// Stable kebab-case name of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Copy { .. } => "copy",
            Self::BuildTemplate { .. } => "build-template",
            Self::Esbuild { .. } => "esbuild",
            Self::Redirect { .. } => "redirect",
            Self::IndexScript => "index-script",
            Self::Ambiguous => "ambiguous",
            Self::Forbidden => "forbidden",
            Self::DoesNotExist => "does-not-exist",
            Self::Missing { .. } => "missing",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy { path } | Self::BuildTemplate { path } => {
                write!(f, "{} {}", self.kind(), path.display())
            }
            Self::Esbuild { config } => {
                write!(f, "{} [{}]", self.kind(), config.entry_points.join(", "))
            }
            Self::Redirect { target } => write!(f, "{} -> {target}", self.kind()),
            Self::Missing { why } => write!(f, "{} ({})", self.kind(), why.as_str()),
            _ => f.write_str(self.kind()),
        }
    }
}

/// Filesystem facts about one path, gathered once per classification.
#[derive(Debug, Default)]
struct Probe {
    kind: Option<EntryKind>,
    broken_link: bool,
    unreadable: bool,
}

impl Probe {
    fn is_usable(&self) -> bool {
        matches!(self.kind, Some(EntryKind::File | EntryKind::Symlink))
            && !self.broken_link
            && !self.unreadable
    }
}

/// Classifier over one source tree and one configuration.
pub struct Router<'a> {
    config: &'a SiteConfig,
    tree: &'a dyn SourceTree,
    bundles: FxHashMap<PathBuf, &'a BundleConfig>,
    redirects: FxHashMap<PathBuf, &'a str>,
}

impl<'a> Router<'a> {
    pub fn new(config: &'a SiteConfig, tree: &'a dyn SourceTree) -> Self {
        let bundles = config
            .bundles
            .iter()
            .map(|(uri, bundle)| (uri_to_file_path(uri), bundle))
            .collect();
        let redirects = config
            .redirects
            .iter()
            .map(|(uri, target)| (uri_to_file_path(uri), target.as_str()))
            .collect();
        Self {
            config,
            tree,
            bundles,
            redirects,
        }
    }

    pub fn config(&self) -> &'a SiteConfig {
        self.config
    }

    pub fn tree(&self) -> &'a dyn SourceTree {
        self.tree
    }

    /// Classify the index route of a directory.
    ///
    /// Both index forms present is [`Route::Ambiguous`]: neither wins.
    pub fn classify_directory(&self, relative: &Path) -> io::Result<Route> {
        let routes = &self.config.routes;
        let static_path = relative.join(&routes.static_index);

        // A trailing-slash redirect writes `<dir>/index.html` and owns the index
        let index_path = relative.join(INDEX_HTML);
        if let Some(route) = self
            .configured(&index_path)
            .or_else(|| self.configured(&static_path))
        {
            return Ok(route);
        }

        let template_path = relative.join(&routes.template_index);
        let has_template = self.probe(&template_path)?.is_usable();
        let has_static = self.probe(&static_path)?.is_usable();

        Ok(match (has_template, has_static) {
            (true, true) => Route::Ambiguous,
            (true, false) => Route::BuildTemplate {
                path: template_path,
            },
            (false, true) => Route::Copy { path: static_path },
            (false, false) => Route::DoesNotExist,
        })
    }

    /// Classify a single file, first matching rule of [`FILE_RULES`] wins.
    pub fn classify_file(&self, relative: &Path) -> io::Result<Route> {
        let mut probe = None;
        for rule in FILE_RULES {
            if rule.reads_filesystem() && probe.is_none() {
                probe = Some(self.probe(relative)?);
            }
            if let Some(route) = self.apply(rule, relative, probe.as_ref()) {
                crate::debug!("classify"; "{} matched {:?}", relative.display(), rule);
                return Ok(route);
            }
        }
        Ok(Route::Static)
    }

    /// Classify the file serving a configured URI.
    ///
    /// Used to check that configuration and filesystem agree.
    pub fn classify_file_route(&self, uri: &str) -> io::Result<Route> {
        self.classify_file(&uri_to_file_path(uri))
    }

    fn configured(&self, relative: &Path) -> Option<Route> {
        self.apply(FileRule::RedirectSource, relative, None)
            .or_else(|| self.apply(FileRule::BundleEntry, relative, None))
    }

    fn apply(&self, rule: FileRule, relative: &Path, probe: Option<&Probe>) -> Option<Route> {
        let routes = &self.config.routes;
        let name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        let matched = match rule {
            FileRule::RedirectSource => {
                return self.redirects.get(relative).map(|target| Route::Redirect {
                    target: (*target).to_string(),
                });
            }
            FileRule::BundleEntry => {
                return self.bundles.get(relative).map(|config| Route::Esbuild {
                    config: (*config).clone(),
                });
            }
            FileRule::BrokenSymlink => {
                return probe.is_some_and(|p| p.broken_link).then_some(Route::Missing {
                    why: MissingReason::BrokenSymlink,
                });
            }
            FileRule::Unreadable => {
                return probe.is_some_and(|p| p.unreadable).then_some(Route::Missing {
                    why: MissingReason::PermissionDenied,
                });
            }
            FileRule::Absent => probe.is_some_and(|p| p.kind.is_none()),
            FileRule::DirectoryIndex => routes.is_directory_index(&name),
            FileRule::IndexScript => {
                return routes.is_index_script(&name).then_some(Route::IndexScript);
            }
            FileRule::AccessControl => {
                return routes.is_access_control(&name).then_some(Route::Forbidden);
            }
            FileRule::Hidden => {
                routes.is_hidden_path(relative) && !routes.is_access_control(&name)
            }
            FileRule::Static => return Some(Route::Static),
        };

        matched.then_some(Route::DoesNotExist)
    }

    fn probe(&self, relative: &Path) -> io::Result<Probe> {
        let path = self.config.root_join(relative);
        let kind = match self.tree.entry_kind(&path) {
            Ok(kind) => kind,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Ok(Probe {
                    unreadable: true,
                    ..Probe::default()
                });
            }
            Err(err) => return Err(err),
        };

        let mut probe = Probe {
            kind,
            ..Probe::default()
        };
        if kind == Some(EntryKind::Symlink) {
            match self.tree.resolve_symlink(&path) {
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                    probe.unreadable = true;
                }
                Err(_) => probe.broken_link = true,
            }
        }
        Ok(probe)
    }
}
