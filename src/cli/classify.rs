//! `classify` command: show how individual paths are classified.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::log;
use crate::router::{EntryKind, OsTree, Route, Router};

/// Classify one path: directories by their index route, files by the rules.
pub fn classify_path(router: &Router<'_>, relative: &Path) -> Result<Route> {
    let absolute = router.config().root_join(relative);
    let context = || format!("failed to classify `{}`", relative.display());
    // Symlinks are not followed, matching the walk
    let kind = router.tree().entry_kind(&absolute).with_context(context)?;
    let route = if kind == Some(EntryKind::Directory) {
        router.classify_directory(relative)
    } else {
        router.classify_file(relative)
    };
    route.with_context(context)
}

pub fn run_classify(config: &SiteConfig, paths: &[PathBuf]) -> Result<()> {
    let router = Router::new(config, &OsTree);
    for path in paths {
        let relative = relative_to_root(config, path);
        let route = classify_path(&router, &relative)?;
        log!("classify"; "{}: {}", relative.display(), route);
    }
    Ok(())
}

/// Accept paths relative to the root, or absolute paths inside it.
fn relative_to_root(config: &SiteConfig, path: &Path) -> PathBuf {
    path.strip_prefix(config.get_root())
        .unwrap_or(path)
        .to_path_buf()
}
