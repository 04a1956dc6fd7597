//! Site URI <-> relative path mapping.
//!
//! - URIs are `/`-separated and absolute (`/blog/post/`)
//! - Relative paths are relative to the site root and use the native separator
//!
//! A URI ending in `/` addresses the index document of that directory.

use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

/// File name written for a directory route.
pub const INDEX_HTML: &str = "index.html";

/// Convert a site URI to a path relative to the site root.
///
/// Strips a single leading `/`, then replaces every remaining `/` with the
/// native separator. A trailing separator is kept.
///
/// # Examples
/// ```
/// use routeplan::core::uri_to_relative_path;
/// assert_eq!(uri_to_relative_path("/main.js"), std::path::PathBuf::from("main.js"));
/// assert_eq!(uri_to_relative_path("/"), std::path::PathBuf::from(""));
/// ```
pub fn uri_to_relative_path(uri: &str) -> PathBuf {
    let stripped = uri.strip_prefix('/').unwrap_or(uri);
    PathBuf::from(stripped.replace('/', MAIN_SEPARATOR_STR))
}

/// Convert a site URI to the path of the file that serves it.
///
/// A URI ending in `/` (including the root) is served by its `index.html`.
///
/// # Examples
/// ```
/// use routeplan::core::uri_to_file_path;
/// use std::path::Path;
/// assert_eq!(uri_to_file_path("/old.html"), Path::new("old.html"));
/// assert_eq!(uri_to_file_path("/blog/"), Path::new("blog").join("index.html"));
/// ```
pub fn uri_to_file_path(uri: &str) -> PathBuf {
    let path = uri_to_relative_path(uri);
    if uri.ends_with('/') || uri.is_empty() {
        path.join(INDEX_HTML)
    } else {
        path
    }
}

/// Canonical absolute URI of a directory: root maps to `/`, others to `/<path>/`.
///
/// # Examples
/// ```
/// use routeplan::core::directory_uri;
/// use std::path::Path;
/// assert_eq!(directory_uri(Path::new("")), "/");
/// assert_eq!(directory_uri(&Path::new("docs").join("api")), "/docs/api/");
/// ```
pub fn directory_uri(relative_dir: &Path) -> String {
    let segments: Vec<_> = relative_dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Display form of a relative path as a site URI (`/a/b`), used in messages.
pub fn display_uri(relative: &Path) -> String {
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("/{}", segments.join("/"))
}
