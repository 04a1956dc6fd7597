//! Core types - pure abstractions shared across the codebase.

mod uri;

pub use uri::{INDEX_HTML, directory_uri, display_uri, uri_to_file_path, uri_to_relative_path};
