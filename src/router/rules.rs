//! File classification precedence.
//!
//! `classify_file` walks [`FILE_RULES`] in order and the first rule that
//! matches decides the route. Reordering this table changes behavior.

/// One step of file classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRule {
    /// Path is a configured redirect source.
    RedirectSource,
    /// Path is a configured bundle output.
    BundleEntry,
    /// Hidden path that is not an access-control file.
    Hidden,
    /// Path is a symlink whose target does not resolve.
    BrokenSymlink,
    /// Path cannot be inspected (permission denied).
    Unreadable,
    /// Nothing exists at the path.
    Absent,
    /// Either form of a directory index; `classify_directory` owns it.
    DirectoryIndex,
    /// File declaring virtual routes.
    IndexScript,
    /// Access-control file (`.htaccess`).
    AccessControl,
    /// Everything else is copied verbatim.
    Static,
}

pub const FILE_RULES: [FileRule; 10] = [
    FileRule::RedirectSource,
    FileRule::BundleEntry,
    FileRule::Hidden,
    FileRule::BrokenSymlink,
    FileRule::Unreadable,
    FileRule::Absent,
    FileRule::DirectoryIndex,
    FileRule::IndexScript,
    FileRule::AccessControl,
    FileRule::Static,
];

impl FileRule {
    /// Whether the rule needs to look at the filesystem.
    pub const fn reads_filesystem(self) -> bool {
        matches!(
            self,
            Self::BrokenSymlink | Self::Unreadable | Self::Absent
        )
    }
}
