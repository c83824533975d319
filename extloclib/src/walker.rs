//! Recursive file discovery.
//!
//! Walks a root path and hands every regular file to a visitor. The root may
//! itself be a single file.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::Error;
use crate::Result;

/// What a walk went through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Regular files handed to the visitor
    pub files: u64,
    /// Entries below the root that could not be read (unlistable
    /// directories, broken links, link loops)
    pub skipped: u64,
}

/// Visit every regular file under `root`, exactly once each.
///
/// Directories are never visited. Symbolic links are followed and siblings
/// are visited in file-name order. A root that is missing or cannot be
/// listed fails the walk before any visit; an unreadable entry deeper in
/// the tree only drops that subtree. An error returned by `visit` stops the
/// walk and is returned as is.
pub fn walk<F>(root: impl AsRef<Path>, mut visit: F) -> Result<WalkSummary>
where
    F: FnMut(&Path) -> Result<()>,
{
    let root = root.as_ref();
    let mut summary = WalkSummary::default();

    let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => return Err(root_error(root, e)),
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                summary.skipped += 1;
                continue;
            }
        };

        if entry.file_type().is_file() {
            debug!(path = %entry.path().display(), "visiting file");
            visit(entry.path())?;
            summary.files += 1;
        }
    }

    Ok(summary)
}

fn root_error(root: &Path, source: walkdir::Error) -> Error {
    match source.io_error().map(|e| e.kind()) {
        Some(ErrorKind::NotFound) => Error::PathNotFound(root.to_path_buf()),
        _ => Error::DirectoryRead {
            path: root.to_path_buf(),
            source,
        },
    }
}
