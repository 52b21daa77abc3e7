//! Membership checks against binary libraries.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Error;
use crate::workspace::Library;

/// Whether `library` declares the top-level type `top_level` (a dotted
/// binary name with no `$` suffix), either by listing it or by holding
/// its `.class` entry in the configured archive.
///
/// # Errors
///
/// Returns `Error::ArchiveUnreadable` if the archive cannot be opened as a jar.
pub fn library_declares(library: &Library, top_level: &str) -> Result<bool, Error> {
    let listed = library
        .types
        .iter()
        .any(|t| return crate::type_index::outer_class_name(t) == top_level);
    if listed {
        return Ok(true);
    }

    let Some(archive) = &library.archive else {
        return Ok(false);
    };
    return archive_contains_class(archive, top_level);
}

/// Whether the jar at `path` has an entry for `binary_name`'s class file.
///
/// # Errors
///
/// Returns `Error::ArchiveUnreadable` if the file cannot be opened or is not a zip.
fn archive_contains_class(path: &Path, binary_name: &str) -> Result<bool, Error> {
    let unreadable = |reason: String| {
        return Error::ArchiveUnreadable {
            path: path.to_path_buf(),
            reason,
        };
    };

    let file = File::open(path).map_err(|e| return unreadable(e.to_string()))?;
    let mut jar = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| return unreadable(e.to_string()))?;

    let entry = format!("{}.class", binary_name.replace('.', "/"));
    let found = jar.by_name(&entry).is_ok();
    tracing::trace!(archive = %path.display(), entry = %entry, found, "archive lookup");
    return Ok(found);
}
