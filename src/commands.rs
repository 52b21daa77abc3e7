use std::path::Path;

use classloc::cancel::CancellationToken;
use classloc::error::Error;
use classloc::type_index::{self, TypeHandle};
use classloc::{LocationResolver, config};

// ── CLI commands ──────────────────────────────────────────────────────

/// Print the binary name of the type covering `line` of `file_or_name`.
///
/// # Errors
///
/// Returns errors from config loading or resolution.
pub fn name_at(root: &Path, file_or_name: &str, line: i64) -> Result<(), Error> {
    let workspace = config::load(root)?;
    let resolver = LocationResolver::new(&workspace);
    let name = resolver.resolve_name_at(file_or_name, line)?;
    println!("{name}");
    return Ok(());
}

/// Print where `binary_name` lives, as text or JSON.
///
/// # Errors
///
/// Returns errors from config loading or resolution.
pub fn location_of(root: &Path, binary_name: &str, line: i64, json: bool) -> Result<(), Error> {
    let workspace = config::load(root)?;
    let resolver = LocationResolver::new(&workspace);
    let location = resolver.resolve_location_of(binary_name, line)?;

    if json {
        // serde_json::to_string_pretty won't fail on this structure.
        let rendered = serde_json::to_string_pretty(&location).unwrap_or_default();
        println!("{rendered}");
    } else {
        println!("{location}");
    }
    return Ok(());
}

/// Print every top-level type matching `binary_name`, first match first.
///
/// # Errors
///
/// Returns `Error::TypeNotFound` if nothing matches, or errors from config
/// loading and lookup.
pub fn types(root: &Path, binary_name: &str) -> Result<(), Error> {
    let workspace = config::load(root)?;
    let handles = type_index::find_top_level_types(binary_name, &workspace, &CancellationToken::new())?;
    if handles.is_empty() {
        return Err(Error::TypeNotFound {
            name: binary_name.to_string(),
        });
    }

    for handle in &handles {
        match handle {
            TypeHandle::Binary { library_id, top_level } => {
                println!("binary  {top_level}  {library_id}");
            },
            TypeHandle::Source { file, project, top_level } => {
                println!("source  {top_level}  {project}  {}", file.display());
            },
        }
    }
    return Ok(());
}

/// List the types declared in `file` with their binary names.
///
/// # Errors
///
/// Returns errors from config loading, file reading, or parsing.
pub fn symbols(root: &Path, file: &Path, json: bool) -> Result<(), Error> {
    let workspace = config::load(root)?;
    let resolver = LocationResolver::new(&workspace);
    let declarations = resolver.declarations_in(file)?;

    if json {
        let rendered = serde_json::to_string_pretty(&declarations).unwrap_or_default();
        println!("{rendered}");
        return Ok(());
    }

    for declaration in &declarations {
        println!(
            "{}:{}-{}  {}",
            file.display(),
            declaration.first_line,
            declaration.last_line,
            declaration.binary_name
        );
    }
    return Ok(());
}
