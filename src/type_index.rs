//! Locating the file or library that declares a top-level type.
//!
//! Only outermost types are independently indexable: nested, local,
//! anonymous, and lambda classes are found afterwards inside the source of
//! their top-level type.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::archive;
use crate::cancel::CancellationToken;
use crate::error::Error;
use crate::grammar;
use crate::package::source_path_for;
use crate::parser;
use crate::workspace::{Project, Workspace};

/// A top-level type found in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHandle {
    /// Declared by a class file inside a library.
    Binary {
        /// Library that holds the class.
        library_id: String,
        /// Dotted top-level name.
        top_level: String,
    },
    /// Declared in a project source file.
    Source {
        /// Absolute path of the declaring file.
        file: PathBuf,
        /// Name of the owning project.
        project: String,
        /// Dotted top-level name.
        top_level: String,
    },
}

/// Lazily compiled validator for dotted Java names.
static QUALIFIED_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Pattern matching `a.b.C` with Java identifier characters.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
fn qualified_name_pattern() -> &'static Regex {
    return QUALIFIED_NAME_PATTERN.get_or_init(|| {
        return Regex::new(r"^(?:[\p{L}_$][\p{L}\p{N}_$]*\.)*[\p{L}_][\p{L}\p{N}_]*$")
            .expect("valid regex");
    });
}

/// The outer-class portion of a binary name: everything before the first `$`.
/// Lambda markers (`$$Lambda`) start with `$` too, so one cut covers both.
pub fn outer_class_name(name: &str) -> &str {
    let cut = name.find("$$").into_iter().chain(name.find('$')).min();
    return match cut {
        Some(idx) => name.get(..idx).unwrap_or(name),
        None => name,
    };
}

/// Split a binary or source name into `(package, simple_name)` of its outer class.
///
/// # Errors
///
/// Returns `Error::MalformedInput` if the outer class is not a dotted Java name.
pub fn split_name(name: &str) -> Result<(String, String), Error> {
    let outer = outer_class_name(name.trim());
    if !qualified_name_pattern().is_match(outer) {
        return Err(Error::MalformedInput {
            reason: format!("`{name}` is not a binary class name"),
        });
    }
    return Ok(match outer.rsplit_once('.') {
        Some((package, simple)) => (package.to_string(), simple.to_string()),
        None => (String::new(), outer.to_string()),
    });
}

/// Every top-level type matching `name`'s outer class, projects first, then
/// libraries, each in configured order. The first entry is the primary
/// match; the rest are alternates.
///
/// A library whose jar cannot be read is skipped with a warning. Its error
/// is returned only when nothing else in scope declares the type.
///
/// # Errors
///
/// Returns `Error::MalformedInput` for unsplittable names,
/// `Error::Cancelled` if `cancel` fires between projects or libraries,
/// or `Error::ArchiveUnreadable` if no match was found and a library jar
/// could not be read.
pub fn find_top_level_types(
    name: &str,
    workspace: &Workspace,
    cancel: &CancellationToken,
) -> Result<Vec<TypeHandle>, Error> {
    return search_scope(name, workspace, cancel, |scope| {
        tracing::trace!(scope, "searching scope");
    });
}

/// [`find_top_level_types`] with `enter` called at every project and
/// library boundary, just before the cancellation check.
fn search_scope(
    name: &str,
    workspace: &Workspace,
    cancel: &CancellationToken,
    mut enter: impl FnMut(&str),
) -> Result<Vec<TypeHandle>, Error> {
    let (package, simple) = split_name(name)?;
    let top_level = if package.is_empty() { simple.clone() } else { format!("{package}.{simple}") };
    let mut found = Vec::new();

    for project in &workspace.projects {
        enter(&project.name);
        cancel.check()?;
        for file in find_in_project(project, &package, &simple, &top_level) {
            found.push(TypeHandle::Source {
                file,
                project: project.name.clone(),
                top_level: top_level.clone(),
            });
        }
    }

    let mut unreadable = None;
    for library in &workspace.libraries {
        enter(&library.id);
        cancel.check()?;
        match archive::library_declares(library, &top_level) {
            Ok(true) => found.push(TypeHandle::Binary {
                library_id: library.id.clone(),
                top_level: top_level.clone(),
            }),
            Ok(false) => {},
            Err(e) => {
                tracing::warn!(library = %library.id, error = %e, "skipping unreadable library");
                unreadable.get_or_insert(e);
            },
        }
    }

    tracing::debug!(name, top_level = %top_level, matches = found.len(), "type lookup");
    if found.is_empty()
        && let Some(e) = unreadable
    {
        return Err(e);
    }
    return Ok(found);
}

/// Declaring files of `top_level` across a project's source roots.
/// `Simple.java` is checked first; other files in the package directory
/// are parsed only when it does not declare the type, since a non-public
/// top-level type may live in any file of its package.
fn find_in_project(project: &Project, package: &str, simple: &str, top_level: &str) -> Vec<PathBuf> {
    let expected = source_path_for(package, simple);
    let mut files = Vec::new();

    for root in &project.source_roots {
        let candidate = root.join(&expected);
        if candidate.is_file() && declares_top_level(&candidate, package, top_level) {
            files.push(candidate);
            continue;
        }
        let Some(package_dir) = candidate.parent() else { continue };
        files.extend(scan_package_directory(package_dir, &candidate, package, top_level));
    }

    return files;
}

/// Parse every Java file directly in `dir` except `skip`, looking for a
/// top-level `top_level`.
fn scan_package_directory(dir: &Path, skip: &Path, package: &str, top_level: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    return WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| return e.path() != skip && grammar::is_java_source(e.path()))
        .filter(|e| return declares_top_level(e.path(), package, top_level))
        .map(|e| return e.path().to_path_buf())
        .collect();
}

/// Whether the file at `path` declares top-level type `top_level`.
/// Files that cannot be read or parsed are logged and treated as not declaring it.
fn declares_top_level(path: &Path, package: &str, top_level: &str) -> bool {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "skipping unreadable source");
            return false;
        },
    };
    let tree = match parser::parse_declarations(path, &source, Some(package)) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "skipping unparseable source");
            return false;
        },
    };
    return tree.top_level_types().into_iter().any(|id| {
        return tree.node(id).and_then(|n| return n.qualified_name.as_deref()) == Some(top_level);
    });
}
