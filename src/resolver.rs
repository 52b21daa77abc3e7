//! The two public queries: binary name at a source line, and source (or
//! archive) location of a binary name.

use std::path::{Path, PathBuf};

use url::Url;

use crate::cancel::CancellationToken;
use crate::error::Error;
use crate::lines::LineIndex;
use crate::naming;
use crate::package;
use crate::parser;
use crate::range_index;
use crate::tree::DeclarationTree;
use crate::type_index::{self, TypeHandle};
use crate::types::{ArchiveLocation, DeclarationKind, Location, ResolvedMember, SourceLocation};
use crate::workspace::Workspace;

/// A type declaration in a source file, with the binary name it compiles to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeclarationSummary {
    /// Binary class name.
    pub binary_name: String,
    /// One-based line where the declaration starts.
    pub first_line: i64,
    /// Whether the type is an anonymous class body.
    pub is_anonymous: bool,
    /// Whether the type is declared inside a code body.
    pub is_local: bool,
    /// One-based line where the declaration ends.
    pub last_line: i64,
}

/// Stateless resolver over a workspace snapshot. Each call parses what it
/// needs and keeps nothing, so one resolver may serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'w> {
    /// Projects and libraries in scope.
    workspace: &'w Workspace,
}

impl<'w> LocationResolver<'w> {
    /// Resolver over `workspace`.
    pub const fn new(workspace: &'w Workspace) -> Self {
        return Self { workspace };
    }

    /// Binary name of the innermost type covering `line_number` (one-based)
    /// of the file at `file_or_name`.
    ///
    /// Inputs that are not `file:` URIs are returned unchanged, as are files
    /// owned by a project but outside all of its source roots.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if no project owns the file,
    /// `Error::MalformedInput` for bad URIs or out-of-range lines,
    /// or `Error::LocationNotResolvable` if no declaration covers the line
    /// or the file cannot be read or parsed.
    pub fn resolve_name_at(&self, file_or_name: &str, line_number: i64) -> Result<String, Error> {
        let Some(path) = file_path_from_uri(file_or_name)? else {
            tracing::debug!(input = file_or_name, "not a file URI; passing through");
            return Ok(file_or_name.to_string());
        };

        let project = self.workspace.project_for(&path)?;
        let Some(package) = package::package_for_file(&path, &project.source_roots) else {
            tracing::debug!(file = %path.display(), project = %project.name, "outside source roots; passing through");
            return Ok(file_or_name.to_string());
        };

        let not_resolvable = || {
            return Error::LocationNotResolvable {
                file: path.clone(),
                line: line_number,
            };
        };

        let source = std::fs::read_to_string(&path).map_err(|e| {
            tracing::warn!(file = %path.display(), error = %e, "cannot read source");
            return not_resolvable();
        })?;
        let range = LineIndex::new(&source).line_range(line_number)?;
        let tree = parser::parse_declarations(&path, &source, Some(&package)).map_err(|e| {
            tracing::warn!(file = %path.display(), error = %e, "cannot parse source");
            return not_resolvable();
        })?;

        let resolved = range_index::find_smallest_enclosing(&tree, range.offset, range.end())
            .ok_or_else(not_resolvable)?;
        let name = naming::synthesize(&tree, &resolved);

        tracing::debug!(file = %path.display(), line = line_number, name = %name, "resolved name");
        return Ok(name.0);
    }

    /// Location of the class `binary_name`, with `line_number` mapped to a
    /// byte range when the class has source.
    ///
    /// # Errors
    ///
    /// See [`LocationResolver::resolve_location_of_cancellable`].
    pub fn resolve_location_of(&self, binary_name: &str, line_number: i64) -> Result<Location, Error> {
        return self.resolve_location_of_cancellable(binary_name, line_number, &CancellationToken::new());
    }

    /// [`LocationResolver::resolve_location_of`] with a cancellation token
    /// checked at every project and library boundary.
    ///
    /// Library classes resolve to an archive location without a line: there
    /// is no source to map the line into. Source classes resolve to the
    /// requested line itself, not to the member declared there.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedInput` for unsplittable names or out-of-range lines,
    /// `Error::TypeNotFound` if nothing in scope declares the outer class,
    /// `Error::Cancelled` if `cancel` fires mid-scan,
    /// `Error::FileNotFound` if the declaring file vanished,
    /// or `Error::ArchiveUnreadable` if nothing matched and a library jar
    /// could not be read.
    pub fn resolve_location_of_cancellable(
        &self,
        binary_name: &str,
        line_number: i64,
        cancel: &CancellationToken,
    ) -> Result<Location, Error> {
        let handles = type_index::find_top_level_types(binary_name, self.workspace, cancel)?;
        let Some((first, alternates)) = handles.split_first() else {
            return Err(Error::TypeNotFound {
                name: binary_name.to_string(),
            });
        };
        if !alternates.is_empty() {
            tracing::debug!(name = binary_name, alternates = alternates.len(), "ambiguous; using first match");
        }

        return match first {
            TypeHandle::Binary { library_id, .. } => Ok(Location::Archive(ArchiveLocation {
                library_id: library_id.clone(),
                member_binary_name: binary_name.to_string(),
            })),
            TypeHandle::Source { file, .. } => {
                let source = std::fs::read_to_string(file)
                    .map_err(|_err| return Error::FileNotFound { path: file.clone() })?;
                let range = LineIndex::new(&source).line_range(line_number)?;
                Ok(Location::Source(SourceLocation {
                    file_uri: file_uri_for(file)?,
                    range,
                }))
            },
        };
    }

    /// Every type declared in `file`, with binary names, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the file cannot be read,
    /// or parser errors for unsupported or unparseable files.
    pub fn declarations_in(&self, file: &Path) -> Result<Vec<DeclarationSummary>, Error> {
        let path = package::normalize_path(&std::path::absolute(file)?);
        let source = std::fs::read_to_string(&path)
            .map_err(|_err| return Error::FileNotFound { path: path.clone() })?;
        let seed = self
            .workspace
            .project_for(&path)
            .ok()
            .and_then(|p| return package::package_for_file(&path, &p.source_roots));
        let tree = parser::parse_declarations(&path, &source, seed.as_deref())?;
        return Ok(summarize_types(&tree, &LineIndex::new(&source)));
    }
}

/// Binary names and line spans of every type node in `tree`.
fn summarize_types(tree: &DeclarationTree, lines: &LineIndex) -> Vec<DeclarationSummary> {
    return tree
        .iter()
        .filter(|(_, node)| return node.kind == DeclarationKind::Type)
        .map(|(id, node)| {
            let resolved = ResolvedMember {
                declaration: id,
                enclosing_type_chain: tree.chain_to_top_level(id),
            };
            let last_byte = node.source_range.end().saturating_sub(1).max(node.source_range.offset);
            return DeclarationSummary {
                binary_name: naming::synthesize(tree, &resolved).0,
                first_line: lines.line_of(node.source_range.offset),
                is_anonymous: node.is_anonymous,
                is_local: node.is_local,
                last_line: lines.line_of(last_byte),
            };
        })
        .collect();
}

/// Filesystem path of a `file:` URI; `None` for anything else.
///
/// # Errors
///
/// Returns `Error::MalformedInput` for `file:` URIs that name no local path.
fn file_path_from_uri(input: &str) -> Result<Option<PathBuf>, Error> {
    let Ok(url) = Url::parse(input) else {
        return Ok(None);
    };
    if url.scheme() != "file" {
        return Ok(None);
    }
    let path = url.to_file_path().map_err(|()| return Error::MalformedInput {
        reason: format!("`{input}` is not a local file URI"),
    })?;
    return Ok(Some(package::normalize_path(&path)));
}

/// `file://` URI for an absolute path.
///
/// # Errors
///
/// Returns `Error::MalformedInput` if the path is not absolute.
fn file_uri_for(path: &Path) -> Result<String, Error> {
    let url = Url::from_file_path(path).map_err(|()| return Error::MalformedInput {
        reason: format!("`{}` is not an absolute path", path.display()),
    })?;
    return Ok(url.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceRange;
    use crate::workspace::{Library, Project};

    const HELLO: &str = "\
package org.eclipse.che.examples;

public class HelloWorld {

    private String greeting = \"hello\";

    public void test() {
        class LocalClass1 {
            void ping() {
                System.out.println(\"ping\");
            }
        }
        class LocalClass2 {
            void pong() {
                System.out.println(\"pong\");
            }
        }
        Thread worker = new Thread() {
            @Override
            public void run() {
                System.out.println(\"running\");
            }
        };
    }
}
";

    struct Fixture {
        _dir: tempfile::TempDir,
        file: PathBuf,
        workspace: Workspace,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = package::normalize_path(&std::path::absolute(dir.path()).unwrap());
        let src = root.join("src/main/java");
        let package_dir = src.join("org/eclipse/che/examples");
        std::fs::create_dir_all(&package_dir).unwrap();
        let file = package_dir.join("HelloWorld.java");
        std::fs::write(&file, HELLO).unwrap();
        std::fs::write(root.join("README.txt"), "not source\n").unwrap();

        let workspace = Workspace {
            libraries: vec![Library {
                archive: None,
                id: "org.eclipse.jdt.launching.JRE_CONTAINER".to_string(),
                types: vec!["java.lang.String".to_string()],
            }],
            projects: vec![Project {
                name: "examples".to_string(),
                root,
                source_roots: vec![src],
            }],
        };
        Fixture { _dir: dir, file, workspace }
    }

    fn uri(path: &Path) -> String {
        Url::from_file_path(path).unwrap().to_string()
    }

    #[test]
    fn line_in_class_body_names_top_level_type() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        assert_eq!(resolver.resolve_name_at(&uri(&fx.file), 4).unwrap(), "org.eclipse.che.examples.HelloWorld");
        assert_eq!(resolver.resolve_name_at(&uri(&fx.file), 5).unwrap(), "org.eclipse.che.examples.HelloWorld");
    }

    #[test]
    fn local_classes_are_numbered_by_position() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        assert_eq!(
            resolver.resolve_name_at(&uri(&fx.file), 10).unwrap(),
            "org.eclipse.che.examples.HelloWorld$1LocalClass1"
        );
        assert_eq!(
            resolver.resolve_name_at(&uri(&fx.file), 15).unwrap(),
            "org.eclipse.che.examples.HelloWorld$2LocalClass2"
        );
    }

    #[test]
    fn anonymous_class_keeps_tree_numbering() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        assert_eq!(resolver.resolve_name_at(&uri(&fx.file), 21).unwrap(), "org.eclipse.che.examples.HelloWorld$1");
    }

    #[test]
    fn non_uri_input_passes_through() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        for line in [0, 1, 999] {
            assert_eq!(
                resolver.resolve_name_at("org.eclipse.che.examples.HelloWorld", line).unwrap(),
                "org.eclipse.che.examples.HelloWorld"
            );
        }
    }

    #[test]
    fn file_outside_source_roots_passes_through() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let readme = uri(&fx.workspace.projects[0].root.join("README.txt"));
        assert_eq!(resolver.resolve_name_at(&readme, 1).unwrap(), readme);
    }

    #[test]
    fn unowned_file_is_project_not_found() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let err = resolver.resolve_name_at("file:///nowhere/A.java", 1).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { .. }));
    }

    #[test]
    fn line_outside_declarations_is_not_resolvable() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let err = resolver.resolve_name_at(&uri(&fx.file), 2).unwrap_err();
        assert!(matches!(err, Error::LocationNotResolvable { line: 2, .. }));
    }

    #[test]
    fn line_past_end_is_malformed() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let err = resolver.resolve_name_at(&uri(&fx.file), 500).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn missing_source_file_is_not_resolvable() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let gone = fx.file.with_file_name("Gone.java");
        let err = resolver.resolve_name_at(&uri(&gone), 1).unwrap_err();
        assert!(matches!(err, Error::LocationNotResolvable { file, line: 1 } if file == gone));
    }

    #[test]
    fn non_java_file_under_source_root_is_not_resolvable() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let notes = fx.file.with_file_name("notes.txt");
        std::fs::write(&notes, "first\nsecond\n").unwrap();
        let err = resolver.resolve_name_at(&uri(&notes), 1).unwrap_err();
        assert!(matches!(err, Error::LocationNotResolvable { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn invalid_utf8_source_is_not_resolvable() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let garbled = fx.file.with_file_name("Garbled.java");
        std::fs::write(&garbled, [0x63, 0x6c, 0x61, 0xff, 0xfe, 0x0a]).unwrap();
        let err = resolver.resolve_name_at(&uri(&garbled), 1).unwrap_err();
        assert!(matches!(err, Error::LocationNotResolvable { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn unreadable_jar_does_not_block_source_location() {
        let mut fx = fixture();
        let jar = fx.workspace.projects[0].root.join("broken.jar");
        std::fs::write(&jar, "not a zip archive").unwrap();
        fx.workspace.libraries.insert(0, Library {
            archive: Some(jar),
            id: "broken".to_string(),
            types: Vec::new(),
        });

        let resolver = LocationResolver::new(&fx.workspace);
        let location = resolver.resolve_location_of("org.eclipse.che.examples.HelloWorld$1", 3).unwrap();
        assert!(matches!(location, Location::Source(found) if found.file_uri == uri(&fx.file)));
    }

    #[test]
    fn library_type_resolves_to_archive() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let location = resolver.resolve_location_of("java.lang.String", 100).unwrap();
        assert_eq!(
            location,
            Location::Archive(ArchiveLocation {
                library_id: "org.eclipse.jdt.launching.JRE_CONTAINER".to_string(),
                member_binary_name: "java.lang.String".to_string(),
            })
        );
    }

    #[test]
    fn source_type_resolves_to_requested_line() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let location = resolver
            .resolve_location_of("org.eclipse.che.examples.HelloWorld$1LocalClass1", 3)
            .unwrap();
        assert_eq!(
            location,
            Location::Source(SourceLocation {
                file_uri: uri(&fx.file),
                range: SourceRange::from_bounds(35, 60),
            })
        );
    }

    #[test]
    fn round_trip_lands_in_same_file() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        for line in [4, 10, 15, 21] {
            let name = resolver.resolve_name_at(&uri(&fx.file), line).unwrap();
            let Location::Source(found) = resolver.resolve_location_of(&name, 7).unwrap() else {
                panic!("expected a source location for {name}");
            };
            assert_eq!(found.file_uri, uri(&fx.file));
        }
    }

    #[test]
    fn unknown_type_is_type_not_found() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let err = resolver.resolve_location_of("org.example.Missing", 1).unwrap_err();
        assert!(matches!(err, Error::TypeNotFound { name } if name == "org.example.Missing"));
    }

    #[test]
    fn cancelled_location_lookup() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = resolver
            .resolve_location_of_cancellable("java.lang.String", 1, &cancel)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn lists_declarations_with_binary_names() {
        let fx = fixture();
        let resolver = LocationResolver::new(&fx.workspace);
        let names: Vec<(String, i64, i64)> = resolver
            .declarations_in(&fx.file)
            .unwrap()
            .into_iter()
            .map(|d| (d.binary_name, d.first_line, d.last_line))
            .collect();
        assert_eq!(
            names,
            vec![
                ("org.eclipse.che.examples.HelloWorld".to_string(), 3, 25),
                ("org.eclipse.che.examples.HelloWorld$1LocalClass1".to_string(), 8, 12),
                ("org.eclipse.che.examples.HelloWorld$2LocalClass2".to_string(), 13, 17),
                ("org.eclipse.che.examples.HelloWorld$1".to_string(), 18, 23),
            ]
        );
    }
}
