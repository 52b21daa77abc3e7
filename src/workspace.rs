//! Projects and libraries that make up the lookup scope.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::package;

/// A source project: a root directory plus the source roots under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project name as configured.
    pub name: String,
    /// Absolute, normalized project directory.
    pub root: PathBuf,
    /// Absolute, normalized source roots, in configured order.
    pub source_roots: Vec<PathBuf>,
}

/// A binary dependency whose classes have no source in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// Jar whose `*.class` entries are members, if any.
    pub archive: Option<PathBuf>,
    /// Container or library identifier reported in archive locations.
    pub id: String,
    /// Top-level binary names declared explicitly as members.
    pub types: Vec<String>,
}

/// Everything a lookup may search, in scope-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    /// Attached libraries, searched after every project.
    pub libraries: Vec<Library>,
    /// Source projects, searched first.
    pub projects: Vec<Project>,
}

impl Workspace {
    /// Project whose root is the longest prefix of `file`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if no project root contains the file.
    pub fn project_for(&self, file: &Path) -> Result<&Project, Error> {
        let file = package::normalize_path(file);
        return self
            .projects
            .iter()
            .filter(|p| return file.starts_with(&p.root))
            .max_by_key(|p| return p.root.components().count())
            .ok_or(Error::ProjectNotFound { file });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, root: &str) -> Project {
        Project {
            name: name.to_string(),
            root: PathBuf::from(root),
            source_roots: vec![PathBuf::from(root).join("src")],
        }
    }

    #[test]
    fn nested_project_wins() {
        let workspace = Workspace {
            libraries: Vec::new(),
            projects: vec![project("outer", "/w"), project("inner", "/w/modules/inner")],
        };
        let found = workspace.project_for(Path::new("/w/modules/inner/src/A.java")).unwrap();
        assert_eq!(found.name, "inner");
        let found = workspace.project_for(Path::new("/w/src/./B.java")).unwrap();
        assert_eq!(found.name, "outer");
    }

    #[test]
    fn unowned_file_is_project_not_found() {
        let workspace = Workspace {
            libraries: Vec::new(),
            projects: vec![project("only", "/w")],
        };
        let err = workspace.project_for(Path::new("/tmp/A.java")).unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound { .. }));
    }
}
