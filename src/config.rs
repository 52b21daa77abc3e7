use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::package::normalize_path;
use crate::workspace::{Library, Project, Workspace};

/// Name of the workspace config file.
pub const CONFIG_FILE: &str = ".classloc.toml";

/// Source roots assumed when a project lists none.
const DEFAULT_SOURCE_ROOTS: [&str; 2] = ["src/main/java", "src/test/java"];

/// Raw TOML structure for `.classloc.toml`.
#[derive(serde::Deserialize)]
struct ClasslocTomlConfig {
    #[serde(default)]
    libraries: Vec<RawLibrary>,
    #[serde(default)]
    projects: Vec<RawProject>,
}

/// One `[[projects]]` table.
#[derive(serde::Deserialize)]
struct RawProject {
    name: String,
    #[serde(default = "current_dir_marker")]
    root: PathBuf,
    #[serde(default)]
    source_roots: Vec<PathBuf>,
}

/// One `[[libraries]]` table.
#[derive(serde::Deserialize)]
struct RawLibrary {
    #[serde(default)]
    archive: Option<PathBuf>,
    id: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Default project root: the config's own directory.
fn current_dir_marker() -> PathBuf {
    return PathBuf::from(".");
}

/// Load the workspace from `.classloc.toml` in `root`.
/// A missing file is an error: there is no meaningful default scope.
///
/// # Errors
///
/// Returns `Error::ConfigNotFound` if the file doesn't exist,
/// `Error::Io` for other read failures,
/// or `Error::TomlDe` if the TOML is malformed.
pub fn load(root: &Path) -> Result<Workspace, Error> {
    let path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ConfigNotFound { path });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };

    let base = std::path::absolute(root)?;
    let workspace = parse(&content, &base)?;
    tracing::debug!(
        config = %path.display(),
        projects = workspace.projects.len(),
        libraries = workspace.libraries.len(),
        "loaded workspace"
    );
    return Ok(workspace);
}

/// Parse config text, resolving relative paths against `base`.
///
/// # Errors
///
/// Returns `Error::TomlDe` if the TOML is malformed.
pub fn parse(content: &str, base: &Path) -> Result<Workspace, Error> {
    let raw: ClasslocTomlConfig = toml::from_str(content)?;

    let projects = raw
        .projects
        .into_iter()
        .map(|p| {
            let project_root = normalize_path(&base.join(&p.root));
            let configured: Vec<PathBuf> = if p.source_roots.is_empty() {
                DEFAULT_SOURCE_ROOTS.iter().map(PathBuf::from).collect()
            } else {
                p.source_roots
            };
            let source_roots = configured
                .iter()
                .map(|r| return normalize_path(&project_root.join(r)))
                .collect();
            return Project {
                name: p.name,
                root: project_root,
                source_roots,
            };
        })
        .collect();

    let libraries = raw
        .libraries
        .into_iter()
        .map(|l| {
            return Library {
                archive: l.archive.map(|a| return normalize_path(&base.join(a))),
                id: l.id,
                types: l.types,
            };
        })
        .collect();

    return Ok(Workspace { libraries, projects });
}
