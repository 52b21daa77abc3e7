use std::path::{Component, Path, PathBuf};

/// Derive the dotted package of `file` from whichever source root is its
/// longest matching prefix. A file directly in a root is in the default
/// (empty) package. `None` when no root contains the file.
pub fn package_for_file(file: &Path, source_roots: &[PathBuf]) -> Option<String> {
    let root = source_roots
        .iter()
        .filter(|root| return file.starts_with(root))
        .max_by_key(|root| return root.components().count())?;

    let relative = file.strip_prefix(root).ok()?;
    let directory = relative.parent().unwrap_or_else(|| return Path::new(""));
    let segments: Vec<String> = directory
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => return Some(segment.to_string_lossy().into_owned()),
            _ => return None,
        })
        .collect();

    tracing::trace!(file = %file.display(), root = %root.display(), "matched source root");
    return Some(segments.join("."));
}

/// Relative path of the `.java` file that would declare a top-level type,
/// e.g. `org/example/Hello.java` for (`org.example`, `Hello`).
pub fn source_path_for(package: &str, simple_name: &str) -> PathBuf {
    let mut path: PathBuf = package.split('.').filter(|s| return !s.is_empty()).collect();
    path.push(format!("{simple_name}.java"));
    return path;
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                },
                // `..` at the filesystem root stays at the root.
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    return components.iter().collect();
}
