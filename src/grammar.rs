//! Tree-sitter grammar resolution by file extension.
use std::path::Path;

use tree_sitter::Language;

use crate::error::Error;

/// Map a source file's extension to its tree-sitter language.
///
/// # Errors
///
/// Returns `Error::UnsupportedLanguage` for anything but `.java`.
pub fn language_for_path(path: &Path) -> Result<Language, Error> {
    let ext = path.extension().and_then(|e| return e.to_str()).unwrap_or("");

    return match ext {
        "java" => Ok(tree_sitter_java::LANGUAGE.into()),
        _ => Err(Error::UnsupportedLanguage {
            ext: ext.to_string(),
        }),
    };
}

/// Whether `path` names a source file the declaration parser understands.
pub fn is_java_source(path: &Path) -> bool {
    return path.extension().is_some_and(|ext| return ext == "java");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_is_supported() {
        assert!(language_for_path(Path::new("src/Hello.java")).is_ok());
        assert!(is_java_source(Path::new("src/Hello.java")));
    }

    #[test]
    fn other_extensions_are_rejected() {
        let err = language_for_path(Path::new("lib.rs")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage { ext } if ext == "rs"));
        assert!(!is_java_source(Path::new("Hello.class")));
    }
}
