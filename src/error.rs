//! Crate-level error types for classloc resolution.
use std::path::PathBuf;

/// Name used by the debugger-facing boundary for resolution failures.
pub type LocationError = Error;

/// Every failure is a value carrying enough context to produce a useful
/// diagnostic: the file, name, line, or reason involved.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as LocationError")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A library archive could not be opened or read.
    #[error("archive unreadable: {}: {reason}", path.display())]
    ArchiveUnreadable {
        /// Path to the archive.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The caller cancelled a long-running lookup.
    #[error("cancelled")]
    Cancelled,

    /// No `.classloc.toml` at the workspace root.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path where the config was expected.
        path: PathBuf,
    },

    /// A source file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Source file exceeds the parser's size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// The range search found no declaration at the requested line.
    #[error("no declaration at line {line} of {}", file.display())]
    LocationNotResolvable {
        /// File that was searched.
        file: PathBuf,
        /// One-based line that was requested.
        line: i64,
    },

    /// A line number outside the file, or a name that cannot be split.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Tree-sitter failed to parse a source file.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// No configured project owns the given file.
    #[error("no project owns {}", file.display())]
    ProjectNotFound {
        /// File that was looked up.
        file: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No project or library declares the outer type.
    #[error("type not found: `{name}`")]
    TypeNotFound {
        /// The name as requested, including any `$` suffix.
        name: String,
    },

    /// No tree-sitter grammar registered for this file extension.
    #[error("no grammar for extension: .{ext}")]
    UnsupportedLanguage {
        /// File extension without the leading dot.
        ext: String,
    },
}

impl Error {
    /// Whether the failure means "nothing was found" rather than bad input
    /// or an environment problem.
    pub fn is_not_found(&self) -> bool {
        return matches!(
            self,
            Error::LocationNotResolvable { .. }
                | Error::ProjectNotFound { .. }
                | Error::TypeNotFound { .. }
        );
    }
}
