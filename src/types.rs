//! Core domain types: declaration trees, binary names, and resolved locations.
use std::fmt;

use serde::Serialize;

/// Half-open byte interval `[offset, offset + length)` into a file's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceRange {
    /// Number of bytes covered.
    pub length: u32,
    /// Byte offset of the first covered byte.
    pub offset: u32,
}

impl SourceRange {
    /// Build a range from start and end offsets. An end before the start
    /// collapses to an empty range at `start`.
    pub fn from_bounds(start: u32, end: u32) -> Self {
        return Self {
            length: end.saturating_sub(start),
            offset: start,
        };
    }

    /// Whether `offset` falls inside the half-open interval.
    pub fn contains(&self, offset: u32) -> bool {
        return offset >= self.offset && offset < self.end();
    }

    /// Exclusive end offset.
    pub fn end(&self) -> u32 {
        return self.offset.saturating_add(self.length);
    }
}

/// The closed set of declaration kinds the range search and the name
/// synthesizer dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeclarationKind {
    /// Synthetic root spanning the whole file.
    CompilationUnitRoot,
    /// A field or interface constant.
    Field,
    /// A static or instance initializer block.
    Initializer,
    /// A method or constructor.
    Method,
    /// A class, interface, enum, record, or annotation type (named or anonymous).
    Type,
}

/// Index of a node inside its owning `DeclarationTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(
    /// Position in the arena.
    pub usize,
);

/// One declaration in a parsed source file. Children and parent are arena
/// indices, so the tree is owned top-down with no reference cycles.
#[derive(Debug, Clone)]
pub struct DeclarationNode {
    /// Declarations nested directly in this one, in declaration order.
    pub children: Vec<NodeId>,
    /// Whether this is an anonymous class body.
    pub is_anonymous: bool,
    /// Whether this is a named type declared inside a code body.
    pub is_local: bool,
    /// What sort of declaration this is.
    pub kind: DeclarationKind,
    /// Enclosing declaration; `None` only for the root.
    pub parent: Option<NodeId>,
    /// For types: the name as the source model reports it, including `$`
    /// segments for member and anonymous types. Local types carry their
    /// unnumbered `Enclosing$Name` form here.
    pub qualified_name: Option<String>,
    /// Declared name; absent for initializers, anonymous bodies, and the root.
    pub simple_name: Option<String>,
    /// Bytes covered by the whole declaration.
    pub source_range: SourceRange,
}

/// A JVM binary class name such as `org.example.Outer$1Local`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BinaryName(
    /// The dotted, `$`-segmented name text.
    pub String,
);

impl BinaryName {
    /// The name text.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// A byte range inside a project source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// `file://` URI of the source file.
    pub file_uri: String,
    /// Bytes of the requested line.
    pub range: SourceRange,
}

/// A class living inside a binary library rather than project source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveLocation {
    /// Identifier of the library that holds the member.
    pub library_id: String,
    /// Binary name of the member as requested.
    pub member_binary_name: String,
}

/// Where a binary name lives. A type is binary XOR source, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    /// Library-resident; opaque at the line level.
    Archive(ArchiveLocation),
    /// Project source.
    Source(SourceLocation),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Location::Archive(archive) => {
                write!(f, "{}!{}", archive.library_id, archive.member_binary_name)
            },
            Location::Source(source) => write!(
                f,
                "{}:{}..{}",
                source.file_uri,
                source.range.offset,
                source.range.end()
            ),
        };
    }
}

/// Outcome of a range search: the found declaration and the chain of
/// declarations from it up to (and including) the top-level type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMember {
    /// The declaration the search landed on.
    pub declaration: NodeId,
    /// `declaration` first, then each ancestor below the root.
    pub enclosing_type_chain: Vec<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_half_open() {
        let range = SourceRange::from_bounds(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(19));
        assert!(!range.contains(20));
        assert!(!range.contains(9));
    }

    #[test]
    fn inverted_bounds_collapse_to_empty() {
        let range = SourceRange::from_bounds(8, 3);
        assert_eq!(range.length, 0);
        assert!(!range.contains(8));
    }

    #[test]
    fn location_display_forms() {
        let archive = Location::Archive(ArchiveLocation {
            library_id: "jre".to_string(),
            member_binary_name: "java.lang.String".to_string(),
        });
        assert_eq!(archive.to_string(), "jre!java.lang.String");

        let source = Location::Source(SourceLocation {
            file_uri: "file:///a/B.java".to_string(),
            range: SourceRange::from_bounds(4, 9),
        });
        assert_eq!(source.to_string(), "file:///a/B.java:4..9");
    }
}
