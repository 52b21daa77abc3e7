//! Binary class name ⇄ source location resolution for JVM projects.
//!
//! `LocationResolver::resolve_name_at` turns a `file:` URI and line into
//! the binary name the runtime loads (`Outer$1Local`, `Outer$2`, ...);
//! `LocationResolver::resolve_location_of` turns a binary name back into a
//! source line or a library member.

pub mod archive;
pub mod cancel;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod lines;
pub mod naming;
pub mod package;
pub mod parser;
pub mod range_index;
pub mod resolver;
pub mod tree;
pub mod type_index;
pub mod types;
pub mod workspace;

pub use cancel::CancellationToken;
pub use error::{Error, LocationError};
pub use resolver::{DeclarationSummary, LocationResolver};
pub use types::{ArchiveLocation, BinaryName, Location, SourceLocation, SourceRange};
pub use workspace::{Library, Project, Workspace};
