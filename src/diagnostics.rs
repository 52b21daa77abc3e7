use std::fmt::Write as _;

use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::ConfigNotFound { path } => render_config_not_found(&path.display().to_string()),
        Error::ProjectNotFound { file } => render_project_not_found(&file.display().to_string()),
        Error::LocationNotResolvable { file, line } => {
            render_location_not_resolvable(&file.display().to_string(), *line)
        },
        Error::TypeNotFound { name } => render_type_not_found(name),
        Error::UnsupportedLanguage { ext } => render_unsupported_language(ext),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::ArchiveUnreadable { path, reason } => format!("\
# Error: Archive Unreadable

`{}` could not be read as a jar: {reason}

## Fix

Check the `archive` path of the library in `{CONFIG_FILE}`.
", path.display()),

        Error::Cancelled => "\
# Cancelled

The lookup was cancelled before it finished.
"
        .to_string(),

        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::FileTooLarge { file, size_bytes, max_bytes } => format!("\
# Error: File Too Large

`{}` is {size_bytes} bytes (max {max_bytes}).
", file.display()),

        Error::MalformedInput { reason } => format!("\
# Error: Malformed Input

{reason}
"),

        Error::ParseFailed { file, reason } => format!("\
# Error: Parse Failed

Could not parse `{}`: {reason}
", file.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_config_not_found(path: &str) -> String {
    format!("\
# Error: Config Not Found

`{path}` does not exist.

## Fix

Create it with at least one project:

    [[projects]]
    name = \"app\"
    source_roots = [\"src/main/java\"]
")
}

fn render_project_not_found(file: &str) -> String {
    format!("\
# Error: Project Not Found

No configured project contains `{file}`.

## Fix

Add a `[[projects]]` entry whose `root` contains the file to `{CONFIG_FILE}`.
")
}

fn render_location_not_resolvable(file: &str, line: i64) -> String {
    let mut out = format!("\
# Error: Location Not Resolvable

Line {line} of `{file}` is not inside any type declaration.
");
    let _ = write!(out, "\
\n## Fix

Pick a line inside a class body, or list the declared types:

    classloc symbols {file}
");
    out
}

fn render_type_not_found(name: &str) -> String {
    format!("\
# Error: Type Not Found

No project or library declares the outer class of `{name}`.

## Fix

Check the source roots and libraries in `{CONFIG_FILE}`, or list matches:

    classloc types {name}
")
}

fn render_unsupported_language(ext: &str) -> String {
    format!(
        "\
# Error: Unsupported Language

No tree-sitter grammar for `.{ext}` files.

## Supported extensions

- `.java`: Java
"
    )
}
