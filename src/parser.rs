use std::collections::HashMap;
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::Error;
use crate::grammar;
use crate::tree::{DeclarationTree, NewDeclaration};
use crate::types::{DeclarationKind, NodeId, SourceRange};

/// Maximum source file size (16 MiB).
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Parse a Java source file into a declaration tree.
///
/// `package_seed` is the package derived from the file's location; the
/// source's own `package` declaration takes precedence when present.
///
/// # Errors
///
/// Returns `Error::FileTooLarge` if the source exceeds the size limit,
/// `Error::UnsupportedLanguage` for non-Java files,
/// or `Error::ParseFailed` if tree-sitter cannot parse the source.
pub fn parse_declarations(
    file_path: &Path,
    source: &str,
    package_seed: Option<&str>,
) -> Result<DeclarationTree, Error> {
    let source_len: u64 = source.len().try_into().unwrap_or(u64::MAX);
    if source_len > MAX_FILE_SIZE {
        return Err(Error::FileTooLarge {
            file: file_path.to_path_buf(),
            size_bytes: source_len,
            max_bytes: MAX_FILE_SIZE,
        });
    }

    let language = grammar::language_for_path(file_path)?;
    let cst = parse_source(file_path, source, &language)?;
    let root = cst.root_node();

    let declared = declared_package(root, source);
    let package = match (declared, package_seed) {
        (Some(declared), Some(seed)) if declared != seed => {
            tracing::warn!(
                file = %file_path.display(),
                declared = %declared,
                seed = %seed,
                "declared package differs from source-root layout"
            );
            declared
        },
        (Some(declared), _) => declared,
        (None, Some(seed)) => seed.to_string(),
        (None, None) => String::new(),
    };

    let mut builder = TreeBuilder {
        anonymous_counts: HashMap::new(),
        package,
        source,
        tree: DeclarationTree::new(u32::try_from(source.len()).unwrap_or(u32::MAX)),
    };
    let scope = Scope {
        enclosing_type: None,
        in_code: false,
        parent: builder.tree.root(),
    };
    builder.visit_children(root, scope);

    tracing::trace!(file = %file_path.display(), nodes = builder.tree.iter().count(), "parsed declarations");
    return Ok(builder.tree);
}

/// Parse source into a tree-sitter tree.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the language cannot be set or parsing fails.
fn parse_source(file_path: &Path, source: &str, language: &Language) -> Result<Tree, Error> {
    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| return Error::ParseFailed {
        file: file_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    return parser.parse(source, None).ok_or_else(|| return Error::ParseFailed {
        file: file_path.to_path_buf(),
        reason: "tree-sitter returned None".to_string(),
    });
}

/// Text of the `package` declaration, if the file has one.
fn declared_package(root: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = root.walk();
    let package = root
        .named_children(&mut cursor)
        .find(|n| return n.kind() == "package_declaration")?;

    let mut inner = package.walk();
    let name = package
        .named_children(&mut inner)
        .find(|n| return matches!(n.kind(), "scoped_identifier" | "identifier"))?;
    return name.utf8_text(source.as_bytes()).ok().map(String::from);
}

// ── Tree building ──────────────────────────────────────────────────────

/// Where in the declaration tree the walk currently is.
#[derive(Clone, Copy)]
struct Scope {
    /// Innermost type whose body contains the current CST node.
    enclosing_type: Option<NodeId>,
    /// Whether the current CST node sits inside a method, initializer, or
    /// field initializer rather than directly in a type body.
    in_code: bool,
    /// Declaration that new nodes attach to.
    parent: NodeId,
}

/// Walks the CST once, attaching declarations in source order.
struct TreeBuilder<'s> {
    /// Anonymous bodies seen so far, per innermost enclosing type.
    anonymous_counts: HashMap<NodeId, u32>,
    /// Package used to qualify top-level types.
    package: String,
    /// Full source text.
    source: &'s str,
    /// Tree under construction.
    tree: DeclarationTree,
}

impl TreeBuilder<'_> {
    /// Dispatch one CST node.
    fn visit(&mut self, node: Node<'_>, scope: Scope) {
        match node.kind() {
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => self.visit_named_type(node, scope),
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                self.visit_code_member(node, scope, DeclarationKind::Method, "body");
            },
            "field_declaration" | "constant_declaration" => self.visit_field(node, scope),
            "static_initializer" => self.visit_code_member(node, scope, DeclarationKind::Initializer, ""),
            // A bare block directly in a type body is an instance initializer.
            "block" if !scope.in_code && scope.enclosing_type.is_some() => {
                self.visit_code_member(node, scope, DeclarationKind::Initializer, "");
            },
            "object_creation_expression" => self.visit_anonymous_host(node, scope, None),
            "enum_constant" => self.visit_anonymous_host(node, scope, Some("body")),
            _ => self.visit_children(node, scope),
        }
    }

    /// Visit every named child with the same scope.
    fn visit_children(&mut self, node: Node<'_>, scope: Scope) {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, scope);
        }
    }

    /// Class, interface, enum, record, or annotation type with a name.
    fn visit_named_type(&mut self, node: Node<'_>, scope: Scope) {
        let Some(name) = self.field_text(node, "name") else {
            return;
        };
        let qualified = match scope.enclosing_type.and_then(|t| return self.qualified_name_of(t)) {
            Some(outer) => format!("{outer}${name}"),
            None if self.package.is_empty() => name.clone(),
            None => format!("{}.{name}", self.package),
        };

        let id = self.tree.push(scope.parent, NewDeclaration {
            is_anonymous: false,
            is_local: scope.in_code,
            kind: DeclarationKind::Type,
            qualified_name: Some(qualified),
            simple_name: Some(name),
            source_range: range_of(node),
        });

        if let Some(body) = node.child_by_field_name("body") {
            self.visit_children(body, Scope {
                enclosing_type: Some(id),
                in_code: false,
                parent: id,
            });
        }
    }

    /// Method, constructor, or initializer: a declaration whose body is code.
    /// An empty `body_field` means the node itself is the body.
    fn visit_code_member(&mut self, node: Node<'_>, scope: Scope, kind: DeclarationKind, body_field: &str) {
        let simple_name = if kind == DeclarationKind::Method { self.field_text(node, "name") } else { None };
        let id = self.tree.push(scope.parent, NewDeclaration {
            is_anonymous: false,
            is_local: false,
            kind,
            qualified_name: None,
            simple_name,
            source_range: range_of(node),
        });

        let inner = Scope {
            enclosing_type: scope.enclosing_type,
            in_code: true,
            parent: id,
        };
        if body_field.is_empty() {
            self.visit_children(node, inner);
        } else if let Some(body) = node.child_by_field_name(body_field) {
            self.visit_children(body, inner);
        }
    }

    /// Field or interface constant; named after its first declarator.
    fn visit_field(&mut self, node: Node<'_>, scope: Scope) {
        let simple_name = node
            .child_by_field_name("declarator")
            .and_then(|d| return self.field_text(d, "name"));
        let id = self.tree.push(scope.parent, NewDeclaration {
            is_anonymous: false,
            is_local: false,
            kind: DeclarationKind::Field,
            qualified_name: None,
            simple_name,
            source_range: range_of(node),
        });
        self.visit_children(node, Scope {
            enclosing_type: scope.enclosing_type,
            in_code: true,
            parent: id,
        });
    }

    /// `new T(..) { .. }` or an enum constant with a body. Arguments are
    /// visited first so anonymous bodies are numbered in textual order.
    fn visit_anonymous_host(&mut self, node: Node<'_>, scope: Scope, body_field: Option<&str>) {
        let Some(body) = anonymous_body(node, body_field) else {
            self.visit_children(node, scope);
            return;
        };

        let mut cursor = node.walk();
        let others: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|c| return c.id() != body.id())
            .collect();
        for child in others {
            self.visit(child, scope);
        }

        let qualified = match scope.enclosing_type {
            Some(outer) => {
                let count = self.anonymous_counts.entry(outer).or_insert(0);
                *count = count.saturating_add(1);
                let index = *count;
                self.qualified_name_of(outer).map(|name| return format!("{name}${index}"))
            },
            None => None,
        };

        let id = self.tree.push(scope.parent, NewDeclaration {
            is_anonymous: true,
            is_local: false,
            kind: DeclarationKind::Type,
            qualified_name: qualified,
            simple_name: None,
            source_range: range_of(body),
        });
        self.visit_children(body, Scope {
            enclosing_type: Some(id),
            in_code: false,
            parent: id,
        });
    }

    /// Source-model name of an already-attached type.
    fn qualified_name_of(&self, id: NodeId) -> Option<String> {
        return self.tree.node(id).and_then(|n| return n.qualified_name.clone());
    }

    /// Text of a field child such as `name`.
    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        let child = node.child_by_field_name(field)?;
        return child.utf8_text(self.source.as_bytes()).ok().map(String::from);
    }
}

/// The `class_body` of an anonymous-class host, if it has one.
fn anonymous_body<'t>(node: Node<'t>, body_field: Option<&str>) -> Option<Node<'t>> {
    if let Some(field) = body_field {
        return node.child_by_field_name(field);
    }
    let mut cursor = node.walk();
    let body = node.named_children(&mut cursor).find(|c| return c.kind() == "class_body");
    return body;
}

/// Byte range of a CST node.
fn range_of(node: Node<'_>) -> SourceRange {
    let start = u32::try_from(node.start_byte()).unwrap_or(u32::MAX);
    let end = u32::try_from(node.end_byte()).unwrap_or(u32::MAX);
    return SourceRange::from_bounds(start, end);
}
