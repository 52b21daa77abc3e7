//! Binary class names for resolved declarations.
//!
//! Top-level, member, and anonymous type names come straight from the
//! declaration tree. Local classes are renumbered here: the source model
//! reports them as `Outer$Local`, but the loaded class is `Outer$<n>Local`,
//! where `<n>` is the one-based position of the class among all local types
//! declared in the same enclosing method.

use crate::tree::DeclarationTree;
use crate::types::{BinaryName, DeclarationKind, DeclarationNode, NodeId, ResolvedMember};

/// Produce the binary name a JVM compiler would give the type enclosing
/// (or equal to) the resolved declaration.
pub fn synthesize(tree: &DeclarationTree, resolved: &ResolvedMember) -> BinaryName {
    let leaf = tree.node(resolved.declaration);
    let chain = &resolved.enclosing_type_chain;

    let type_position = chain.iter().position(|id| {
        return tree.node(*id).is_some_and(|n| return n.kind == DeclarationKind::Type);
    });
    let Some(type_position) = type_position else {
        return BinaryName(leaf.map(own_name).unwrap_or_default());
    };

    let types_upward = chain.get(type_position..).unwrap_or_default();
    let mut name = types_upward
        .first()
        .and_then(|id| return tree.node(*id))
        .map(own_name)
        .unwrap_or_default();

    for id in types_upward {
        let Some(node) = tree.node(*id) else { continue };
        if node.kind != DeclarationKind::Type || !node.is_local || node.is_anonymous {
            continue;
        }
        let Some(ordinal) = local_ordinal(tree, *id, node) else { continue };
        name = renumber_local_segment(&name, node, ordinal);
    }

    return BinaryName(name);
}

/// One-based position of a local type among the local types declared
/// directly in its enclosing method, compared by identity.
fn local_ordinal(tree: &DeclarationTree, id: NodeId, node: &DeclarationNode) -> Option<usize> {
    let method = tree.node(node.parent?)?;
    let position = method
        .children
        .iter()
        .copied()
        .filter(|sibling| {
            return tree.node(*sibling).is_some_and(|s| {
                return s.kind == DeclarationKind::Type
                    && s.is_local
                    && !s.is_anonymous
                    && s.simple_name.is_some();
            });
        })
        .position(|sibling| return sibling == id)?;
    return position.checked_add(1);
}

/// Rewrite the `$Name` segment belonging to `local` as `$<ordinal>Name`.
///
/// Ancestors are renumbered after descendants, so the local type's own
/// qualified name is still an unmodified prefix of `name`; only that
/// segment is rewritten. Names that do not carry the prefix fall back to
/// replacing every `$Name` occurrence.
fn renumber_local_segment(name: &str, local: &DeclarationNode, ordinal: usize) -> String {
    let Some(simple) = local.simple_name.as_deref() else {
        return name.to_string();
    };
    let numbered = format!("${ordinal}{simple}");

    if let Some(prefix) = local.qualified_name.as_deref()
        && let Some(rest) = name.strip_prefix(prefix)
        && (rest.is_empty() || rest.starts_with('$'))
        && let Some(outer) = prefix.strip_suffix(&format!("${simple}"))
    {
        return format!("{outer}{numbered}{rest}");
    }

    tracing::debug!(name, simple, "local type name is not a prefix; replacing by substring");
    return name.replace(&format!("${simple}"), &numbered);
}

/// The name a node reports for itself.
fn own_name(node: &DeclarationNode) -> String {
    return node
        .qualified_name
        .clone()
        .or_else(|| return node.simple_name.clone())
        .unwrap_or_default();
}
