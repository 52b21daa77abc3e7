//! Best-effort search for the declaration covering a byte range.
//!
//! The only oracle is `DeclarationTree::element_at`, which answers for a
//! single offset. A line spans many offsets, so the range is probed at its
//! start, then its end, then bisected: lower half before upper half. The first
//! non-root hit wins.

use crate::tree::DeclarationTree;
use crate::types::{NodeId, ResolvedMember};

/// Find the declaration covering `[start_offset, end_offset]`, preferring
/// the first hit from either end before narrowing by bisection.
/// Never returns the compilation-unit root.
pub fn find_smallest_enclosing(
    tree: &DeclarationTree,
    start_offset: u32,
    end_offset: u32,
) -> Option<ResolvedMember> {
    let found = probe_range(tree, start_offset, end_offset)?;
    return Some(ResolvedMember {
        declaration: found,
        enclosing_type_chain: tree.chain_to_top_level(found),
    });
}

/// Recursive probe. Returns the first non-root element in probe order.
fn probe_range(tree: &DeclarationTree, start_offset: u32, end_offset: u32) -> Option<NodeId> {
    tracing::trace!(start_offset, end_offset, "probing range");

    if let Some(found) = non_root_element_at(tree, start_offset) {
        return Some(found);
    }
    if end_offset <= start_offset {
        return None;
    }
    if let Some(found) = non_root_element_at(tree, end_offset) {
        return Some(found);
    }

    let half = end_offset.saturating_sub(start_offset) / 2;
    let mid = start_offset.saturating_add(half);
    if mid <= start_offset {
        return None;
    }

    return probe_range(tree, start_offset.saturating_add(1), mid)
        .or_else(|| return probe_range(tree, mid.saturating_add(1), end_offset.saturating_sub(1)));
}

/// `element_at`, with the root mapped to `None`.
fn non_root_element_at(tree: &DeclarationTree, offset: u32) -> Option<NodeId> {
    let found = tree.element_at(offset);
    return (found != tree.root()).then_some(found);
}
