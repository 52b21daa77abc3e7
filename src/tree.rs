//! Arena-backed declaration tree and the single-offset `element_at` oracle.

use crate::types::{DeclarationKind, DeclarationNode, NodeId, SourceRange};

/// Parsed declarations of one source file. Node 0 is always the
/// compilation-unit root; every other node is reachable from it.
#[derive(Debug, Clone)]
pub struct DeclarationTree {
    /// All nodes, root first, parents before children.
    nodes: Vec<DeclarationNode>,
}

/// Fields describing a declaration about to be attached to the tree.
#[derive(Debug, Clone)]
pub struct NewDeclaration {
    /// Whether this is an anonymous class body.
    pub is_anonymous: bool,
    /// Whether this is a named type declared inside a code body.
    pub is_local: bool,
    /// What sort of declaration this is.
    pub kind: DeclarationKind,
    /// Source-model qualified name (types only).
    pub qualified_name: Option<String>,
    /// Declared name, if any.
    pub simple_name: Option<String>,
    /// Bytes covered by the declaration.
    pub source_range: SourceRange,
}

impl DeclarationTree {
    /// Create a tree holding only a root that spans `source_len` bytes.
    pub fn new(source_len: u32) -> Self {
        let root = DeclarationNode {
            children: Vec::new(),
            is_anonymous: false,
            is_local: false,
            kind: DeclarationKind::CompilationUnitRoot,
            parent: None,
            qualified_name: None,
            simple_name: None,
            source_range: SourceRange::from_bounds(0, source_len),
        };
        return Self { nodes: vec![root] };
    }

    /// Attach a declaration as the last child of `parent`.
    /// An unknown `parent` attaches to the root.
    pub fn push(&mut self, parent: NodeId, declaration: NewDeclaration) -> NodeId {
        let parent = if self.nodes.get(parent.0).is_some() { parent } else { self.root() };
        let id = NodeId(self.nodes.len());
        self.nodes.push(DeclarationNode {
            children: Vec::new(),
            is_anonymous: declaration.is_anonymous,
            is_local: declaration.is_local,
            kind: declaration.kind,
            parent: Some(parent),
            qualified_name: declaration.qualified_name,
            simple_name: declaration.simple_name,
            source_range: declaration.source_range,
        });
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.push(id);
        }
        return id;
    }

    /// The compilation-unit root.
    pub const fn root(&self) -> NodeId {
        return NodeId(0);
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&DeclarationNode> {
        return self.nodes.get(id.0);
    }

    /// Iterate every node with its id, root first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DeclarationNode)> {
        return self.nodes.iter().enumerate().map(|(i, n)| return (NodeId(i), n));
    }

    /// Deepest declaration whose range contains `offset`, or the root when
    /// no declaration does.
    pub fn element_at(&self, offset: u32) -> NodeId {
        let mut current = self.root();
        loop {
            let Some(node) = self.node(current) else {
                return current;
            };
            let next = node.children.iter().copied().find(|child| {
                return self
                    .node(*child)
                    .is_some_and(|c| return c.source_range.contains(offset));
            });
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// `id` followed by each ancestor, stopping before the root.
    pub fn chain_to_top_level(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            let Some(node) = self.node(cursor) else { break };
            if node.kind == DeclarationKind::CompilationUnitRoot {
                break;
            }
            chain.push(cursor);
            current = node.parent;
        }
        return chain;
    }

    /// Top-level type declarations in declaration order.
    pub fn top_level_types(&self) -> Vec<NodeId> {
        return self
            .node(self.root())
            .map(|root| {
                return root
                    .children
                    .iter()
                    .copied()
                    .filter(|c| {
                        return self.node(*c).is_some_and(|n| return n.kind == DeclarationKind::Type);
                    })
                    .collect();
            })
            .unwrap_or_default();
    }
}
