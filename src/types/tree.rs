use std::fmt;

use super::atom::AtomId;

/// Index of a node inside a [`LogicTree`].
pub type NodeId = usize;

/// What a tree node computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// References an atom rule.
    Leaf(AtomId),
    And,
    Or,
    Not,
}

/// One node of a compiled logic expression.
///
/// `should` is the value this node must take for the whole expression to be
/// true. `blamed` marks nodes whose divergence from `should` is reported as a
/// reason when the expression fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub(crate) expr: String,
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<NodeId>,
    pub(crate) should: bool,
    pub(crate) blamed: bool,
}

impl TreeNode {
    /// The normalized sub-expression this node was built from.
    #[must_use]
    pub fn expr(&self) -> &str {
        &self.expr
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn should(&self) -> bool {
        self.should
    }

    #[must_use]
    pub fn blamed(&self) -> bool {
        self.blamed
    }

    #[must_use]
    pub fn atom_id(&self) -> Option<AtomId> {
        match self.kind {
            NodeKind::Leaf(id) => Some(id),
            _ => None,
        }
    }
}

/// A logic expression compiled into an arena of nodes.
///
/// The root is node `0` and every child has a larger index than its parent,
/// so a reverse scan over [`nodes()`](Self::nodes) visits children first.
/// Trees are immutable once built and shared between groups through
/// [`TreeCache`](crate::TreeCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicTree {
    pub(crate) logic: String,
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) leaves: Vec<NodeId>,
}

impl LogicTree {
    /// The normalized expression the tree was built from.
    #[must_use]
    pub fn logic(&self) -> &str {
        &self.logic
    }

    #[must_use]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Leaf nodes in left-to-right order. An atom referenced twice has two
    /// leaves.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.leaves.iter().map(|&id| &self.nodes[id])
    }
}

impl fmt::Display for LogicTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn walk(
            tree: &LogicTree,
            id: NodeId,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            let node = &tree.nodes[id];
            let kind = match node.kind {
                NodeKind::Leaf(atom) => format!("#{atom}"),
                NodeKind::And => "and".to_owned(),
                NodeKind::Or => "or".to_owned(),
                NodeKind::Not => "not".to_owned(),
            };
            let blame = if node.blamed { " *" } else { "" };
            writeln!(
                f,
                "{:indent$}{kind} should={}{blame}",
                "",
                node.should,
                indent = depth * 2
            )?;
            for &child in &node.children {
                walk(tree, child, depth + 1, f)?;
            }
            Ok(())
        }
        walk(self, 0, 0, f)
    }
}
