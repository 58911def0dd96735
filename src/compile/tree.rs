//! Precedence-aware splitting of a normalized logic expression into a
//! [`LogicTree`], annotating every node with `should` and `blamed`.

use crate::types::{AtomId, CompileError, LogicTree, NodeId, NodeKind, TreeNode};

/// Deepest run of brackets and `not`s an operand may sit under.
const MAX_NESTING: usize = 256;

/// A top-level element of a token slice: one word, or a whole parenthesized
/// group treated as an opaque operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    start: usize,
    end: usize,
    group: bool,
}

/// Build the tree for an already normalized and validated expression.
///
/// # Errors
///
/// Returns [`CompileError::MalformedLogic`] if the expression cannot be
/// split into a well-formed tree (empty operands, unbalanced brackets,
/// operands that are not ids, nesting deeper than [`MAX_NESTING`]).
pub(crate) fn build_tree(normalized: &str) -> Result<LogicTree, CompileError> {
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if nesting(&tokens) > MAX_NESTING {
        return Err(CompileError::MalformedLogic {
            logic: normalized.to_owned(),
            reason: format!("nesting deeper than {MAX_NESTING} levels"),
        });
    }
    let mut builder = Builder {
        logic: normalized,
        nodes: Vec::new(),
        leaves: Vec::new(),
    };
    builder.build(&tokens, true, true)?;

    tracing::debug!(
        logic = normalized,
        nodes = builder.nodes.len(),
        leaves = builder.leaves.len(),
        "built logic tree"
    );

    Ok(LogicTree {
        logic: normalized.to_owned(),
        nodes: builder.nodes,
        leaves: builder.leaves,
    })
}

struct Builder<'a> {
    logic: &'a str,
    nodes: Vec<TreeNode>,
    leaves: Vec<NodeId>,
}

impl Builder<'_> {
    fn malformed(&self, reason: impl Into<String>) -> CompileError {
        CompileError::MalformedLogic {
            logic: self.logic.to_owned(),
            reason: reason.into(),
        }
    }

    fn build(
        &mut self,
        tokens: &[&str],
        should: bool,
        blamed: bool,
    ) -> Result<NodeId, CompileError> {
        if tokens.is_empty() {
            return Err(self.malformed("empty sub-expression"));
        }
        let units = self.units(tokens)?;

        // A fully bracketed slice is the same node as its contents.
        if let [unit] = units.as_slice()
            && unit.group
        {
            return self.build(&tokens[unit.start + 1..unit.end - 1], should, blamed);
        }

        let (kind, parts) = if let Some(parts) = split(tokens, &units, "or") {
            (NodeKind::Or, parts)
        } else if let Some(parts) = split(tokens, &units, "and") {
            (NodeKind::And, parts)
        } else if tokens[0] == "not" {
            (NodeKind::Not, vec![&tokens[1..]])
        } else if let [word] = tokens {
            let id = word
                .parse::<AtomId>()
                .map_err(|_| self.malformed(format!("'{word}' is not an atom id")))?;
            return Ok(self.push_leaf(id, should, blamed));
        } else {
            return Err(self.malformed(format!("cannot split '{}'", tokens.join(" "))));
        };

        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            expr: tokens.join(" "),
            kind,
            children: Vec::new(),
            should,
            blamed,
        });

        let mut children = Vec::with_capacity(parts.len());
        for (position, part) in parts.into_iter().enumerate() {
            let (child_should, child_blamed) = match kind {
                NodeKind::Not => (!should, blamed),
                NodeKind::Or => (should, blamed && position == 0),
                _ => (should, blamed),
            };
            children.push(self.build(part, child_should, child_blamed)?);
        }
        self.nodes[id].children = children;
        Ok(id)
    }

    fn push_leaf(&mut self, atom: AtomId, should: bool, blamed: bool) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            expr: atom.to_string(),
            kind: NodeKind::Leaf(atom),
            children: Vec::new(),
            should,
            blamed,
        });
        self.leaves.push(id);
        id
    }

    /// Group `tokens` into top-level units, eliding bracketed groups.
    fn units(&self, tokens: &[&str]) -> Result<Vec<Unit>, CompileError> {
        let mut units = Vec::new();
        let mut depth = 0_usize;
        let mut open = 0;
        for (i, &token) in tokens.iter().enumerate() {
            match token {
                "(" => {
                    if depth == 0 {
                        open = i;
                    }
                    depth += 1;
                }
                ")" => {
                    if depth == 0 {
                        return Err(self.malformed("unmatched ')'"));
                    }
                    depth -= 1;
                    if depth == 0 {
                        units.push(Unit {
                            start: open,
                            end: i + 1,
                            group: true,
                        });
                    }
                }
                _ if depth == 0 => units.push(Unit {
                    start: i,
                    end: i + 1,
                    group: false,
                }),
                _ => {}
            }
        }
        if depth != 0 {
            return Err(self.malformed("unmatched '('"));
        }
        Ok(units)
    }
}

/// How many brackets and pending `not`s enclose the deepest operand.
/// Each bracket level costs one plus the `not`s applied to it.
fn nesting(tokens: &[&str]) -> usize {
    let mut frames = Vec::new();
    let mut depth = 0_usize;
    let mut nots = 0_usize;
    let mut deepest = 0;
    for &token in tokens {
        match token {
            "not" => nots += 1,
            "(" => {
                frames.push(nots + 1);
                depth += nots + 1;
                nots = 0;
            }
            ")" => depth -= frames.pop().unwrap_or(0),
            _ => nots = 0,
        }
        deepest = deepest.max(depth + nots);
    }
    deepest
}

/// Cut `tokens` at every top-level occurrence of `word`. `None` if there is
/// no such occurrence.
fn split<'t, 's>(tokens: &'t [&'s str], units: &[Unit], word: &str) -> Option<Vec<&'t [&'s str]>> {
    let cuts: Vec<usize> = units
        .iter()
        .filter(|unit| !unit.group && tokens[unit.start] == word)
        .map(|unit| unit.start)
        .collect();
    if cuts.is_empty() {
        return None;
    }
    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut from = 0;
    for cut in cuts {
        parts.push(&tokens[from..cut]);
        from = cut + 1;
    }
    parts.push(&tokens[from..]);
    Some(parts)
}
