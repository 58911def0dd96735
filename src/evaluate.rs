use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::types::{
    Atom, AtomId, BlameMode, Context, EvaluationReport, LogicTree, NodeKind, RuleGroup, Verdict,
};

pub(crate) fn evaluate(group: &RuleGroup, ctx: &Context) -> Verdict {
    let outcomes = outcomes(&group.atoms, ctx);
    let verdict = verdict(group, &outcomes);
    tracing::trace!(
        group = group.name.as_deref().unwrap_or_default(),
        fits = verdict.fits(),
        reasons = ?verdict.reason_ids().collect::<Vec<_>>(),
        "evaluated rule group"
    );
    verdict
}

pub(crate) fn evaluate_detailed(group: &RuleGroup, ctx: &Context) -> EvaluationReport {
    let start = Instant::now();
    let outcomes = outcomes(&group.atoms, ctx);
    let verdict = verdict(group, &outcomes);
    let duration = start.elapsed();

    let values = group
        .atoms
        .iter()
        .map(|atom| (atom.id, ctx.get(&atom.key).cloned()))
        .collect();
    EvaluationReport::new(verdict, outcomes, values, duration)
}

fn outcomes(atoms: &[Atom], ctx: &Context) -> BTreeMap<AtomId, bool> {
    atoms
        .iter()
        .map(|atom| (atom.id, atom.evaluate(ctx)))
        .collect()
}

fn verdict(group: &RuleGroup, outcomes: &BTreeMap<AtomId, bool>) -> Verdict {
    let blamed = match &group.tree {
        None => outcomes
            .iter()
            .filter(|(_, fit)| !**fit)
            .map(|(id, _)| *id)
            .collect(),
        Some(tree) => match group.blame_mode {
            BlameMode::FirstDisjunct => blame_marked_leaves(tree, outcomes),
            BlameMode::Exhaustive => blame_diverging_paths(tree, outcomes),
        },
    };

    let reasons = group
        .atoms
        .iter()
        .filter(|atom| blamed.contains(&atom.id))
        .map(|atom| (atom.id, atom.msg.clone()))
        .collect();
    Verdict::new(reasons)
}

fn outcome(outcomes: &BTreeMap<AtomId, bool>, id: AtomId) -> bool {
    outcomes.get(&id).copied().unwrap_or(false)
}

/// Compare every blamed leaf against its expected value. No boolean
/// evaluation of inner nodes takes place.
fn blame_marked_leaves(tree: &LogicTree, outcomes: &BTreeMap<AtomId, bool>) -> BTreeSet<AtomId> {
    tree.leaves()
        .filter(|leaf| leaf.blamed)
        .filter_map(|leaf| leaf.atom_id().map(|id| (id, leaf.should)))
        .filter(|&(id, should)| outcome(outcomes, id) != should)
        .map(|(id, _)| id)
        .collect()
}

/// Evaluate every node, then collect the leaves reachable from the root
/// through nodes whose value differs from their expected value.
fn blame_diverging_paths(
    tree: &LogicTree,
    outcomes: &BTreeMap<AtomId, bool>,
) -> BTreeSet<AtomId> {
    let values = node_values(tree, outcomes);
    let mut blamed = BTreeSet::new();
    let mut stack = vec![0];
    while let Some(id) = stack.pop() {
        let node = &tree.nodes[id];
        if values[id] == node.should {
            continue;
        }
        match node.kind {
            NodeKind::Leaf(atom) => {
                blamed.insert(atom);
            }
            _ => stack.extend(node.children.iter().copied()),
        }
    }
    blamed
}

/// Children always sit after their parent, so one reverse pass suffices.
fn node_values(tree: &LogicTree, outcomes: &BTreeMap<AtomId, bool>) -> Vec<bool> {
    let mut values = vec![false; tree.nodes.len()];
    for (id, node) in tree.nodes.iter().enumerate().rev() {
        values[id] = match node.kind {
            NodeKind::Leaf(atom) => outcome(outcomes, atom),
            NodeKind::And => node.children.iter().all(|&c| values[c]),
            NodeKind::Or => node.children.iter().any(|&c| values[c]),
            NodeKind::Not => node.children.first().is_some_and(|&c| !values[c]),
        };
    }
    values
}
