use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::TreeCache;
use crate::logic::{Token, normalize, probe, tokenize};
use crate::types::{
    Atom, AtomDef, AtomId, CompileError, GroupMeta, LogicTree, Operator, RuleGroup, UnknownOperator,
};

mod tree;

pub(crate) use tree::build_tree;

/// Compile atom definitions and a logic expression into a [`RuleGroup`].
///
/// Trees are shared through [`TreeCache::global()`]; use
/// [`RuleGroupBuilder::compile_with_cache()`](crate::RuleGroupBuilder::compile_with_cache)
/// to supply a different cache.
///
/// The global cache never evicts: every distinct normalized expression stays
/// for the life of the process. Long-running callers that keep loading new
/// logic should pass their own cache through `compile_with_cache` or call
/// [`TreeCache::clear()`] on reload.
///
/// # Errors
///
/// Returns a [`CompileError`] for an unknown operator, a duplicate atom id,
/// an invalid or malformed logic expression (including nesting deeper than
/// 256 brackets and negations), or a reference to an atom id the group does
/// not define.
pub fn compile(
    atoms: Vec<AtomDef>,
    logic: &str,
    meta: GroupMeta,
) -> Result<RuleGroup, CompileError> {
    compile_with(atoms, logic, meta, TreeCache::global())
}

pub(crate) fn compile_with(
    defs: Vec<AtomDef>,
    logic: &str,
    meta: GroupMeta,
    cache: &TreeCache,
) -> Result<RuleGroup, CompileError> {
    let ids = assign_ids(&defs)?;
    let atoms = resolve_atoms(defs, &ids)?;

    let normalized = normalize(logic);
    let tree = if normalized.is_empty() {
        None
    } else {
        Some(compile_logic(&normalized, &ids, cache)?)
    };

    tracing::debug!(
        group = meta.name.as_deref().unwrap_or_default(),
        atoms = atoms.len(),
        logic = %normalized,
        "compiled rule group"
    );

    Ok(RuleGroup {
        name: meta.name,
        msg: meta.msg.unwrap_or_default(),
        value: meta.value,
        blame_mode: meta.blame_mode,
        atoms,
        logic: normalized,
        tree,
    })
}

fn compile_logic(
    normalized: &str,
    ids: &[AtomId],
    cache: &TreeCache,
) -> Result<Arc<LogicTree>, CompileError> {
    let tokens = tokenize(normalized)?;
    probe(&tokens).map_err(|e| CompileError::MalformedLogic {
        logic: normalized.to_owned(),
        reason: e.to_string(),
    })?;
    check_references(&tokens, ids)?;
    cache.get_or_build(normalized)
}

/// Explicit ids are kept; the rest are numbered upward from the largest
/// explicit id.
fn assign_ids(defs: &[AtomDef]) -> Result<Vec<AtomId>, CompileError> {
    let mut next = defs
        .iter()
        .filter_map(|def| def.id)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(defs.len());
    for def in defs {
        let id = match def.id {
            Some(id) => id,
            None => {
                let id = next;
                next = next.saturating_add(1);
                id
            }
        };
        if !seen.insert(id) {
            return Err(CompileError::DuplicateAtomId { id });
        }
        ids.push(id);
    }
    Ok(ids)
}

fn resolve_atoms(defs: Vec<AtomDef>, ids: &[AtomId]) -> Result<Vec<Atom>, CompileError> {
    defs.into_iter()
        .zip(ids)
        .map(|(def, &id)| {
            let op: Operator = def
                .op
                .parse()
                .map_err(|UnknownOperator(op)| CompileError::UnknownOperator { id, op })?;
            Ok(Atom::new(id, def.key, op, def.val, def.msg))
        })
        .collect()
}

fn check_references(tokens: &[Token], ids: &[AtomId]) -> Result<(), CompileError> {
    for token in tokens {
        if let Token::Id(id) = *token
            && !ids.contains(&id)
        {
            return Err(CompileError::UndefinedAtomRef { id });
        }
    }
    Ok(())
}
