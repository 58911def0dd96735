//! Logic expression handling: normalization, token validation and the
//! structural probe run before a tree is built.

mod normalize;
mod probe;
mod token;

pub use normalize::normalize;
#[cfg(test)]
pub(crate) use probe::evaluate;
pub(crate) use probe::probe;
pub(crate) use token::{Token, tokenize};

use crate::types::{AtomId, CompileError};

/// Atom ids referenced by `logic`, in first-seen order without duplicates.
///
/// The expression is normalized first, so `"1and(2 or 1)"` yields `[1, 2]`.
///
/// # Errors
///
/// Returns [`CompileError::InvalidToken`] if the expression contains a word
/// that is not an id, keyword or bracket.
pub fn rule_ids_referenced_by(logic: &str) -> Result<Vec<AtomId>, CompileError> {
    let tokens = tokenize(&normalize(logic))?;
    let mut ids = Vec::new();
    for token in tokens {
        if let Token::Id(id) = token
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    Ok(ids)
}
