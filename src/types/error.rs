use thiserror::Error;

use super::atom::AtomId;

/// Configuration problems detected while compiling a rule group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unknown operator '{op}' on atom {id}")]
    UnknownOperator { id: AtomId, op: String },

    #[error("duplicate atom id {id}")]
    DuplicateAtomId { id: AtomId },

    #[error("invalid token '{token}' in logic expression")]
    InvalidToken { token: String },

    #[error("malformed logic '{logic}': {reason}")]
    MalformedLogic { logic: String, reason: String },

    #[error("logic references undefined atom {id}")]
    UndefinedAtomRef { id: AtomId },
}
