use thiserror::Error;

use crate::CompileError;

/// Unified error type covering configuration loading and compilation.
///
/// Returned by convenience loaders like
/// [`RuleGroup::from_json()`](crate::RuleGroup::from_json) and
/// [`RuleCollection::from_file()`](crate::RuleCollection::from_file).
#[derive(Debug, Error)]
pub enum FitruleError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
