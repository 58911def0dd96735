use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::compile::build_tree;
use crate::types::{CompileError, LogicTree};

static GLOBAL: Lazy<TreeCache> = Lazy::new(TreeCache::new);

/// Compiled logic trees keyed by normalized expression text.
///
/// A tree depends only on its expression, so groups with the same logic
/// share one [`Arc<LogicTree>`]. Lookups take a read lock; a miss builds the
/// tree outside any lock and only a successful build is stored. Entries are
/// never evicted.
#[derive(Debug, Default)]
pub struct TreeCache {
    trees: RwLock<HashMap<String, Arc<LogicTree>>>,
}

impl TreeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by [`compile()`](crate::compile).
    #[must_use]
    pub fn global() -> &'static TreeCache {
        &GLOBAL
    }

    /// Return the cached tree for `normalized`, building it on a miss.
    ///
    /// When two threads miss on the same expression concurrently, both build
    /// and the first insert wins; both callers receive the stored tree.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MalformedLogic`] if the tree cannot be built.
    /// Nothing is cached in that case.
    pub fn get_or_build(&self, normalized: &str) -> Result<Arc<LogicTree>, CompileError> {
        if let Some(tree) = self.get(normalized) {
            tracing::debug!(logic = normalized, "logic tree cache hit");
            return Ok(tree);
        }
        let built = Arc::new(build_tree(normalized)?);
        let mut trees = self.trees.write();
        let tree = trees.entry(normalized.to_owned()).or_insert(built);
        Ok(Arc::clone(tree))
    }

    #[must_use]
    pub fn get(&self, normalized: &str) -> Option<Arc<LogicTree>> {
        self.trees.read().get(normalized).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.read().is_empty()
    }

    pub fn clear(&self) {
        self.trees.write().clear();
    }
}
