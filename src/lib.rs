//! Boolean rule matching with failure attribution.
//!
//! A [`RuleGroup`] combines atom rules (`key op value`) with a logic
//! expression over their ids such as `"1 and (2 or not 3)"`. Evaluating a
//! group against a [`Context`] yields a [`Verdict`]: whether the record
//! fits, and which atoms are responsible when it does not.
//!
//! ```
//! use fitrule::{Context, RuleGroup};
//!
//! let group = RuleGroup::from_json(
//!     r#"[
//!         { "op": "<",  "key": "SecondsAfterOnShelf", "val": 21600 },
//!         { "op": "=",  "key": "CustomerType",        "val": "new", "msg": "not a new customer" }
//!     ]"#,
//!     "1 and 2",
//! )
//! .unwrap();
//!
//! let ctx = Context::new()
//!     .set("SecondsAfterOnShelf", 2160_i64)
//!     .set("CustomerType", "returning");
//!
//! let verdict = group.evaluate(&ctx);
//! assert!(!verdict.fits());
//! assert_eq!(verdict.reasons()[&2], "not a new customer");
//! ```

mod cache;
mod compile;
mod error;
mod evaluate;
mod logic;
mod predicate;
mod types;

pub use cache::TreeCache;
pub use compile::compile;
pub use error::FitruleError;
pub use logic::{normalize, rule_ids_referenced_by};
pub use types::{
    Atom, AtomDef, AtomId, BlameMode, CollectionDef, CompileError, Context, EvaluationReport,
    Extracted, GroupDef, GroupMeta, LogicTree, NodeId, NodeKind, Operator, RuleCollection,
    RuleGroup, RuleGroupBuilder, TreeNode, UnknownOperator, Value, Verdict, atom,
};
