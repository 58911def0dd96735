mod atom;
mod collection;
mod context;
mod error;
mod evaluation_report;
mod group;
mod operator;
mod tree;
mod value;
mod verdict;

pub use atom::{Atom, AtomDef, AtomId, atom};
pub use collection::{CollectionDef, RuleCollection};
pub use context::Context;
pub use error::CompileError;
pub use evaluation_report::EvaluationReport;
pub use group::{BlameMode, GroupDef, GroupMeta, RuleGroup, RuleGroupBuilder};
pub use operator::{Operator, UnknownOperator};
pub use tree::{LogicTree, NodeId, NodeKind, TreeNode};
pub use value::{Extracted, Value};
pub use verdict::Verdict;
