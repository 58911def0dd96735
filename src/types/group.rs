use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::atom::{Atom, AtomDef};
use super::context::Context;
use super::error::CompileError;
use super::evaluation_report::EvaluationReport;
use super::tree::LogicTree;
use super::value::Value;
use super::verdict::Verdict;
use crate::cache::TreeCache;

/// How failure reasons are attributed when a group has a logic expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlameMode {
    /// Only leaves marked responsible at compile time are compared, and only
    /// the first operand of every `or` is ever marked. Later disjuncts never
    /// contribute to the verdict or the reasons.
    #[default]
    FirstDisjunct,
    /// The expression is fully evaluated and every leaf on a path of
    /// diverging nodes is reported.
    Exhaustive,
}

/// Optional metadata attached to a compiled group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMeta {
    pub name: Option<String>,
    pub msg: Option<String>,
    /// Returned by the collection getters when this group fits.
    pub value: Option<Value>,
    pub blame_mode: BlameMode,
}

/// Serializable definition of a rule group.
///
/// ```json
/// { "name": "vip", "logic": "1 and 2", "value": 3,
///   "rules": [ { "op": ">=", "key": "age", "val": 18 }, ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDef {
    pub rules: Vec<AtomDef>,
    #[serde(default)]
    pub logic: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub blame_mode: BlameMode,
}

impl GroupDef {
    /// Compile this definition using the global tree cache.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if the definition is invalid.
    pub fn compile(self) -> Result<RuleGroup, CompileError> {
        let meta = GroupMeta {
            name: self.name,
            msg: self.msg,
            value: self.value,
            blame_mode: self.blame_mode,
        };
        crate::compile::compile(self.rules, &self.logic, meta)
    }
}

/// Builder for constructing a [`RuleGroup`].
///
/// # Example
///
/// ```
/// use fitrule::{Context, RuleGroupBuilder, atom};
///
/// let group = RuleGroupBuilder::new()
///     .atom(atom("age", ">=", 18_i64).msg("too young"))
///     .atom(atom("country", "in", "DE,FR"))
///     .logic("1 and 2")
///     .compile()
///     .unwrap();
///
/// let verdict = group.evaluate(&Context::new().set("age", 16_i64).set("country", "FR"));
/// assert!(!verdict.fits());
/// assert_eq!(verdict.reasons()[&1], "too young");
/// ```
#[derive(Debug, Default)]
pub struct RuleGroupBuilder {
    atoms: Vec<AtomDef>,
    logic: String,
    meta: GroupMeta,
}

impl RuleGroupBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn atom(mut self, def: AtomDef) -> Self {
        self.atoms.push(def);
        self
    }

    #[must_use]
    pub fn atoms(mut self, defs: impl IntoIterator<Item = AtomDef>) -> Self {
        self.atoms.extend(defs);
        self
    }

    /// Set the logic expression. Without one, every atom must fit.
    #[must_use]
    pub fn logic(mut self, logic: &str) -> Self {
        logic.clone_into(&mut self.logic);
        self
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.meta.name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn msg(mut self, msg: &str) -> Self {
        self.meta.msg = Some(msg.to_owned());
        self
    }

    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.meta.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn blame_mode(mut self, mode: BlameMode) -> Self {
        self.meta.blame_mode = mode;
        self
    }

    /// Compile into an immutable `RuleGroup`, sharing trees through
    /// [`TreeCache::global()`].
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if validation fails.
    pub fn compile(self) -> Result<RuleGroup, CompileError> {
        self.compile_with_cache(TreeCache::global())
    }

    /// Compile using `cache` for logic trees.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if validation fails.
    pub fn compile_with_cache(self, cache: &TreeCache) -> Result<RuleGroup, CompileError> {
        crate::compile::compile_with(self.atoms, &self.logic, self.meta, cache)
    }
}

/// A compiled, immutable rule group. Thread-safe and designed to live behind `Arc`.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub(crate) name: Option<String>,
    pub(crate) msg: String,
    pub(crate) value: Option<Value>,
    pub(crate) blame_mode: BlameMode,
    pub(crate) atoms: Vec<Atom>,
    /// Normalized; empty when the group has no logic expression.
    pub(crate) logic: String,
    pub(crate) tree: Option<Arc<LogicTree>>,
}

impl RuleGroup {
    #[must_use]
    pub fn builder() -> RuleGroupBuilder {
        RuleGroupBuilder::new()
    }

    /// Evaluate every atom against `ctx` and decide whether the group fits.
    pub fn evaluate(&self, ctx: &Context) -> Verdict {
        crate::evaluate::evaluate(self, ctx)
    }

    /// Shorthand for `self.evaluate(ctx).fits()`.
    #[must_use]
    pub fn fits(&self, ctx: &Context) -> bool {
        self.evaluate(ctx).fits()
    }

    /// Evaluate with per-atom outcomes, extracted values and timing.
    pub fn evaluate_verbose(&self, ctx: &Context) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, ctx)
    }

    /// Compile a group from a JSON array of atom definitions and a logic
    /// expression.
    ///
    /// # Errors
    ///
    /// Returns [`FitruleError`](crate::FitruleError) if the JSON is invalid
    /// or the group fails to compile.
    pub fn from_json(rules_json: &str, logic: &str) -> Result<Self, crate::FitruleError> {
        let defs: Vec<AtomDef> = serde_json::from_str(rules_json)?;
        let group = crate::compile::compile(defs, logic, GroupMeta::default())?;
        Ok(group)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn msg(&self) -> &str {
        &self.msg
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn blame_mode(&self) -> BlameMode {
        self.blame_mode
    }

    /// The normalized logic expression; empty when the group has none.
    #[must_use]
    pub fn logic(&self) -> &str {
        &self.logic
    }

    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[must_use]
    pub fn tree(&self) -> Option<&LogicTree> {
        self.tree.as_deref()
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        if self.logic.is_empty() {
            write!(f, "{name}: all of {} atoms", self.atoms.len())
        } else {
            write!(f, "{name}: {}", self.logic)
        }
    }
}
