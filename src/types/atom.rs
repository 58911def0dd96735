use std::fmt;

use serde::{Deserialize, Serialize};

use super::context::Context;
use super::operator::Operator;
use super::value::{Extracted, Value};
use crate::predicate::{self, Prepared};

/// Identifier of an atom rule, unique within its rule group.
pub type AtomId = u32;

/// Definition of one atom rule as supplied by configuration.
///
/// Mirrors the JSON object `{ "op", "key", "val", "id", "msg" }`. The
/// operator is kept as text here and resolved when the owning group is
/// compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomDef {
    pub op: String,
    pub key: String,
    #[serde(default)]
    pub val: Option<Value>,
    #[serde(default)]
    pub id: Option<AtomId>,
    #[serde(default)]
    pub msg: String,
}

impl AtomDef {
    /// A definition without a literal, for `empty` / `nempty`.
    #[must_use]
    pub fn new(key: &str, op: &str) -> Self {
        Self {
            op: op.to_owned(),
            key: key.to_owned(),
            val: None,
            id: None,
            msg: String::new(),
        }
    }

    #[must_use]
    pub fn val(mut self, val: impl Into<Value>) -> Self {
        self.val = Some(val.into());
        self
    }

    #[must_use]
    pub fn id(mut self, id: AtomId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn msg(mut self, msg: &str) -> Self {
        self.msg = msg.to_owned();
        self
    }
}

/// Shorthand for an atom definition comparing `key` against `val` with `op`.
#[must_use]
pub fn atom(key: &str, op: &str, val: impl Into<Value>) -> AtomDef {
    AtomDef::new(key, op).val(val)
}

/// A compiled atom rule: operator resolved, id assigned, literal prepared.
#[derive(Debug, Clone)]
pub struct Atom {
    pub(crate) id: AtomId,
    pub(crate) key: String,
    pub(crate) op: Operator,
    pub(crate) val: Option<Value>,
    pub(crate) msg: String,
    pub(crate) prepared: Prepared,
}

impl Atom {
    pub(crate) fn new(
        id: AtomId,
        key: String,
        op: Operator,
        val: Option<Value>,
        msg: String,
    ) -> Self {
        let prepared = predicate::prepare(id, op, val.as_ref());
        Self {
            id,
            key,
            op,
            val,
            msg,
            prepared,
        }
    }

    #[must_use]
    pub fn id(&self) -> AtomId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn op(&self) -> Operator {
        self.op
    }

    #[must_use]
    pub fn val(&self) -> Option<&Value> {
        self.val.as_ref()
    }

    #[must_use]
    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// Apply this atom's comparison to an already extracted field value.
    #[must_use]
    pub fn fit(&self, value: Extracted<'_>) -> bool {
        predicate::fit(self, value)
    }

    /// Extract this atom's field from `ctx` and apply the comparison.
    #[must_use]
    pub fn evaluate(&self, ctx: &Context) -> bool {
        self.fit(ctx.extract(&self.key))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.val {
            Some(val) => write!(f, "#{}: {} {} {val}", self.id, self.key, self.op),
            None => write!(f, "#{}: {} {}", self.id, self.key, self.op),
        }
    }
}
