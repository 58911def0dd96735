use std::path::Path;

use serde::{Deserialize, Serialize};

use super::context::Context;
use super::error::CompileError;
use super::group::{GroupDef, RuleGroup};
use super::value::Value;

/// Serializable definition of a [`RuleCollection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub msg: String,
    pub groups: Vec<GroupDef>,
}

impl CollectionDef {
    /// Compile every group, in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] raised by a group.
    pub fn compile(self) -> Result<RuleCollection, CompileError> {
        let groups = self
            .groups
            .into_iter()
            .map(GroupDef::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleCollection::new(&self.name, &self.msg, groups))
    }
}

/// An ordered list of rule groups sharing a name and message.
///
/// Groups are tried in order; the first that fits wins. Groups without a
/// name are named after their 1-based position.
#[derive(Debug, Clone)]
pub struct RuleCollection {
    name: String,
    msg: String,
    groups: Vec<RuleGroup>,
}

impl RuleCollection {
    #[must_use]
    pub fn new(name: &str, msg: &str, groups: Vec<RuleGroup>) -> Self {
        let groups = groups
            .into_iter()
            .enumerate()
            .map(|(i, mut group)| {
                if group.name.as_deref().is_none_or(str::is_empty) {
                    group.name = Some((i + 1).to_string());
                }
                group
            })
            .collect();
        Self {
            name: name.to_owned(),
            msg: msg.to_owned(),
            groups,
        }
    }

    /// Parse and compile a collection from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FitruleError`](crate::FitruleError) if the JSON is invalid
    /// or any group fails to compile.
    pub fn from_json(text: &str) -> Result<Self, crate::FitruleError> {
        let def: CollectionDef = serde_json::from_str(text)?;
        Ok(def.compile()?)
    }

    /// Read a JSON collection definition from a file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`FitruleError`](crate::FitruleError) on I/O, JSON or compile
    /// failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::FitruleError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn msg(&self) -> &str {
        &self.msg
    }

    #[must_use]
    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// The first group, in order, whose verdict is a fit.
    #[must_use]
    pub fn fit(&self, ctx: &Context) -> Option<&RuleGroup> {
        let found = self.groups.iter().find(|group| group.fits(ctx));
        tracing::trace!(
            collection = %self.name,
            matched = found.and_then(RuleGroup::name).unwrap_or_default(),
            "collection fit"
        );
        found
    }

    /// Names of every group that fits, in order.
    #[must_use]
    pub fn fit_all(&self, ctx: &Context) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|group| group.fits(ctx))
            .filter_map(RuleGroup::name)
            .collect()
    }

    /// The output value of the first fitting group.
    #[must_use]
    pub fn fit_value(&self, ctx: &Context) -> Option<&Value> {
        self.fit(ctx).and_then(RuleGroup::value)
    }

    #[must_use]
    pub fn fit_i64(&self, ctx: &Context) -> Option<i64> {
        self.fit_value(ctx).and_then(Value::as_i64)
    }

    #[must_use]
    pub fn fit_f64(&self, ctx: &Context) -> Option<f64> {
        self.fit_value(ctx).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn fit_bool(&self, ctx: &Context) -> Option<bool> {
        self.fit_value(ctx).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn fit_str(&self, ctx: &Context) -> Option<&str> {
        self.fit_value(ctx).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AtomDef, atom};

    fn tiered() -> RuleCollection {
        let gold = RuleGroup::builder()
            .atom(atom("spend", ">=", 1000_i64))
            .name("gold")
            .value(3_i64)
            .compile()
            .unwrap();
        let silver = RuleGroup::builder()
            .atom(atom("spend", ">=", 100_i64))
            .value(2_i64)
            .compile()
            .unwrap();
        let any = RuleGroup::builder()
            .atom(AtomDef::new("spend", "nempty"))
            .value("member")
            .compile()
            .unwrap();
        RuleCollection::new("tier", "no tier", vec![gold, silver, any])
    }

    #[test]
    fn unnamed_groups_get_positions() {
        let c = tiered();
        let names: Vec<&str> = c.groups().iter().filter_map(RuleGroup::name).collect();
        assert_eq!(names, vec!["gold", "2", "3"]);
    }

    #[test]
    fn blank_names_get_positions_too() {
        let blank = RuleGroup::builder().name("").compile().unwrap();
        let c = RuleCollection::new("t", "", vec![blank]);
        assert_eq!(c.groups()[0].name(), Some("1"));
        assert_eq!(c.fit_all(&Context::new()), vec!["1"]);
    }

    #[test]
    fn fit_returns_first_match() {
        let c = tiered();
        let ctx = Context::new().set("spend", 5000_i64);
        assert_eq!(c.fit(&ctx).and_then(RuleGroup::name), Some("gold"));
        assert_eq!(c.fit_all(&ctx), vec!["gold", "2", "3"]);
    }

    #[test]
    fn fit_none_when_nothing_matches() {
        let c = tiered();
        assert!(c.fit(&Context::new()).is_none());
        assert!(c.fit_all(&Context::new()).is_empty());
        assert_eq!(c.fit_value(&Context::new()), None);
    }

    #[test]
    fn typed_getters_are_strict() {
        let c = tiered();
        let silver = Context::new().set("spend", 500_i64);
        assert_eq!(c.fit_i64(&silver), Some(2));
        assert_eq!(c.fit_f64(&silver), None);
        assert_eq!(c.fit_str(&silver), None);

        let member = Context::new().set("spend", 5_i64);
        assert_eq!(c.fit_str(&member), Some("member"));
        assert_eq!(c.fit_bool(&member), None);
    }

    #[test]
    fn metadata_accessors() {
        let c = tiered();
        assert_eq!(c.name(), "tier");
        assert_eq!(c.msg(), "no tier");
    }
}
