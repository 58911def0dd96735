use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::atom::AtomId;
use super::value::Value;
use super::verdict::Verdict;

/// Detailed evaluation report returned by
/// [`RuleGroup::evaluate_verbose()`](super::group::RuleGroup::evaluate_verbose).
///
/// Carries the verdict together with every atom's outcome, the field value
/// each atom saw, and the wall-clock duration of the evaluation.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    verdict: Verdict,
    outcomes: BTreeMap<AtomId, bool>,
    values: BTreeMap<AtomId, Option<Value>>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(
        verdict: Verdict,
        outcomes: BTreeMap<AtomId, bool>,
        values: BTreeMap<AtomId, Option<Value>>,
        duration: Duration,
    ) -> Self {
        Self {
            verdict,
            outcomes,
            values,
            duration,
        }
    }

    /// The evaluation verdict, same as [`RuleGroup::evaluate()`](super::group::RuleGroup::evaluate).
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Outcome of every atom, fit or not.
    #[must_use]
    pub fn outcomes(&self) -> &BTreeMap<AtomId, bool> {
        &self.outcomes
    }

    /// The scalar each atom compared against; `None` when the field was
    /// absent or not a scalar.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<AtomId, Option<Value>> {
        &self.values
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "verdict: {}", self.verdict)?;
        let fitted: Vec<String> = self
            .outcomes
            .iter()
            .filter(|(_, fit)| **fit)
            .map(|(id, _)| id.to_string())
            .collect();
        write!(f, ", fitted: [{}]", fitted.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
