use std::collections::BTreeMap;
use std::fmt;

use super::atom::AtomId;

/// Outcome of evaluating a rule group against one record.
///
/// `reasons` maps every atom held responsible for a failure to its message.
/// It is empty exactly when the group fits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Verdict {
    fits: bool,
    reasons: BTreeMap<AtomId, String>,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fits {
            return f.write_str("fit");
        }
        let ids: Vec<String> = self.reasons.keys().map(ToString::to_string).collect();
        write!(f, "no fit: [{}]", ids.join(", "))
    }
}

impl Verdict {
    pub(crate) fn new(reasons: BTreeMap<AtomId, String>) -> Self {
        Self {
            fits: reasons.is_empty(),
            reasons,
        }
    }

    #[must_use]
    pub fn fits(&self) -> bool {
        self.fits
    }

    /// Responsible atom ids mapped to their messages.
    #[must_use]
    pub fn reasons(&self) -> &BTreeMap<AtomId, String> {
        &self.reasons
    }

    /// Responsible atom ids in ascending order.
    pub fn reason_ids(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.reasons.keys().copied()
    }
}
