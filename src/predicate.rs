//! Atom predicate evaluation.
//!
//! Literals that need parsing (regex patterns, intervals, comma lists) are
//! prepared once when the atom is compiled. A literal that cannot be
//! prepared does not fail compilation; the atom simply never fits.

use std::ops::Bound;

use regex::Regex;
use winnow::ascii::{float, space0};
use winnow::combinator::{alt, delimited, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;

use crate::types::{Atom, AtomId, Extracted, Operator, Value};

/// Tolerance for numeric membership in `in` / `nin` lists.
const LIST_EPSILON: f64 = 1e-5;

/// Literal data pre-computed for an atom's operator.
#[derive(Debug, Clone)]
pub(crate) enum Prepared {
    /// Compared directly against the raw literal.
    Scalar,
    /// Comma-separated items, trimmed.
    List(Vec<String>),
    /// `None` when the pattern failed to compile.
    Pattern(Option<Regex>),
    /// `None` when the literal is not a valid interval.
    Interval(Option<Interval>),
}

/// A numeric interval with independent bounds on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Interval {
    lower: Bound<f64>,
    upper: Bound<f64>,
}

impl Interval {
    fn contains(&self, x: f64) -> bool {
        let above = match self.lower {
            Bound::Included(a) => x >= a,
            Bound::Excluded(a) => x > a,
            Bound::Unbounded => true,
        };
        let below = match self.upper {
            Bound::Included(b) => x <= b,
            Bound::Excluded(b) => x < b,
            Bound::Unbounded => true,
        };
        above && below
    }
}

pub(crate) fn prepare(id: AtomId, op: Operator, literal: Option<&Value>) -> Prepared {
    match op {
        Operator::In | Operator::NotIn | Operator::Intersect => {
            Prepared::List(literal.map(literal_items).unwrap_or_default())
        }
        Operator::Regex => {
            let Some(pattern) = literal.map(literal_text) else {
                tracing::warn!(atom = id, "regex atom has no pattern, atom will never fit");
                return Prepared::Pattern(None);
            };
            match Regex::new(&pattern) {
                Ok(re) => Prepared::Pattern(Some(re)),
                Err(e) => {
                    tracing::warn!(atom = id, pattern = %pattern, error = %e, "invalid regex, atom will never fit");
                    Prepared::Pattern(None)
                }
            }
        }
        Operator::Between => {
            let interval = literal.and_then(Value::as_str).and_then(parse_interval);
            if interval.is_none() {
                tracing::warn!(atom = id, literal = ?literal, "invalid interval, atom will never fit");
            }
            Prepared::Interval(interval)
        }
        _ => Prepared::Scalar,
    }
}

/// Evaluate `atom` against one extracted field value. Never fails: every
/// incomparable combination is `false`.
pub(crate) fn fit(atom: &Atom, value: Extracted<'_>) -> bool {
    match atom.op {
        Operator::Empty => return !value.is_present(),
        Operator::NotEmpty => return value.is_present(),
        _ => {}
    }
    if matches!(value, Extracted::Absent | Extracted::Unsupported) {
        return false;
    }

    match (&atom.prepared, atom.op) {
        (Prepared::List(items), Operator::In) => in_list(items, value),
        (Prepared::List(items), Operator::NotIn) => !in_list(items, value),
        (Prepared::List(items), Operator::Intersect) => intersect(items, value),
        (Prepared::Pattern(re), _) => match (re, value.stringify()) {
            (Some(re), Some(text)) => re.is_match(&text),
            _ => false,
        },
        (Prepared::Interval(interval), _) => match (interval, value.as_number()) {
            (Some(interval), Some(x)) => interval.contains(x),
            _ => false,
        },
        (_, op) => match &atom.val {
            Some(literal) => compare(op, value, literal.extracted()),
            None => false,
        },
    }
}

#[allow(clippy::float_cmp)]
fn compare(op: Operator, actual: Extracted<'_>, expected: Extracted<'_>) -> bool {
    if let (Extracted::Text(a), Extracted::Text(b)) = (actual, expected) {
        return match op {
            Operator::Eq => a == b,
            Operator::Neq => a != b,
            Operator::Gt => a > b,
            Operator::Gte => a >= b,
            Operator::Lt => a < b,
            Operator::Lte => a <= b,
            _ => false,
        };
    }
    let (Some(a), Some(b)) = (actual.as_number(), expected.as_number()) else {
        return false;
    };
    match op {
        Operator::Eq => a == b,
        Operator::Neq => a != b,
        Operator::Gt => a > b,
        Operator::Gte => a >= b,
        Operator::Lt => a < b,
        Operator::Lte => a <= b,
        _ => false,
    }
}

fn in_list(items: &[String], value: Extracted<'_>) -> bool {
    match value {
        Extracted::Text(s) => items.iter().any(|item| item == s),
        other => match other.as_number() {
            Some(x) => items
                .iter()
                .filter_map(|item| item.parse::<f64>().ok())
                .any(|n| (n - x).abs() < LIST_EPSILON),
            None => false,
        },
    }
}

fn intersect(items: &[String], value: Extracted<'_>) -> bool {
    let Some(text) = value.stringify() else {
        return false;
    };
    text.split(',')
        .map(str::trim)
        .any(|v| items.iter().any(|item| item == v))
}

fn literal_text(literal: &Value) -> String {
    match literal {
        Value::String(s) => s.clone(),
        other => other.extracted().stringify().unwrap_or_default(),
    }
}

fn literal_items(literal: &Value) -> Vec<String> {
    literal_text(literal)
        .split(',')
        .map(|item| item.trim().to_owned())
        .collect()
}

// -- Interval literals: ('[' | '(') NUMBER? ',' NUMBER? (']' | ')') ---------

fn bound_number(input: &mut &str) -> ModalResult<Option<f64>> {
    delimited(space0, opt(float::<_, f64, _>), space0).parse_next(input)
}

fn interval(input: &mut &str) -> ModalResult<Interval> {
    let lower_inclusive = alt(('['.value(true), '('.value(false))).parse_next(input)?;
    let lower = bound_number(input)?;
    ','.parse_next(input)?;
    let upper = bound_number(input)?;
    let upper_inclusive = alt((']'.value(true), ')'.value(false))).parse_next(input)?;

    Ok(Interval {
        lower: to_bound(lower, lower_inclusive),
        upper: to_bound(upper, upper_inclusive),
    })
}

fn to_bound(value: Option<f64>, inclusive: bool) -> Bound<f64> {
    match value {
        None => Bound::Unbounded,
        Some(v) if inclusive => Bound::Included(v),
        Some(v) => Bound::Excluded(v),
    }
}

pub(crate) fn parse_interval(literal: &str) -> Option<Interval> {
    interval.parse(literal.trim()).ok()
}
