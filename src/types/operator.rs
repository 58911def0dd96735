use std::fmt;
use std::str::FromStr;

/// Comparison operators an atom rule can apply to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Membership in a comma-separated literal list.
    In,
    NotIn,
    Regex,
    /// The field is absent.
    Empty,
    /// The field is present.
    NotEmpty,
    /// Interval membership, e.g. `[1,2)`.
    Between,
    /// Two comma-separated lists share an element.
    Intersect,
}

/// Returned when an operator string names no known operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl Operator {
    pub const ALL: [Operator; 13] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::Regex,
        Operator::Empty,
        Operator::NotEmpty,
        Operator::Between,
        Operator::Intersect,
    ];

    /// The symbolic spelling, e.g. `">="`.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "@",
            Operator::NotIn => "!@",
            Operator::Regex => "^$",
            Operator::Empty => "0",
            Operator::NotEmpty => "1",
            Operator::Between => "<<",
            Operator::Intersect => "@@",
        }
    }

    /// The word spelling, e.g. `"gte"`.
    #[must_use]
    pub fn word(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::NotIn => "nin",
            Operator::Regex => "regex",
            Operator::Empty => "empty",
            Operator::NotEmpty => "nempty",
            Operator::Between => "between",
            Operator::Intersect => "intersect",
        }
    }
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == s || op.word() == s)
            .ok_or_else(|| UnknownOperator(s.to_owned()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
