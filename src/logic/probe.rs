use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;

use super::token::Token;
use crate::types::AtomId;

/// Structural problems found while evaluating a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ProbeError {
    #[error("unexpected `{token}` at position {position}")]
    Unexpected { token: Token, position: usize },
    #[error("expression ends where an operand is expected")]
    MissingOperand,
    #[error("unmatched `(`")]
    UnclosedParen,
    #[error("unmatched `)` at position {position}")]
    UnopenedParen { position: usize },
    #[error("operand stack underflow at `{op}`")]
    Underflow { op: &'static str },
    #[error("expression leaves {count} operands")]
    Leftover { count: usize },
    #[error("no value for atom {id}")]
    Unassigned { id: AtomId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Or,
    And,
    Not,
    Open,
}

impl Pending {
    fn precedence(self) -> u8 {
        match self {
            Pending::Open => 0,
            Pending::Or => 1,
            Pending::And => 2,
            Pending::Not => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Pending::Or => "or",
            Pending::And => "and",
            Pending::Not => "not",
            Pending::Open => "(",
        }
    }
}

fn apply(op: Pending, operands: &mut Vec<bool>) -> Result<(), ProbeError> {
    let underflow = || ProbeError::Underflow { op: op.name() };
    let result = match op {
        Pending::Not => !operands.pop().ok_or_else(underflow)?,
        Pending::And | Pending::Or => {
            let rhs = operands.pop().ok_or_else(underflow)?;
            let lhs = operands.pop().ok_or_else(underflow)?;
            if op == Pending::And { lhs && rhs } else { lhs || rhs }
        }
        Pending::Open => return Err(ProbeError::UnclosedParen),
    };
    operands.push(result);
    Ok(())
}

/// Evaluate a token stream with an operand stack and an operator stack.
///
/// Precedence is `not` > `and` > `or`; `not` is a prefix operator. Adjacency
/// is checked as tokens arrive, so `1 2`, `and 1` or `( )` are rejected
/// before they can corrupt the stacks.
pub(crate) fn evaluate(
    tokens: &[Token],
    values: &HashMap<AtomId, bool>,
) -> Result<bool, ProbeError> {
    let mut operands: Vec<bool> = Vec::new();
    let mut operators: Vec<Pending> = Vec::new();
    let mut expect_operand = true;

    for (position, &token) in tokens.iter().enumerate() {
        let unexpected = ProbeError::Unexpected { token, position };
        match token {
            Token::Id(id) => {
                if !expect_operand {
                    return Err(unexpected);
                }
                let value = values.get(&id).ok_or(ProbeError::Unassigned { id })?;
                operands.push(*value);
                expect_operand = false;
            }
            Token::Not | Token::Open => {
                if !expect_operand {
                    return Err(unexpected);
                }
                operators.push(if token == Token::Not {
                    Pending::Not
                } else {
                    Pending::Open
                });
            }
            Token::And | Token::Or => {
                if expect_operand {
                    return Err(unexpected);
                }
                let op = if token == Token::And {
                    Pending::And
                } else {
                    Pending::Or
                };
                while let Some(&top) = operators.last() {
                    if top == Pending::Open || top.precedence() < op.precedence() {
                        break;
                    }
                    operators.pop();
                    apply(top, &mut operands)?;
                }
                operators.push(op);
                expect_operand = true;
            }
            Token::Close => {
                if expect_operand {
                    return Err(unexpected);
                }
                loop {
                    match operators.pop() {
                        Some(Pending::Open) => break,
                        Some(op) => apply(op, &mut operands)?,
                        None => return Err(ProbeError::UnopenedParen { position }),
                    }
                }
            }
        }
    }

    if expect_operand {
        return Err(ProbeError::MissingOperand);
    }
    while let Some(op) = operators.pop() {
        apply(op, &mut operands)?;
    }
    match operands.as_slice() {
        [value] => Ok(*value),
        _ => Err(ProbeError::Leftover {
            count: operands.len(),
        }),
    }
}

/// Check that `tokens` form a well-structured boolean expression by
/// evaluating them once with a random truth value for every referenced id.
pub(crate) fn probe(tokens: &[Token]) -> Result<(), ProbeError> {
    let mut rng = rand::thread_rng();
    let values: HashMap<AtomId, bool> = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Id(id) => Some(*id),
            _ => None,
        })
        .map(|id| (id, rng.gen_bool(0.5)))
        .collect();
    evaluate(tokens, &values).map(|_| ())
}
