use crate::Expression::*;
use crate::{BinaryOp, Expression};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Error, Formatter};

/// Constructor and destructor utility methods. These mainly avoid unnecessary
/// boxing and exhaustive pattern matching when not necessary.
impl Expression {
    /// Create an `x` formula where `x` is a named variable.
    pub fn mk_var<T: Into<String>>(name: T) -> Expression {
        Var(name.into())
    }

    /// Create a `!phi` formula, where `phi` is an inner `Expression`.
    pub fn mk_not(inner: Expression) -> Expression {
        Not(Box::new(inner))
    }

    /// Create a `phi 'op' psi` where `phi` and `psi` are arguments of `op` operator.
    pub fn mk_binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
        Binary(op, Box::new(left), Box::new(right))
    }

    /// Negate this formula.
    pub fn negation(self) -> Expression {
        Expression::mk_not(self)
    }

    /// Create a conjunction.
    pub fn and(self, other: Expression) -> Expression {
        Expression::mk_binary(BinaryOp::And, self, other)
    }

    /// Create a disjunction.
    pub fn or(self, other: Expression) -> Expression {
        Expression::mk_binary(BinaryOp::Or, self, other)
    }

    /// If `Var`, return the name, otherwise return `None`.
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Var(name) => Some(name),
            _ => None,
        }
    }

    /// If `Not`, return the inner formula, otherwise return `None`.
    pub fn as_not(&self) -> Option<&Expression> {
        match self {
            Not(inner) => Some(inner),
            _ => None,
        }
    }

    /// If `Binary`, return the operator and left/right formulas, otherwise
    /// return `None`.
    pub fn as_binary(&self) -> Option<(&Expression, BinaryOp, &Expression)> {
        match self {
            Binary(op, l, r) => Some((l, *op, r)),
            _ => None,
        }
    }
}

/// Other utility methods.
impl Expression {
    /// Return a sorted vector of all variable names referenced by this formula.
    pub fn collect_variables(&self) -> Vec<String> {
        fn r_variables(formula: &Expression, vars: &mut HashSet<String>) {
            match formula {
                Var(name) => {
                    vars.insert(name.clone());
                }
                Not(inner) => r_variables(inner, vars),
                Binary(_, l, r) => {
                    r_variables(l, vars);
                    r_variables(r, vars);
                }
            };
        }
        let mut vars = HashSet::new();
        r_variables(self, &mut vars);
        let mut result: Vec<String> = vars.into_iter().collect();
        result.sort();
        result
    }

    /// Returns true if this formula references the given variable.
    pub fn contains_variable(&self, variable: &str) -> bool {
        match self {
            Var(name) => name == variable,
            Not(inner) => inner.contains_variable(variable),
            Binary(_, l, r) => l.contains_variable(variable) || r.contains_variable(variable),
        }
    }

    /// If possible, evaluate this formula using the given variable valuation.
    ///
    /// The result is `None` when a variable without an assigned value is
    /// needed to determine the output. Note that short-circuiting applies, so
    /// a partial valuation can still produce a definite result (`x & y`
    /// is false whenever `x = false`, regardless of `y`).
    pub fn evaluate(&self, values: &HashMap<String, bool>) -> Option<bool> {
        match self {
            Var(name) => values.get(name).cloned(),
            Not(inner) => inner.evaluate(values).map(|it| !it),
            Binary(op, left, right) => {
                let left = left.evaluate(values);
                let right = right.evaluate(values);
                match op {
                    BinaryOp::And => match (left, right) {
                        (Some(false), _) => Some(false),
                        (_, Some(false)) => Some(false),
                        (Some(true), Some(true)) => Some(true),
                        _ => None,
                    },
                    BinaryOp::Or => match (left, right) {
                        (Some(true), _) => Some(true),
                        (_, Some(true)) => Some(true),
                        (Some(false), Some(false)) => Some(false),
                        _ => None,
                    },
                }
            }
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Var(name) => write!(f, "{}", name),
            Not(inner) => write!(f, "!{}", inner),
            Binary(op, l, r) => write!(f, "({} {} {})", l, op, r),
        }
    }
}
