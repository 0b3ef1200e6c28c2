use crate::BinaryOp::{And, Or};
use crate::Expression;
use crate::Expression::{Binary, Not, Var};

/// Syntactic normal-form transformations. Both methods rebuild fully owned
/// trees, so no subtree is ever shared between two parents of the result.
impl Expression {
    /// Perform a syntactic transformation which pushes every negation down
    /// to the variables (De Morgan laws plus double-negation elimination).
    ///
    /// In the result, the argument of every `Not` node is a `Var` node.
    pub fn to_negation_normal_form(&self) -> Expression {
        fn recursion(formula: &Expression, invert: bool) -> Expression {
            match formula {
                Var(name) => {
                    if invert {
                        Expression::mk_var(name.clone()).negation()
                    } else {
                        formula.clone()
                    }
                }
                Not(inner) => recursion(inner, !invert),
                Binary(op, left, right) => {
                    let left = recursion(left, invert);
                    let right = recursion(right, invert);
                    // An inverted conjunction becomes a disjunction and
                    // vice versa.
                    let op = match (op, invert) {
                        (And, false) | (Or, true) => And,
                        (Or, false) | (And, true) => Or,
                    };
                    Expression::mk_binary(op, left, right)
                }
            }
        }

        recursion(self, false)
    }

    /// Distribute conjunctions over disjunctions, i.e. rewrite
    /// `x & (y | z)` into `(x & y) | (x & z)` (and symmetrically) until no
    /// conjunction has a disjunction as a child.
    ///
    /// The input must already be in negation normal form (see
    /// [Self::to_negation_normal_form]), otherwise negations block the
    /// rewrites and the result is not a DNF shape. Terminates because every
    /// rewrite strictly decreases the and-over-or nesting depth.
    pub fn distribute_conjunctions(&self) -> Expression {
        match self {
            // In NNF, negations only appear on variables.
            Var(_) | Not(_) => self.clone(),
            Binary(Or, left, right) => {
                let left = left.distribute_conjunctions();
                let right = right.distribute_conjunctions();
                Expression::mk_binary(Or, left, right)
            }
            Binary(And, left, right) => {
                let left = left.distribute_conjunctions();
                let right = right.distribute_conjunctions();
                if let Binary(Or, r_left, r_right) = &right {
                    let one = left.clone().and((**r_left).clone());
                    let two = left.and((**r_right).clone());
                    Expression::mk_binary(
                        Or,
                        one.distribute_conjunctions(),
                        two.distribute_conjunctions(),
                    )
                } else if let Binary(Or, l_left, l_right) = &left {
                    let one = (**l_left).clone().and(right.clone());
                    let two = (**l_right).clone().and(right);
                    Expression::mk_binary(
                        Or,
                        one.distribute_conjunctions(),
                        two.distribute_conjunctions(),
                    )
                } else {
                    Expression::mk_binary(And, left, right)
                }
            }
        }
    }
}
