//! A library for canonicalizing Boolean update functions and reducing Boolean
//! network models.
//!
//! The main pipeline turns an arbitrary Boolean [Expression] into a minimized
//! disjunctive-normal-form [Dnf] (negation normal form, distribution of `&`
//! over `|`, subsumption elimination and consensus merging), and uses this
//! representation to simplify a whole [BooleanModel]: constant update
//! functions are propagated transitively through the network and "mediator"
//! variables (plain copies or negations of another variable) are collapsed.
//!
//! Note that the minimization is a bounded heuristic: equal [Dnf] encodings
//! guarantee semantic equivalence, but semantically equivalent functions can
//! still produce different encodings. Full semantic comparison requires an
//! external solver and is intentionally not part of this crate.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// **(internal)** Utility methods for `BinaryOp`.
mod _impl_binary_op;
/// **(internal)** Utility methods for `BooleanModel`.
mod _impl_boolean_model;
/// **(internal)** Utility methods for `Conjunction`, including the sorted-set
/// algebra used throughout minimization.
mod _impl_conjunction;
/// **(internal)** Extraction, minimization, encoding and partial evaluation
/// of `Dnf` objects.
mod _impl_dnf;
/// **(internal)** Utility methods for `Expression`.
mod _impl_expression;
/// **(internal)** Signed dependency graph of a model: feedback loops,
/// functional circuits and distance metrics.
mod _impl_interaction_graph;
/// **(internal)** Negation-normal-form and distribution transformations
/// of `Expression` objects.
mod _impl_normal_form;
/// **(internal)** The two model reduction algorithms plus utility methods
/// for `ReducedModel`.
mod _impl_reduction;
/// **(internal)** Synchronous state transitions of a `BooleanModel`.
mod _impl_state_transitions;
/// **(internal)** Expression parser (tokenizer plus recursive descent).
mod _from_string_for_expression;

lazy_static! {
    /// A regex which matches valid variable identifiers (alphanumeric
    /// characters and underscores).
    pub static ref ID_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_]+$").unwrap();
}

/// Possible binary Boolean operators that can appear in an `Expression`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BinaryOp {
    And,
    Or,
}

/// A Boolean formula over named variables.
///
/// This is the parse-tree representation consumed by the normalization
/// pipeline. Note that the identifiers `true` and `false` are reserved:
/// they parse as ordinary variables, but model reduction treats them as
/// the respective Boolean constants.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Expression {
    Var(String),
    Not(Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
}

/// One AND-term of a disjunctive normal form: a set of positively and a set
/// of negatively occurring variable names.
///
/// Both sets are deduplicated, sorted, and mutually disjoint (a conjunction
/// requiring `x & !x` is constant false and is never constructed). Keeping
/// the sets sorted allows all set operations to run as linear merge scans.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Conjunction {
    positives: Vec<String>,
    negatives: Vec<String>,
}

/// A Boolean function in disjunctive normal form: a disjunction of
/// [Conjunction] terms.
///
/// An empty list of conjunctions explicitly represents the constant `false`
/// function (a disjunction of nothing is never satisfied). A `Dnf` which
/// contains an empty conjunction represents the constant `true` function.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Dnf {
    conjunctions: Vec<Conjunction>,
}

/// The outcome of partially evaluating a [Dnf] at one fixed variable value.
///
/// Every caller must branch on all three cases: the function either
/// collapsed to a constant, or remains a (possibly updated) `Dnf`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Evaluation {
    ConstantTrue,
    ConstantFalse,
    Updated(Dnf),
}

/// One update equation of a [BooleanModel]: a target variable together with
/// the expression computing its next value.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Equation {
    variable: String,
    function: Expression,
}

/// A Boolean network model: a list of update equations with unique left-hand
/// side variables.
///
/// Equations may reference variables that have no equation of their own.
/// Such variables are treated as free inputs: they are never assigned a
/// value and are never eliminated by reduction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BooleanModel {
    equations: Vec<Equation>,
    variable_to_index: HashMap<String, usize>,
}

/// The polarity of a dependency edge or a feedback loop.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Sign {
    Positive,
    Negative,
}

/// A signed dependency graph of a [BooleanModel]: an edge `x -> y` with a
/// [Sign] exists when `x` occurs (positively resp. negatively) in the update
/// function of `y`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InteractionGraph {
    successors: HashMap<String, Vec<(String, Sign)>>,
}

/// An alias binding produced by mediator collapsing: `variable` always
/// evaluates to `source` (when `positive`) or its negation.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Alias {
    variable: String,
    source: String,
    positive: bool,
}

/// The result of [BooleanModel::reduce]: the surviving equations in
/// minimized `Dnf` form together with the reduction metadata (variables
/// proven constant and the final alias table).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReducedModel {
    equations: Vec<(String, Dnf)>,
    constant_true: Vec<String>,
    constant_false: Vec<String>,
    aliases: Vec<Alias>,
}
