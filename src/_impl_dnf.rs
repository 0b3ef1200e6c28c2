use crate::BinaryOp::{And, Or};
use crate::Expression::{Binary, Not, Var};
use crate::{Conjunction, Dnf, Evaluation, Expression};
use fxhash::FxHashMap;
use std::collections::HashMap;
use std::fmt::{Display, Error, Formatter};

/// Constructors and basic queries.
impl Dnf {
    /// The constant `false` function: a disjunction of no conjunctions.
    pub fn mk_false() -> Dnf {
        Dnf {
            conjunctions: Vec::new(),
        }
    }

    /// The constant `true` function: a disjunction containing the unit
    /// conjunction.
    pub fn mk_true() -> Dnf {
        Dnf {
            conjunctions: vec![Conjunction::mk_unit()],
        }
    }

    /// A function consisting of a single literal.
    pub fn mk_literal<T: Into<String>>(name: T, positive: bool) -> Dnf {
        let conjunction = if positive {
            Conjunction::mk_positive(name)
        } else {
            Conjunction::mk_negative(name)
        };
        Dnf {
            conjunctions: vec![conjunction],
        }
    }

    /// Build a (minimized) `Dnf` from an explicit list of conjunctions.
    pub fn new(conjunctions: Vec<Conjunction>) -> Dnf {
        Dnf { conjunctions }.minimized()
    }

    /// True if this is the explicit constant `false` function.
    pub fn is_false(&self) -> bool {
        self.conjunctions.is_empty()
    }

    /// True if some conjunction is empty, i.e. the function is constant
    /// `true`.
    pub fn is_true(&self) -> bool {
        self.conjunctions.iter().any(|it| it.is_empty())
    }

    /// The conjunctions of this function, in deterministic order.
    pub fn conjunctions(&self) -> &[Conjunction] {
        &self.conjunctions
    }

    /// If this function is a single literal, return its variable name and
    /// polarity.
    pub fn as_literal(&self) -> Option<(&str, bool)> {
        if self.conjunctions.len() != 1 {
            return None;
        }
        let conjunction = &self.conjunctions[0];
        if conjunction.len() != 1 {
            return None;
        }
        if let Some(name) = conjunction.positives().first() {
            Some((name, true))
        } else {
            conjunction.negatives().first().map(|name| (name.as_str(), false))
        }
    }
}

/// Extraction from expressions and minimization.
impl Dnf {
    /// Convert an arbitrary expression into a minimized `Dnf`.
    ///
    /// The expression is first transformed to negation normal form, then
    /// conjunctions are distributed over disjunctions, and finally each
    /// disjunct is collected into one [Conjunction]. Disjuncts requiring a
    /// variable both positively and negatively are constant false and are
    /// dropped; when every disjunct is dropped this way, the result is the
    /// explicit constant-false function.
    pub fn from_expression(expression: &Expression) -> Dnf {
        let normalized = expression
            .to_negation_normal_form()
            .distribute_conjunctions();
        let mut conjunctions = Vec::new();
        collect_disjuncts(&normalized, &mut conjunctions);
        Dnf { conjunctions }.minimized()
    }

    /// Minimize this function by subsumption elimination followed by a
    /// single consensus pass.
    ///
    /// First, every conjunction that is a polarity-respecting superset of
    /// another is discarded (it is implied by the more general term; equal
    /// conjunctions discard the later one). Second, the surviving
    /// conjunctions are inserted into a multimap keyed by their
    /// polarity-blind variable union; an insertion which finds a partner
    /// differing in exactly one literal's polarity replaces both with their
    /// resolution (pivot removed), re-inserted recursively. A resolvent can
    /// subsume a conjunction the first pass already accepted, so the
    /// subsumption scan runs once more on the merged result; this makes
    /// `minimized` idempotent (two consensus partners always share a bucket
    /// key, so the merged result admits no further resolution).
    ///
    /// The consensus pass runs once per inserted conjunction rather than to
    /// a global fixpoint, so the result is canonical-ish but not guaranteed
    /// to be globally minimal.
    pub fn minimized(mut self) -> Dnf {
        // Pass 1: pairwise subsumption scan.
        subsumption_sweep(&mut self.conjunctions);

        // Pass 2: consensus merging through the keyed bucket index.
        let mut index: FxHashMap<Vec<String>, Vec<Conjunction>> = FxHashMap::default();
        let mut key_order: Vec<Vec<String>> = Vec::new();
        for conjunction in self.conjunctions.drain(..) {
            insert_with_consensus(&mut index, &mut key_order, conjunction);
        }

        // Flatten the index back into a list, in key insertion order.
        let mut result = Vec::new();
        for key in key_order {
            if let Some(bucket) = index.remove(&key) {
                result.extend(bucket);
            }
        }

        // Pass 3: resolvents can subsume previously accepted conjunctions.
        subsumption_sweep(&mut result);
        Dnf {
            conjunctions: result,
        }
    }

    /// Produce the deterministic string encoding of this function.
    ///
    /// Two functions with equal encodings are semantically equivalent. The
    /// converse does not hold: the bounded consensus pass can leave two
    /// equivalent functions in different normal forms.
    pub fn encode(&self) -> String {
        let mut parts: Vec<String> = self
            .conjunctions
            .iter()
            .map(|it| format!("{}~{}", it.positives.join("%"), it.negatives.join("%")))
            .collect();
        parts.sort();
        parts.join("|")
    }
}

/// Evaluation.
impl Dnf {
    /// Propagate a fixed value of one variable through this function.
    ///
    /// A satisfied literal is removed from its conjunction; if it was the
    /// only literal, the whole function is `ConstantTrue` (one satisfied
    /// disjunct satisfies the disjunction). A falsified literal removes its
    /// whole conjunction; if no conjunction remains, the function is
    /// `ConstantFalse`. Otherwise the result is the updated function (which
    /// is unchanged when the variable is not mentioned at all).
    pub fn evaluate_at(&self, variable: &str, value: bool) -> Evaluation {
        let mut updated = Vec::with_capacity(self.conjunctions.len());
        for conjunction in &self.conjunctions {
            let positive = conjunction.contains_positive(variable);
            let negative = conjunction.contains_negative(variable);
            let satisfied = (positive && value) || (negative && !value);
            let falsified = (positive && !value) || (negative && value);
            if falsified {
                // The conjunction can never be satisfied; drop it.
                continue;
            }
            if satisfied {
                if conjunction.len() == 1 {
                    return Evaluation::ConstantTrue;
                }
                let mut remaining = conjunction.clone();
                let literals = if positive {
                    &mut remaining.positives
                } else {
                    &mut remaining.negatives
                };
                let index = literals
                    .binary_search_by(|it| it.as_str().cmp(variable))
                    .unwrap();
                literals.remove(index);
                updated.push(remaining);
            } else {
                updated.push(conjunction.clone());
            }
        }
        if updated.is_empty() {
            Evaluation::ConstantFalse
        } else {
            Evaluation::Updated(Dnf {
                conjunctions: updated,
            })
        }
    }

    /// If possible, evaluate this function using the given variable
    /// valuation (see [Conjunction::evaluate]).
    pub fn evaluate(&self, values: &HashMap<String, bool>) -> Option<bool> {
        let mut unknown = false;
        for conjunction in &self.conjunctions {
            match conjunction.evaluate(values) {
                Some(true) => return Some(true),
                Some(false) => (),
                None => unknown = true,
            }
        }
        if unknown {
            None
        } else {
            Some(false)
        }
    }
}

/// Canonical-encoding utilities for whole expressions.
impl Expression {
    /// The canonical string encoding of this expression (the encoding of
    /// its minimized `Dnf`).
    pub fn canonical_encoding(&self) -> String {
        Dnf::from_expression(self).encode()
    }

    /// Syntactic equivalence check through canonical encodings.
    ///
    /// `true` guarantees the two expressions compute the same function;
    /// `false` means the minimization could not identify them, which does
    /// not prove them different (full semantic comparison needs a solver).
    pub fn is_syntactically_equivalent(&self, other: &Expression) -> bool {
        self.canonical_encoding() == other.canonical_encoding()
    }
}

/// **(internal)** Discard every conjunction that is a polarity-respecting
/// superset of another (O(n^2) pairwise scan; equal conjunctions discard the
/// later index).
fn subsumption_sweep(list: &mut Vec<Conjunction>) {
    let mut i = 0;
    while i < list.len() {
        let mut discarded_i = false;
        let mut j = i + 1;
        while j < list.len() {
            if list[i].is_subset_of(&list[j]) {
                list.remove(j);
            } else if list[j].is_subset_of(&list[i]) {
                list.remove(i);
                discarded_i = true;
                break;
            } else {
                j += 1;
            }
        }
        if !discarded_i {
            i += 1;
        }
    }
}

/// **(internal)** Walk the disjunction tree of a distributed NNF expression
/// and collect one conjunction per disjunct.
fn collect_disjuncts(expression: &Expression, output: &mut Vec<Conjunction>) {
    match expression {
        Binary(Or, left, right) => {
            collect_disjuncts(left, output);
            collect_disjuncts(right, output);
        }
        _ => {
            let mut positives = Vec::new();
            let mut negatives = Vec::new();
            collect_literals(expression, &mut positives, &mut negatives);
            // A contradictory disjunct is constant false; since
            // `false | x == x`, it is simply not emitted.
            if let Some(conjunction) = Conjunction::new(positives, negatives) {
                output.push(conjunction);
            }
        }
    }
}

/// **(internal)** Collect the literals of one conjunction subtree.
fn collect_literals(expression: &Expression, positives: &mut Vec<String>, negatives: &mut Vec<String>) {
    match expression {
        Var(name) => positives.push(name.clone()),
        Not(inner) => {
            if let Var(name) = inner.as_ref() {
                negatives.push(name.clone());
            } else {
                unreachable!("Negation of a non-variable after normalization.");
            }
        }
        Binary(And, left, right) => {
            collect_literals(left, positives, negatives);
            collect_literals(right, positives, negatives);
        }
        Binary(Or, _, _) => {
            unreachable!("Disjunction under a conjunction after distribution.");
        }
    }
}

/// **(internal)** Insert a conjunction into the consensus index, merging it
/// with a matching partner from its bucket if one exists. A merge removes
/// the partner and recursively re-inserts the (strictly smaller) resolvent,
/// which can cascade into further merges.
fn insert_with_consensus(
    index: &mut FxHashMap<Vec<String>, Vec<Conjunction>>,
    key_order: &mut Vec<Vec<String>>,
    conjunction: Conjunction,
) {
    let key = conjunction.variable_union();
    let mut merged = None;
    if let Some(bucket) = index.get_mut(&key) {
        for i in 0..bucket.len() {
            if let Some(resolvent) = conjunction.try_consensus(&bucket[i]) {
                bucket.remove(i);
                merged = Some(resolvent);
                break;
            }
        }
    }
    if let Some(resolvent) = merged {
        insert_with_consensus(index, key_order, resolvent);
    } else {
        key_order.push(key.clone());
        index.entry(key).or_insert_with(Vec::new).push(conjunction);
    }
}

impl Display for Dnf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.is_false() {
            return write!(f, "false");
        }
        for (i, conjunction) in self.conjunctions.iter().enumerate() {
            if i != 0 {
                write!(f, " | ")?;
            }
            if conjunction.len() > 1 {
                write!(f, "({})", conjunction)?;
            } else {
                write!(f, "{}", conjunction)?;
            }
        }
        Ok(())
    }
}
