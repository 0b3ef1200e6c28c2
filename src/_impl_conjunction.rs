use crate::Conjunction;
use std::collections::HashMap;
use std::fmt::{Display, Error, Formatter};

/// **(internal)** Check whether two sorted slices share a common element
/// using a linear merge scan.
pub(crate) fn shares_term(a: &[String], b: &[String]) -> bool {
    let (mut ai, mut bi) = (0, 0);
    while ai < a.len() && bi < b.len() {
        match a[ai].cmp(&b[bi]) {
            std::cmp::Ordering::Less => ai += 1,
            std::cmp::Ordering::Greater => bi += 1,
            std::cmp::Ordering::Equal => return true,
        }
    }
    false
}

/// **(internal)** Check whether sorted slice `a` is a subset of sorted
/// slice `b`.
pub(crate) fn is_subset(a: &[String], b: &[String]) -> bool {
    let (mut ai, mut bi) = (0, 0);
    while ai < a.len() && bi < b.len() {
        match a[ai].cmp(&b[bi]) {
            std::cmp::Ordering::Less => return false,
            std::cmp::Ordering::Greater => bi += 1,
            std::cmp::Ordering::Equal => {
                ai += 1;
                bi += 1;
            }
        }
    }
    ai == a.len()
}

/// **(internal)** Compute the sorted union of two sorted slices.
pub(crate) fn sorted_union(a: &[String], b: &[String]) -> Vec<String> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let (mut ai, mut bi) = (0, 0);
    while ai < a.len() && bi < b.len() {
        match a[ai].cmp(&b[bi]) {
            std::cmp::Ordering::Less => {
                result.push(a[ai].clone());
                ai += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(b[bi].clone());
                bi += 1;
            }
            std::cmp::Ordering::Equal => {
                result.push(a[ai].clone());
                ai += 1;
                bi += 1;
            }
        }
    }
    result.extend(a[ai..].iter().cloned());
    result.extend(b[bi..].iter().cloned());
    result
}

/// **(internal)** Remove the shared elements of two sorted vectors and
/// return them as a new sorted vector.
pub(crate) fn remove_intersection(a: &mut Vec<String>, b: &mut Vec<String>) -> Vec<String> {
    let mut result = Vec::new();
    let (mut ai, mut bi) = (0, 0);
    while ai < a.len() && bi < b.len() {
        match a[ai].cmp(&b[bi]) {
            std::cmp::Ordering::Less => ai += 1,
            std::cmp::Ordering::Greater => bi += 1,
            std::cmp::Ordering::Equal => {
                result.push(a.remove(ai));
                b.remove(bi);
            }
        }
    }
    result
}

/// Constructors.
impl Conjunction {
    /// Build a conjunction from (not necessarily sorted or deduplicated)
    /// lists of positive and negative variable names.
    ///
    /// Returns `None` when the same variable is required both positively and
    /// negatively, since such a conjunction is constant false and has no
    /// valid representation.
    pub fn new(mut positives: Vec<String>, mut negatives: Vec<String>) -> Option<Conjunction> {
        positives.sort();
        positives.dedup();
        negatives.sort();
        negatives.dedup();
        if shares_term(&positives, &negatives) {
            None
        } else {
            Some(Conjunction {
                positives,
                negatives,
            })
        }
    }

    /// A conjunction requiring a single variable to be true.
    pub fn mk_positive<T: Into<String>>(name: T) -> Conjunction {
        Conjunction {
            positives: vec![name.into()],
            negatives: Vec::new(),
        }
    }

    /// A conjunction requiring a single variable to be false.
    pub fn mk_negative<T: Into<String>>(name: T) -> Conjunction {
        Conjunction {
            positives: Vec::new(),
            negatives: vec![name.into()],
        }
    }

    /// The empty conjunction, i.e. the neutral term which is always
    /// satisfied.
    pub fn mk_unit() -> Conjunction {
        Conjunction {
            positives: Vec::new(),
            negatives: Vec::new(),
        }
    }
}

/// Queries and set operations.
impl Conjunction {
    /// Sorted names of the positively required variables.
    pub fn positives(&self) -> &[String] {
        &self.positives
    }

    /// Sorted names of the negatively required variables.
    pub fn negatives(&self) -> &[String] {
        &self.negatives
    }

    /// The total number of literals in this conjunction.
    pub fn len(&self) -> usize {
        self.positives.len() + self.negatives.len()
    }

    /// True if this is the empty (always satisfied) conjunction.
    pub fn is_empty(&self) -> bool {
        self.positives.is_empty() && self.negatives.is_empty()
    }

    /// True if the given variable occurs positively.
    pub fn contains_positive(&self, name: &str) -> bool {
        self.positives.binary_search_by(|it| it.as_str().cmp(name)).is_ok()
    }

    /// True if the given variable occurs negatively.
    pub fn contains_negative(&self, name: &str) -> bool {
        self.negatives.binary_search_by(|it| it.as_str().cmp(name)).is_ok()
    }

    /// Polarity-respecting subset test: every literal of `self` also appears
    /// in `other` with the same polarity.
    ///
    /// In a disjunction, `other` is then redundant: it is a more specific
    /// requirement than `self` (subsumption).
    pub fn is_subset_of(&self, other: &Conjunction) -> bool {
        is_subset(&self.positives, &other.positives) && is_subset(&self.negatives, &other.negatives)
    }

    /// The sorted union of all variable names touched by this conjunction,
    /// regardless of polarity. Used as the bucket key of the consensus index.
    pub fn variable_union(&self) -> Vec<String> {
        sorted_union(&self.positives, &self.negatives)
    }

    /// Attempt to merge this conjunction with `other` using the resolution
    /// law `(x & p) | (x & !p) == x`.
    ///
    /// The merge succeeds when both conjunctions agree on all literals
    /// except a single pivot variable which occurs positively in one and
    /// negatively in the other. The result contains the shared literals with
    /// the pivot removed entirely.
    pub fn try_consensus(&self, other: &Conjunction) -> Option<Conjunction> {
        // Cheap length heuristic first: one side must have the extra
        // positive literal, the other the extra negative one.
        let (a, b) = if self.positives.len() == other.positives.len() + 1
            && self.negatives.len() + 1 == other.negatives.len()
        {
            (self, other)
        } else if other.positives.len() == self.positives.len() + 1
            && other.negatives.len() + 1 == self.negatives.len()
        {
            (other, self)
        } else {
            return None;
        };

        let mut a_positives = a.positives.clone();
        let mut a_negatives = a.negatives.clone();
        let mut b_positives = b.positives.clone();
        let mut b_negatives = b.negatives.clone();
        let shared_positives = remove_intersection(&mut a_positives, &mut b_positives);
        let shared_negatives = remove_intersection(&mut a_negatives, &mut b_negatives);

        // Confirm that the only difference is one variable switched from
        // positive to negative.
        let is_pivot = a_positives.len() == 1
            && a_negatives.is_empty()
            && b_negatives.len() == 1
            && b_positives.is_empty()
            && a_positives[0] == b_negatives[0];

        if is_pivot {
            Some(Conjunction {
                positives: shared_positives,
                negatives: shared_negatives,
            })
        } else {
            None
        }
    }

    /// Evaluate this conjunction using the given variable valuation, or
    /// return `None` when an unassigned variable makes the result ambiguous.
    pub fn evaluate(&self, values: &HashMap<String, bool>) -> Option<bool> {
        let mut unknown = false;
        for name in &self.positives {
            match values.get(name) {
                Some(false) => return Some(false),
                Some(true) => (),
                None => unknown = true,
            }
        }
        for name in &self.negatives {
            match values.get(name) {
                Some(true) => return Some(false),
                Some(false) => (),
                None => unknown = true,
            }
        }
        if unknown {
            None
        } else {
            Some(true)
        }
    }
}

impl Display for Conjunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.is_empty() {
            return write!(f, "true");
        }
        let mut first = true;
        for name in &self.positives {
            if !first {
                write!(f, " & ")?;
            }
            write!(f, "{}", name)?;
            first = false;
        }
        for name in &self.negatives {
            if !first {
                write!(f, " & ")?;
            }
            write!(f, "!{}", name)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{is_subset, remove_intersection, shares_term, sorted_union};
    use crate::Conjunction;
    use std::collections::HashMap;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|it| it.to_string()).collect()
    }

    #[test]
    fn sorted_set_algebra_test() {
        let a = names(&["a", "c", "d"]);
        let b = names(&["b", "c"]);
        assert!(shares_term(&a, &b));
        assert!(!shares_term(&names(&["a", "d"]), &b));

        assert!(is_subset(&names(&["c"]), &a));
        assert!(is_subset(&names(&[]), &a));
        assert!(!is_subset(&a, &names(&["c"])));

        assert_eq!(names(&["a", "b", "c", "d"]), sorted_union(&a, &b));

        let mut x = names(&["a", "c", "d"]);
        let mut y = names(&["b", "c", "d"]);
        let shared = remove_intersection(&mut x, &mut y);
        assert_eq!(names(&["c", "d"]), shared);
        assert_eq!(names(&["a"]), x);
        assert_eq!(names(&["b"]), y);
    }

    #[test]
    fn conjunction_construction_test() {
        let c = Conjunction::new(names(&["b", "a", "b"]), names(&["c"])).unwrap();
        assert_eq!(names(&["a", "b"]), c.positives());
        assert_eq!(names(&["c"]), c.negatives());
        assert_eq!(3, c.len());
        assert!(c.contains_positive("a"));
        assert!(!c.contains_positive("c"));
        assert!(c.contains_negative("c"));
        assert_eq!("a & b & !c", c.to_string());

        // `a & !a` is constant false and cannot be represented.
        assert_eq!(None, Conjunction::new(names(&["a"]), names(&["a"])));

        assert_eq!("true", Conjunction::mk_unit().to_string());
        assert_eq!("x", Conjunction::mk_positive("x").to_string());
        assert_eq!("!x", Conjunction::mk_negative("x").to_string());
    }

    #[test]
    fn subsumption_test() {
        let general = Conjunction::new(names(&["a"]), Vec::new()).unwrap();
        let specific = Conjunction::new(names(&["a", "b"]), names(&["c"])).unwrap();
        let flipped = Conjunction::new(Vec::new(), names(&["a"])).unwrap();
        assert!(general.is_subset_of(&specific));
        assert!(!specific.is_subset_of(&general));
        // Subsumption must respect polarity.
        assert!(!flipped.is_subset_of(&specific));
        // Every conjunction subsumes itself.
        assert!(general.is_subset_of(&general));
    }

    #[test]
    fn consensus_test() {
        let left = Conjunction::new(names(&["a", "b"]), Vec::new()).unwrap();
        let right = Conjunction::new(names(&["a"]), names(&["b"])).unwrap();
        let merged = left.try_consensus(&right).unwrap();
        assert_eq!("a", merged.to_string());
        // The merge is symmetric.
        assert_eq!(merged, right.try_consensus(&left).unwrap());

        // Two differences block the merge.
        let far = Conjunction::new(Vec::new(), names(&["a", "b"])).unwrap();
        assert_eq!(None, left.try_consensus(&far));
        // Same polarity everywhere blocks the merge as well.
        assert_eq!(None, left.try_consensus(&left));

        // Single-literal terms merge into the unit conjunction.
        let p = Conjunction::mk_positive("x");
        let n = Conjunction::mk_negative("x");
        assert_eq!(Conjunction::mk_unit(), p.try_consensus(&n).unwrap());
    }

    #[test]
    fn conjunction_eval_test() {
        let c = Conjunction::new(names(&["a"]), names(&["b"])).unwrap();
        let mut values = HashMap::new();
        assert_eq!(None, c.evaluate(&values));
        values.insert("b".to_string(), true);
        assert_eq!(Some(false), c.evaluate(&values));
        values.insert("b".to_string(), false);
        assert_eq!(None, c.evaluate(&values));
        values.insert("a".to_string(), true);
        assert_eq!(Some(true), c.evaluate(&values));
    }
}
