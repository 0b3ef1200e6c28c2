use crate::Expression::{Binary, Not, Var};
use crate::{BooleanModel, Expression, InteractionGraph, Sign};
use fxhash::FxHashSet;
use std::collections::{HashMap, VecDeque};
use std::fmt::{Display, Error, Formatter};

impl Sign {
    pub fn is_positive(&self) -> bool {
        *self == Sign::Positive
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Sign::Positive => write!(f, "+"),
            Sign::Negative => write!(f, "-"),
        }
    }
}

impl From<&BooleanModel> for InteractionGraph {
    /// Extract the signed dependency graph of a model.
    ///
    /// An edge `x -> y` with a sign exists when `x` occurs positively
    /// (resp. negatively) in the negation normal form of the update function
    /// of `y`. A variable occurring with both polarities produces two edges.
    fn from(model: &BooleanModel) -> InteractionGraph {
        let mut successors: HashMap<String, Vec<(String, Sign)>> = HashMap::new();
        for equation in model.equations() {
            successors.entry(equation.variable().to_string()).or_default();
            let normalized = equation.function().to_negation_normal_form();
            let mut regulators = Vec::new();
            collect_regulators(&normalized, &mut regulators);
            for (regulator, sign) in regulators {
                let list = successors.entry(regulator).or_default();
                let edge = (equation.variable().to_string(), sign);
                if !list.contains(&edge) {
                    list.push(edge);
                }
            }
        }
        // Deterministic edge order: by target name, positive edges first.
        for list in successors.values_mut() {
            list.sort_by(|(a, a_sign), (b, b_sign)| {
                a.cmp(b).then_with(|| a_sign.is_positive().cmp(&b_sign.is_positive()).reverse())
            });
        }
        InteractionGraph { successors }
    }
}

/// **(internal)** Collect the signed variable occurrences of a
/// negation-normal-form expression.
fn collect_regulators(expression: &Expression, output: &mut Vec<(String, Sign)>) {
    match expression {
        Var(name) => output.push((name.clone(), Sign::Positive)),
        Not(inner) => {
            if let Var(name) = inner.as_ref() {
                output.push((name.clone(), Sign::Negative));
            } else {
                unreachable!("Negation of a non-variable after normalization.");
            }
        }
        Binary(_, left, right) => {
            collect_regulators(left, output);
            collect_regulators(right, output);
        }
    }
}

/// Basic graph queries.
impl InteractionGraph {
    /// All variables of the graph, sorted by name.
    pub fn variables(&self) -> Vec<&str> {
        let mut variables: Vec<&str> = self.successors.keys().map(|it| it.as_str()).collect();
        variables.sort_unstable();
        variables
    }

    /// The signed outgoing edges of the given variable.
    pub fn successors(&self, variable: &str) -> &[(String, Sign)] {
        self.successors
            .get(variable)
            .map(|it| it.as_slice())
            .unwrap_or(&[])
    }

    /// The number of variables regulated by the given variable.
    pub fn out_degree(&self, variable: &str) -> usize {
        let mut targets = FxHashSet::default();
        for (target, _) in self.successors(variable) {
            targets.insert(target.as_str());
        }
        targets.len()
    }

    /// The number of variables regulating the given variable.
    pub fn in_degree(&self, variable: &str) -> usize {
        let mut regulators = FxHashSet::default();
        for (regulator, edges) in &self.successors {
            if edges.iter().any(|(target, _)| target == variable) {
                regulators.insert(regulator.as_str());
            }
        }
        regulators.len()
    }
}

/// Feedback loops and functional circuits.
impl InteractionGraph {
    /// Enumerate the elementary cycles of the graph.
    ///
    /// Every cycle is reported exactly once, as the list of its variables in
    /// edge order starting from its lexicographically smallest variable.
    /// Cycles are discovered in depth-first order from each start variable.
    pub fn feedback_loops(&self) -> Vec<Vec<String>> {
        self.circuits()
            .into_iter()
            .map(|(cycle, _)| cycle)
            .collect()
    }

    /// Enumerate the elementary cycles together with their overall sign:
    /// a circuit with an odd number of negative edges is negative.
    ///
    /// A cycle passing through a dual-signed dependency is reported once
    /// per sign combination.
    pub fn functional_circuits(&self) -> Vec<(Vec<String>, Sign)> {
        self.circuits()
    }

    fn circuits(&self) -> Vec<(Vec<String>, Sign)> {
        let mut result = Vec::new();
        for start in self.variables() {
            let mut path = vec![start.to_string()];
            let mut on_path = FxHashSet::default();
            on_path.insert(start.to_string());
            self.r_circuits(start, start, 0, &mut path, &mut on_path, &mut result);
        }
        result
    }

    /// **(internal)** Depth-first cycle search restricted to variables
    /// lexicographically greater than `start`, so each cycle is rooted at
    /// its smallest variable only.
    fn r_circuits(
        &self,
        start: &str,
        current: &str,
        negative_edges: usize,
        path: &mut Vec<String>,
        on_path: &mut FxHashSet<String>,
        output: &mut Vec<(Vec<String>, Sign)>,
    ) {
        for (next, sign) in self.successors(current) {
            let negative_edges = if sign.is_positive() {
                negative_edges
            } else {
                negative_edges + 1
            };
            if next == start {
                let sign = if negative_edges % 2 == 0 {
                    Sign::Positive
                } else {
                    Sign::Negative
                };
                output.push((path.clone(), sign));
            } else if next.as_str() > start && !on_path.contains(next) {
                path.push(next.clone());
                on_path.insert(next.clone());
                self.r_circuits(start, next, negative_edges, path, on_path, output);
                on_path.remove(next);
                path.pop();
            }
        }
    }
}

/// Distance metrics.
impl InteractionGraph {
    /// Shortest-path distances between all pairs of distinct variables
    /// (breadth-first search from every variable, unsigned edges). Pairs
    /// with no directed path are absent from the result.
    pub fn distances(&self) -> HashMap<String, HashMap<String, usize>> {
        let mut result = HashMap::new();
        for variable in self.successors.keys() {
            result.insert(variable.clone(), self.distances_from(variable));
        }
        result
    }

    fn distances_from(&self, variable: &str) -> HashMap<String, usize> {
        let mut distance = HashMap::new();
        let mut visited = FxHashSet::default();
        visited.insert(variable.to_string());
        let mut queue = VecDeque::new();
        queue.push_back((variable.to_string(), 0usize));
        while let Some((current, d)) = queue.pop_front() {
            for (next, _) in self.successors(&current) {
                if visited.insert(next.clone()) {
                    distance.insert(next.clone(), d + 1);
                    queue.push_back((next.clone(), d + 1));
                }
            }
        }
        distance
    }

    /// True when a directed path from `from` to `to` exists.
    pub fn connectivity(&self, from: &str, to: &str) -> bool {
        self.distances_from(from).contains_key(to)
    }

    /// The average shortest-path distance over all connected pairs, or
    /// `None` when the graph has no edges at all.
    pub fn average_distance(&self) -> Option<f64> {
        let mut total = 0usize;
        let mut pairs = 0usize;
        for variable in self.successors.keys() {
            for d in self.distances_from(variable).values() {
                total += d;
                pairs += 1;
            }
        }
        if pairs == 0 {
            None
        } else {
            Some((total as f64) / (pairs as f64))
        }
    }

    /// The longest shortest-path distance between any connected pair.
    pub fn diameter(&self) -> usize {
        let mut diameter = 0;
        for variable in self.successors.keys() {
            for d in self.distances_from(variable).values() {
                diameter = diameter.max(*d);
            }
        }
        diameter
    }
}
