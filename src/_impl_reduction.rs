use crate::Evaluation::{ConstantFalse, ConstantTrue, Updated};
use crate::{Alias, BooleanModel, Dnf, Evaluation, ReducedModel};
use fxhash::{FxHashMap, FxHashSet};
use std::fmt::{Display, Error, Formatter};

impl BooleanModel {
    /// Reduce this model by propagating constant update functions and
    /// collapsing mediator variables.
    ///
    /// **Algorithm 1 (constant propagation).** Every update function is
    /// first canonicalized into a minimized `Dnf` and its baked-in `true`
    /// and `false` literals are folded away. Equations that collapse to a
    /// constant are removed and recorded; every equation depending on a
    /// newly-constant variable is then re-evaluated through a worklist, so
    /// the propagation is transitive (a variable can only be classified
    /// once, because classification removes it from the model).
    ///
    /// **Algorithm 2 (mediator collapsing).** A surviving equation whose
    /// function is a single literal makes its variable an alias of the
    /// literal's variable. Alias chains (`a = b`, `b = !c`, ...) are
    /// followed to their ultimate source with polarities composed along the
    /// way; the intermediate mediators are removed and the chain head keeps
    /// a single-literal function over the resolved source. Cyclic alias
    /// chains cannot be collapsed past their entry point and are left
    /// pointing to the last variable of the cycle.
    ///
    /// Variables without an equation are free inputs: they are never
    /// classified as constant and never collapsed.
    pub fn reduce(&self) -> ReducedModel {
        let mut functions: FxHashMap<String, Dnf> = FxHashMap::default();
        let mut constant_true: Vec<String> = Vec::new();
        let mut constant_false: Vec<String> = Vec::new();
        // Worklist of classified variables whose dependents must be
        // re-evaluated; processed in FIFO order.
        let mut worklist: Vec<(String, bool)> = Vec::new();

        // Canonicalize every update function, fold the constant sentinels.
        for equation in &self.equations {
            let variable = equation.variable.clone();
            match fold_constants(Dnf::from_expression(&equation.function)) {
                ConstantTrue => {
                    constant_true.push(variable.clone());
                    worklist.push((variable, true));
                }
                ConstantFalse => {
                    constant_false.push(variable.clone());
                    worklist.push((variable, false));
                }
                Updated(dnf) => {
                    functions.insert(variable, dnf);
                }
            }
        }

        // Reverse dependency index of the remaining equations.
        let mut depends_on: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();
        for (variable, dnf) in &functions {
            for conjunction in dnf.conjunctions() {
                for name in conjunction.variable_union() {
                    depends_on.entry(name).or_default().insert(variable.clone());
                }
            }
        }

        // Cascade the classifications through the dependency index.
        let mut cursor = 0;
        while cursor < worklist.len() {
            let (variable, value) = worklist[cursor].clone();
            cursor += 1;
            let dependents = match depends_on.remove(&variable) {
                Some(dependents) => dependents,
                None => continue,
            };
            let mut dependents: Vec<String> = dependents.into_iter().collect();
            dependents.sort();
            for dependent in dependents {
                let dnf = match functions.get(&dependent) {
                    Some(dnf) => dnf,
                    // Already classified through another path.
                    None => continue,
                };
                match dnf.evaluate_at(&variable, value) {
                    ConstantTrue => {
                        functions.remove(&dependent);
                        assert_consistent(&dependent, &constant_true, &constant_false);
                        constant_true.push(dependent.clone());
                        worklist.push((dependent, true));
                    }
                    ConstantFalse => {
                        functions.remove(&dependent);
                        assert_consistent(&dependent, &constant_true, &constant_false);
                        constant_false.push(dependent.clone());
                        worklist.push((dependent, false));
                    }
                    Updated(updated) => {
                        functions.insert(dependent.clone(), updated);
                    }
                }
            }
        }

        // Mediator collapsing: every surviving single-literal equation is
        // an alias of its source.
        let mut aliases: FxHashMap<String, (String, bool)> = FxHashMap::default();
        for (variable, dnf) in &functions {
            if let Some((source, positive)) = dnf.as_literal() {
                aliases.insert(variable.clone(), (source.to_string(), positive));
            }
        }

        let mut alias_variables: Vec<String> = aliases.keys().cloned().collect();
        alias_variables.sort();
        for variable in alias_variables {
            if !aliases.contains_key(&variable) {
                // Consumed as a mediator of another chain.
                continue;
            }
            loop {
                let (source, positive) = aliases[&variable].clone();
                if source == variable {
                    // The chain folded into a self-loop; nothing to collapse.
                    break;
                }
                let (next, next_positive) = match aliases.get(&source) {
                    Some(binding) => binding.clone(),
                    None => break,
                };
                // Two hops of equal polarity compose to a positive
                // dependency, differing hops to a negative one.
                let composed = positive == next_positive;
                aliases.insert(variable.clone(), (next, composed));
                // The mediator itself is no longer needed.
                aliases.remove(&source);
                functions.remove(&source);
            }
            let (source, positive) = aliases[&variable].clone();
            functions.insert(variable.clone(), Dnf::mk_literal(source, positive));
        }

        // Assemble the result: equations keep their original model order,
        // metadata is sorted by variable name.
        let mut equations = Vec::new();
        for equation in &self.equations {
            if let Some(dnf) = functions.remove(&equation.variable) {
                equations.push((equation.variable.clone(), dnf));
            }
        }
        constant_true.sort();
        constant_false.sort();
        let mut aliases: Vec<Alias> = aliases
            .into_iter()
            .map(|(variable, (source, positive))| Alias {
                variable,
                source,
                positive,
            })
            .collect();
        aliases.sort_by(|a, b| a.variable.cmp(&b.variable));

        ReducedModel {
            equations,
            constant_true,
            constant_false,
            aliases,
        }
    }
}

/// **(internal)** Fold the reserved `true` and `false` sentinel literals of
/// a canonicalized function, detecting functions that are constant outright
/// (a tautology minimizes to the unit conjunction, a contradiction to the
/// empty disjunction).
fn fold_constants(dnf: Dnf) -> Evaluation {
    if dnf.is_true() {
        return ConstantTrue;
    }
    if dnf.is_false() {
        return ConstantFalse;
    }
    let dnf = match dnf.evaluate_at("true", true) {
        ConstantTrue => return ConstantTrue,
        ConstantFalse => return ConstantFalse,
        Updated(dnf) => dnf,
    };
    dnf.evaluate_at("false", false)
}

/// **(internal)** A variable must never be classified as both constant true
/// and constant false. This cannot happen as long as classification removes
/// the variable from the model, so a failure here is an internal invariant
/// violation, not a user error.
fn assert_consistent(variable: &str, constant_true: &[String], constant_false: &[String]) {
    assert!(
        !constant_true.iter().any(|it| it == variable)
            && !constant_false.iter().any(|it| it == variable),
        "Variable `{}` classified as constant twice.",
        variable
    );
}

/// Utility methods for `Alias`.
impl Alias {
    /// The aliased variable.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The variable whose value this alias copies.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the alias copies the source value, false when it copies
    /// the negation.
    pub fn is_positive(&self) -> bool {
        self.positive
    }
}

/// Utility methods for inspecting a `ReducedModel`.
impl ReducedModel {
    /// The surviving equations in their original model order.
    pub fn equations(&self) -> &[(String, Dnf)] {
        &self.equations
    }

    /// Find the reduced function of a surviving variable.
    pub fn find_function(&self, variable: &str) -> Option<&Dnf> {
        self.equations
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, dnf)| dnf)
    }

    /// Sorted names of the variables proven constant true.
    pub fn constant_true(&self) -> &[String] {
        &self.constant_true
    }

    /// Sorted names of the variables proven constant false.
    pub fn constant_false(&self) -> &[String] {
        &self.constant_false
    }

    /// If the given variable was proven constant, return its value.
    pub fn find_constant(&self, variable: &str) -> Option<bool> {
        if self.constant_true.iter().any(|it| it == variable) {
            Some(true)
        } else if self.constant_false.iter().any(|it| it == variable) {
            Some(false)
        } else {
            None
        }
    }

    /// The final alias table, sorted by variable name.
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// Find the alias binding of the given variable, if it has one.
    pub fn find_alias(&self, variable: &str) -> Option<&Alias> {
        self.aliases.iter().find(|it| it.variable == variable)
    }
}

impl Display for ReducedModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for (variable, dnf) in &self.equations {
            writeln!(f, "{} = {}", variable, dnf)?;
        }
        for variable in &self.constant_true {
            writeln!(f, "{} = true", variable)?;
        }
        for variable in &self.constant_false {
            writeln!(f, "{} = false", variable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{BooleanModel, Conjunction};
    use pretty_assertions::assert_eq;
    use std::convert::TryFrom;

    fn reduce(equations: &[&str]) -> crate::ReducedModel {
        BooleanModel::try_from_equations(equations).unwrap().reduce()
    }

    #[test]
    fn constant_cascade_test() {
        // `b` is constant true, which makes `a` constant true as well.
        let reduced = reduce(&["a = b", "b = true"]);
        assert!(reduced.equations().is_empty());
        assert_eq!(&["a".to_string(), "b".to_string()], reduced.constant_true());
        assert_eq!(Some(true), reduced.find_constant("a"));
        assert_eq!(None, reduced.find_constant("x"));
    }

    #[test]
    fn constant_polarity_test() {
        // `a` is false, so `b = a & x` is false, so `c = !b` is true.
        let reduced = reduce(&["a = false", "b = a & x", "c = !b"]);
        assert!(reduced.equations().is_empty());
        assert_eq!(&["c".to_string()], reduced.constant_true());
        assert_eq!(&["a".to_string(), "b".to_string()], reduced.constant_false());
    }

    #[test]
    fn constant_fold_inside_function_test() {
        // The sentinels are folded even when they are not the whole
        // function: `true & x` is just `x`, and the tautology `y | !y` is
        // constant outright.
        let reduced = reduce(&["a = true & x", "b = y | !y"]);
        assert_eq!(
            &[Conjunction::mk_positive("x")],
            reduced.find_function("a").unwrap().conjunctions()
        );
        assert_eq!(&["b".to_string()], reduced.constant_true());

        let reduced = reduce(&["a = z & !z", "b = a | q"]);
        assert_eq!(&["a".to_string()], reduced.constant_false());
        // `b` keeps waiting for the free input `q`.
        assert_eq!(
            &[Conjunction::mk_positive("q")],
            reduced.find_function("b").unwrap().conjunctions()
        );
    }

    #[test]
    fn partial_update_test() {
        // `a` is classified, `b` only shrinks: `x` remains a free input.
        let reduced = reduce(&["a = true", "b = a & x"]);
        assert_eq!(&["a".to_string()], reduced.constant_true());
        assert_eq!(
            Some(("x", true)),
            reduced.find_function("b").unwrap().as_literal()
        );
        // The shrunken `b` is a mediator of `x` now.
        let alias = reduced.find_alias("b").unwrap();
        assert_eq!("x", alias.source());
        assert!(alias.is_positive());
    }

    #[test]
    fn mediator_chain_test() {
        // e -> d -> c -> b -> a with one negation: e = !a in the end.
        let reduced = reduce(&[
            "a = x & y",
            "b = a",
            "c = b",
            "d = !c",
            "e = d",
        ]);
        // The intermediate mediators are gone.
        let variables: Vec<&str> = reduced
            .equations()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(vec!["a", "e"], variables);
        assert_eq!(
            Some(("a", false)),
            reduced.find_function("e").unwrap().as_literal()
        );
        let alias = reduced.find_alias("e").unwrap();
        assert_eq!("a", alias.source());
        assert!(!alias.is_positive());
        assert!(reduced.find_alias("b").is_none());
    }

    #[test]
    fn polarity_composition_test() {
        // Two negations compose into a positive dependency.
        let reduced = reduce(&["m = !n", "n = !p"]);
        assert_eq!(
            Some(("p", true)),
            reduced.find_function("m").unwrap().as_literal()
        );
        assert!(reduced.find_alias("m").unwrap().is_positive());
        assert!(reduced.find_alias("n").is_none());
    }

    #[test]
    fn alias_cycle_test() {
        // A cyclic alias chain cannot be collapsed away entirely; the
        // reduction must still terminate.
        let reduced = reduce(&["a = b", "b = a"]);
        assert_eq!(1, reduced.equations().len());
        assert!(reduced.constant_true().is_empty());
        assert!(reduced.constant_false().is_empty());
    }

    #[test]
    fn free_inputs_test() {
        // Undefined variables are never classified or collapsed.
        let reduced = reduce(&["x = y & z"]);
        assert_eq!(1, reduced.equations().len());
        assert!(reduced.constant_true().is_empty());
        assert!(reduced.aliases().is_empty());
    }

    #[test]
    fn reduction_is_monotone_test() {
        // Without mediator chains, every variable is either classified
        // constant or keeps exactly one (possibly shrunken) equation.
        let model = BooleanModel::try_from(
            r"
            a = true
            b = a & (c | d)
            c = !b & d
            e = c & f
        ",
        )
        .unwrap();
        let reduced = model.reduce();
        let classified = reduced.constant_true().len()
            + reduced.constant_false().len()
            + reduced.equations().len();
        assert_eq!(model.num_vars(), classified);
        assert!(reduced.equations().len() <= model.num_vars());
    }

    #[test]
    fn display_test() {
        let reduced = reduce(&["a = true", "b = a & x", "c = false"]);
        let printed = reduced.to_string();
        assert!(printed.contains("a = true"));
        assert!(printed.contains("b = x"));
        assert!(printed.contains("c = false"));
    }
}
