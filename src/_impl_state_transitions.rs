use crate::BooleanModel;
use std::collections::HashMap;

/// Synchronous semantics: every variable is updated at once, using the
/// current state as input.
impl BooleanModel {
    /// Compute the synchronous successor of the given state.
    ///
    /// The reserved identifiers `true` and `false` are always assigned
    /// their constant values, so formulas mentioning them evaluate as
    /// expected. Returns `Err` when some update function references a
    /// variable the state does not assign.
    pub fn evaluate_transition(
        &self,
        state: &HashMap<String, bool>,
    ) -> Result<HashMap<String, bool>, String> {
        let mut values = state.clone();
        values.insert("true".to_string(), true);
        values.insert("false".to_string(), false);
        let mut next = HashMap::new();
        for equation in self.equations() {
            match equation.function().evaluate(&values) {
                Some(value) => {
                    next.insert(equation.variable().to_string(), value);
                }
                None => {
                    return Err(format!(
                        "Cannot evaluate `{}`: state does not assign every input.",
                        equation
                    ));
                }
            }
        }
        Ok(next)
    }

    /// Enumerate the full synchronous state transition table.
    ///
    /// Each row maps one assignment of the model variables (in equation
    /// declaration order) to its successor assignment. The table has `2^n`
    /// rows for `n` variables; row `i` assigns variable `k` the value of
    /// bit `k` of `i`. Returns `Err` when the model references a free
    /// input, since such a model has no self-contained state space.
    pub fn state_transition_table(&self) -> Result<Vec<(Vec<bool>, Vec<bool>)>, String> {
        let variables: Vec<String> = self.variables().map(|it| it.to_string()).collect();
        let mut table = Vec::with_capacity(1 << variables.len());
        for assignment in 0usize..(1 << variables.len()) {
            let mut state = HashMap::new();
            for (i, variable) in variables.iter().enumerate() {
                state.insert(variable.clone(), (assignment >> i) & 1 == 1);
            }
            let next = self.evaluate_transition(&state)?;
            let row_in: Vec<bool> = variables.iter().map(|it| state[it]).collect();
            // Every variable has an equation, so the successor assigns
            // exactly the model variables.
            let row_out: Vec<bool> = variables.iter().map(|it| next[it]).collect();
            table.push((row_in, row_out));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use crate::BooleanModel;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn state(assignments: &[(&str, bool)]) -> HashMap<String, bool> {
        assignments
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn evaluate_transition_test() {
        let model = BooleanModel::try_from_equations(&["a = !b", "b = a & c"]).unwrap();
        let next = model
            .evaluate_transition(&state(&[("a", true), ("b", false), ("c", true)]))
            .unwrap();
        assert_eq!(state(&[("a", true), ("b", true)]), next);

        // `c` is a free input; without a value the transition fails.
        assert!(model
            .evaluate_transition(&state(&[("a", true), ("b", false)]))
            .is_err());
    }

    #[test]
    fn reserved_constants_test() {
        let model = BooleanModel::try_from_equations(&["a = true", "b = a & !false"]).unwrap();
        let next = model
            .evaluate_transition(&state(&[("a", false), ("b", false)]))
            .unwrap();
        assert_eq!(state(&[("a", true), ("b", false)]), next);
    }

    #[test]
    fn transition_table_test() {
        // A negative feedback loop cycles through all four states.
        let model = BooleanModel::try_from_equations(&["a = !b", "b = a"]).unwrap();
        let table = model.state_transition_table().unwrap();
        assert_eq!(4, table.len());
        let expected = vec![
            (vec![false, false], vec![true, false]),
            (vec![true, false], vec![true, true]),
            (vec![false, true], vec![false, false]),
            (vec![true, true], vec![false, true]),
        ];
        assert_eq!(expected, table);
    }

    #[test]
    fn transition_table_free_input_test() {
        let model = BooleanModel::try_from_equations(&["a = x"]).unwrap();
        assert!(model.state_transition_table().is_err());
    }
}
