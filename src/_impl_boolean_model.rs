use crate::{BooleanModel, Equation, Expression, ID_REGEX};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt::{Display, Error, Formatter};

lazy_static! {
    /// Regex that matches one update equation line, `name = formula`.
    static ref EQUATION_REGEX: Regex =
        Regex::new(r"^\s*(?P<name>[a-zA-Z0-9_]+)\s*=\s*(?P<function>.+)$").unwrap();
}

/// Basic utility methods for `Equation`.
impl Equation {
    /// Create a new equation `variable = function`.
    ///
    /// Returns `Err` when the variable is not a valid identifier.
    pub fn new<T: Into<String>>(variable: T, function: Expression) -> Result<Equation, String> {
        let variable = variable.into();
        if !ID_REGEX.is_match(&variable) {
            return Err(format!("Invalid variable name `{}`.", variable));
        }
        Ok(Equation { variable, function })
    }

    /// The left-hand-side variable updated by this equation.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The right-hand-side update expression.
    pub fn function(&self) -> &Expression {
        &self.function
    }
}

impl TryFrom<&str> for Equation {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let captures = EQUATION_REGEX
            .captures(value)
            .ok_or(format!("Expected `name = formula`, found `{}`.", value))?;
        let function = Expression::try_from(&captures["function"])?;
        Equation::new(captures["name"].to_string(), function)
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{} = {}", self.variable, self.function)
    }
}

/// Methods for safely constructing new instances of `BooleanModel`s.
impl BooleanModel {
    /// Create a new `BooleanModel` with no equations.
    pub fn new() -> BooleanModel {
        BooleanModel {
            equations: Vec::new(),
            variable_to_index: HashMap::new(),
        }
    }

    /// Add a new `Equation` to this model.
    ///
    /// Returns `Err` when an equation for the same variable is already
    /// present.
    pub fn add_equation(&mut self, equation: Equation) -> Result<(), String> {
        if self.variable_to_index.contains_key(&equation.variable) {
            return Err(format!(
                "Duplicate equation for variable `{}`.",
                equation.variable
            ));
        }
        self.variable_to_index
            .insert(equation.variable.clone(), self.equations.len());
        self.equations.push(equation);
        Ok(())
    }

    /// Parse an equation from a `name = formula` string and add it to
    /// this model.
    pub fn add_string_equation(&mut self, line: &str) -> Result<(), String> {
        self.add_equation(Equation::try_from(line)?)
    }

    /// Build a model from a slice of `name = formula` strings.
    pub fn try_from_equations(equations: &[&str]) -> Result<BooleanModel, String> {
        let mut model = BooleanModel::new();
        for line in equations {
            model.add_string_equation(line)?;
        }
        Ok(model)
    }
}

/// Some basic utility methods for inspecting a `BooleanModel`.
impl BooleanModel {
    /// The number of equations in this model.
    pub fn num_vars(&self) -> usize {
        self.equations.len()
    }

    /// The equations of this model, in insertion order.
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Find the equation updating the given variable, or `None` when the
    /// variable is a free input.
    pub fn find_equation(&self, variable: &str) -> Option<&Equation> {
        self.variable_to_index
            .get(variable)
            .map(|index| &self.equations[*index])
    }

    /// The left-hand-side variable names, in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.equations.iter().map(|it| it.variable.as_str())
    }
}

impl Default for BooleanModel {
    fn default() -> Self {
        BooleanModel::new()
    }
}

impl TryFrom<&str> for BooleanModel {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Trim lines, remove comments.
        let lines = value.lines().filter_map(|l| {
            let line = l.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some(line)
            }
        });
        let mut model = BooleanModel::new();
        for line in lines {
            model.add_string_equation(line)?;
        }
        Ok(model)
    }
}

impl Display for BooleanModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for equation in &self.equations {
            writeln!(f, "{}", equation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{BooleanModel, Equation, Expression};
    use pretty_assertions::assert_eq;
    use std::convert::TryFrom;

    #[test]
    fn build_model_test() {
        let model = BooleanModel::try_from(
            r"
            # A small toggle circuit.
            a = !b
            b = a & c
            c = a | (b & !c)
        ",
        )
        .unwrap();

        assert_eq!(3, model.num_vars());
        assert_eq!(vec!["a", "b", "c"], model.variables().collect::<Vec<_>>());
        let b = model.find_equation("b").unwrap();
        assert_eq!("b", b.variable());
        assert_eq!("(a & c)", b.function().to_string());
        // `c` has an equation but is also referenced; `d` does not exist.
        assert!(model.find_equation("d").is_none());
    }

    #[test]
    fn duplicate_variable_test() {
        let mut model = BooleanModel::new();
        model.add_string_equation("a = b | c").unwrap();
        assert!(model.add_string_equation("a = !c").is_err());
        assert_eq!(1, model.num_vars());
    }

    #[test]
    fn invalid_equation_test() {
        assert!(Equation::try_from("a b = c").is_err());
        assert!(Equation::try_from("= c").is_err());
        assert!(Equation::try_from("a = ").is_err());
        assert!(Equation::try_from("a = b &").is_err());
        assert!(Equation::new("not a name", Expression::mk_var("x")).is_err());
    }

    #[test]
    fn model_display_round_trip_test() {
        let model = BooleanModel::try_from_equations(&["a = b & !c", "b = a | b"]).unwrap();
        let printed = model.to_string();
        assert_eq!(model, BooleanModel::try_from(printed.as_str()).unwrap());
    }
}
