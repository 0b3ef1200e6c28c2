use crate::Expression::*;
use crate::{BinaryOp, Expression};
use std::convert::TryFrom;
use std::iter::Peekable;
use std::str::Chars;

impl TryFrom<&str> for Expression {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let tokens = tokenize_group(&mut value.chars().peekable(), true)?;
        Ok(*(parse_expression(&tokens)?))
    }
}

/// **(internal)** An enum of possible tokens occurring in a string
/// representation of an `Expression`.
#[derive(Debug, Eq, PartialEq)]
enum Token {
    Not,                // '!', '~' or 'NOT'
    And,                // '&', '*' or 'AND'
    Or,                 // '|', '+' or 'OR'
    Name(String),       // 'name'
    Tokens(Vec<Token>), // A block of tokens inside parentheses
}

/// **(internal)** Process a peekable iterator of characters into a vector of
/// `Token`s.
///
/// The outer method always consumes the opening parenthesis and the recursive
/// call consumes the closing parenthesis. Use `top_level` to indicate that
/// there will be no closing parenthesis.
fn tokenize_group(data: &mut Peekable<Chars>, top_level: bool) -> Result<Vec<Token>, String> {
    let mut output = Vec::new();
    while let Some(c) = data.next() {
        match c {
            c if c.is_whitespace() => { /* Skip whitespace */ }
            // single char tokens
            '!' | '~' => output.push(Token::Not),
            '&' | '*' => output.push(Token::And),
            '|' | '+' => output.push(Token::Or),
            ')' => {
                return if !top_level {
                    Ok(output)
                } else {
                    Err("Unexpected ')'.".to_string())
                };
            }
            '(' => {
                // start a nested token group
                let tokens = tokenize_group(data, false)?;
                output.push(Token::Tokens(tokens));
            }
            c if is_valid_in_name(c) => {
                // start of a variable name or an operator keyword
                let mut name = vec![c];
                while let Some(c) = data.peek() {
                    if c.is_whitespace() || !is_valid_in_name(*c) {
                        break;
                    } else {
                        name.push(*c);
                        data.next(); // advance iterator
                    }
                }
                let name: String = name.into_iter().collect();
                match name.as_str() {
                    "NOT" => output.push(Token::Not),
                    "AND" => output.push(Token::And),
                    "OR" => output.push(Token::Or),
                    _ => output.push(Token::Name(name)),
                }
            }
            _ => return Err(format!("Unexpected '{}'.", c)),
        }
    }
    if top_level {
        Ok(output)
    } else {
        Err("Expected ')'.".to_string())
    }
}

/// **(internal)** Check if given char can appear in a name.
fn is_valid_in_name(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// **(internal)** Parse an `Expression` using the recursive steps.
fn parse_expression(data: &[Token]) -> Result<Box<Expression>, String> {
    or(data)
}

/// **(internal)** Utility method to find the first occurrence of a specific
/// token in the token tree.
fn index_of_first(data: &[Token], token: Token) -> Option<usize> {
    data.iter().position(|t| *t == token)
}

/// **(internal)** Recursive parsing step 1: extract `|` operators.
fn or(data: &[Token]) -> Result<Box<Expression>, String> {
    let or_token = index_of_first(data, Token::Or);
    Ok(if let Some(i) = or_token {
        Box::new(Binary(BinaryOp::Or, and(&data[..i])?, or(&data[(i + 1)..])?))
    } else {
        and(data)?
    })
}

/// **(internal)** Recursive parsing step 2: extract `&` operators.
fn and(data: &[Token]) -> Result<Box<Expression>, String> {
    let and_token = index_of_first(data, Token::And);
    Ok(if let Some(i) = and_token {
        Box::new(Binary(
            BinaryOp::And,
            terminal(&data[..i])?,
            and(&data[(i + 1)..])?,
        ))
    } else {
        terminal(data)?
    })
}

/// **(internal)** Recursive parsing step 3: extract terminals and negations.
fn terminal(data: &[Token]) -> Result<Box<Expression>, String> {
    if data.is_empty() {
        Err("Expected formula, found nothing.".to_string())
    } else {
        if data[0] == Token::Not {
            return Ok(Box::new(Not(terminal(&data[1..])?)));
        } else if data.len() == 1 {
            // This should be either a name or a parenthesis group, anything
            // else does not make sense.
            match &data[0] {
                Token::Name(name) => return Ok(Box::new(Var(name.clone()))),
                Token::Tokens(inner) => return parse_expression(inner),
                _ => {} // otherwise, fall through to the error at the end.
            }
        }
        Err(format!("Unexpected: {:?}. Expecting formula.", data))
    }
}

#[cfg(test)]
mod tests {
    use crate::Expression;
    use std::convert::TryFrom;

    #[test]
    fn parse_expression_basic() {
        let inputs = vec![
            "var",
            "!foo",
            "(var_1 | x)",
            "(xyz123 & abc)",
            "(a & (b | !c))",
            "((!a | b) & (c | (d & !e)))",
        ];
        for str in inputs {
            assert_eq!(str, format!("{}", Expression::try_from(str).unwrap()))
        }
    }

    #[test]
    fn parse_expression_keywords() {
        // The keyword and symbolic operator spellings are interchangeable.
        let keywords = Expression::try_from("A AND NOT (B OR C)").unwrap();
        let symbolic = Expression::try_from("A & !(B | C)").unwrap();
        let legacy = Expression::try_from("A * ~(B + C)").unwrap();
        assert_eq!(keywords, symbolic);
        assert_eq!(legacy, symbolic);
    }

    #[test]
    fn operator_priority_test() {
        let formula = "a | b & !c | d";
        let expected = "(a | ((b & !c) | d))".to_string();
        assert_eq!(expected, Expression::try_from(formula).unwrap().to_string());
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(Expression::try_from("a = b").is_err());
        assert!(Expression::try_from("a ? b").is_err());
        assert!(Expression::try_from("a > b").is_err());
    }

    #[test]
    fn test_invalid_parentheses() {
        assert!(Expression::try_from("a & (b | c").is_err());
        assert!(Expression::try_from("(f | g))").is_err());
        assert!(Expression::try_from("a | (f & (g)").is_err());
    }

    #[test]
    fn test_missing_formula() {
        assert!(Expression::try_from("a & | g").is_err());
        assert!(Expression::try_from("a &").is_err());
        assert!(Expression::try_from("a & !").is_err());
        assert!(Expression::try_from("a & a b c").is_err());
        assert!(Expression::try_from("").is_err());
    }
}
