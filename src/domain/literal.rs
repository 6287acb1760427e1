//! Literal tokens: unsigned integers and single-letter identifiers.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z]$").unwrap());

/// Validated value of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Numeric(i64),
    Identifier(char),
}

/// Leaf payload: the token as written plus its decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    text: String,
    value: LiteralValue,
}

impl Literal {
    /// Validate a token.
    ///
    /// Returns `None` for anything that is not `[0-9]+` or a single `a`-`z`
    /// letter. Digit runs that overflow `i64` are rejected the same way.
    pub fn parse(token: &str) -> Option<Self> {
        let value = if NUMERIC.is_match(token) {
            LiteralValue::Numeric(token.parse().ok()?)
        } else if IDENTIFIER.is_match(token) {
            LiteralValue::Identifier(token.chars().next()?)
        } else {
            return None;
        };
        Some(Self {
            text: token.to_string(),
            value,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> LiteralValue {
        self.value
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.value, LiteralValue::Numeric(_))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", LiteralValue::Numeric(0))]
    #[case("13", LiteralValue::Numeric(13))]
    #[case("007", LiteralValue::Numeric(7))]
    #[case("x", LiteralValue::Identifier('x'))]
    #[case("a", LiteralValue::Identifier('a'))]
    fn given_valid_token_when_parsing_then_decodes_value(
        #[case] token: &str,
        #[case] expected: LiteralValue,
    ) {
        let literal = Literal::parse(token).expect("valid literal");
        assert_eq!(literal.value(), expected);
        assert_eq!(literal.text(), token);
    }

    #[rstest]
    #[case("")]
    #[case("ab")]
    #[case("X")]
    #[case("1a")]
    #[case("-1")]
    #[case("()")]
    #[case("99999999999999999999999")]
    fn given_invalid_token_when_parsing_then_no_match(#[case] token: &str) {
        assert!(Literal::parse(token).is_none());
    }

    #[test]
    fn given_leading_zeros_when_displaying_then_keeps_original_text() {
        let literal = Literal::parse("007").unwrap();
        assert_eq!(literal.to_string(), "007");
        assert!(literal.is_numeric());
    }
}
