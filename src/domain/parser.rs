//! Backtracking recursive-descent parser.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! Addition       := Addition '+' Multiplication | Multiplication
//! Multiplication := Multiplication '*' Grouping  | Grouping
//! Grouping       := '(' Addition ')' | Literal
//! Literal        := [0-9]+ | [a-z]
//! ```
//!
//! A binary rule tries every interior occurrence of its operator from left
//! to right, parsing the left side with the same rule and the right side
//! with the next tighter one. The first split where both sides match wins,
//! which yields left-associative trees. Rules answer `None` for "no match";
//! only [`ExpressionParser::parse`] turns that into a [`ParseError`].
//!
//! Re-parsing substrings after failed splits is exponential in the worst
//! case. With `memoize` on, `(rule, span)` pairs known to fail are skipped.

use std::collections::HashSet;

use tracing::{debug, instrument, trace};

use crate::domain::arena::{ExprArena, NodeId, NodeKind, Operator};
use crate::domain::error::ParseError;
use crate::domain::flatten::flatten;
use crate::domain::literal::Literal;

pub const DEFAULT_MAX_INPUT_LEN: usize = 256;

/// Tuning knobs for [`ExpressionParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Remember failing `(rule, span)` pairs during one parse
    pub memoize: bool,
    /// Reject longer inputs (after whitespace removal) up front
    pub max_input_len: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            max_input_len: Some(DEFAULT_MAX_INPUT_LEN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Rule {
    Addition,
    Multiplication,
    Grouping,
}

impl Rule {
    /// Operator byte, node operator and right-hand rule of a binary rule.
    fn split(self) -> Option<(u8, Operator, Rule)> {
        match self {
            Rule::Addition => Some((b'+', Operator::Add, Rule::Multiplication)),
            Rule::Multiplication => Some((b'*', Operator::Multiply, Rule::Grouping)),
            Rule::Grouping => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    options: ParserOptions,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse `text` into a flattened expression tree.
    ///
    /// Whitespace is stripped first, so `"1 + 2"` and `"1+2"` are the same.
    ///
    /// # Errors
    ///
    /// [`ParseError::Invalid`] when the input does not reduce to a single
    /// expression: empty input, dangling operators, unbalanced or empty
    /// parentheses, characters outside the grammar.
    /// [`ParseError::TooLong`] when the stripped input exceeds
    /// `max_input_len`.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self, text: &str) -> Result<ExprArena, ParseError> {
        let input: String = text.chars().filter(|c| !c.is_whitespace()).collect();

        if let Some(max) = self.options.max_input_len {
            let len = input.chars().count();
            if len > max {
                return Err(ParseError::TooLong { len, max });
            }
        }

        let mut state = ParseState {
            input: &input,
            tree: ExprArena::new(),
            memoize: self.options.memoize,
            failures: HashSet::new(),
        };

        let Some(root) = state.rule(Rule::Addition, 0, input.len()) else {
            debug!("no rule matches {:?}", input);
            return Err(ParseError::Invalid {
                input: text.to_string(),
            });
        };
        let remembered = state.failures.len();

        let mut tree = state.tree;
        tree.set_root(root);
        flatten(&mut tree);
        debug!(nodes = tree.len(), remembered, "parsed {:?}", input);
        Ok(tree)
    }
}

/// Working state of one parse. Spans are byte offsets into `input`; every
/// split point sits next to an ASCII delimiter, so spans stay on char
/// boundaries.
struct ParseState<'a> {
    input: &'a str,
    tree: ExprArena,
    memoize: bool,
    failures: HashSet<(Rule, usize, usize)>,
}

impl ParseState<'_> {
    fn rule(&mut self, rule: Rule, start: usize, end: usize) -> Option<NodeId> {
        if self.memoize && self.failures.contains(&(rule, start, end)) {
            return None;
        }

        let result = match rule.split() {
            Some((symbol, operator, tighter)) => {
                self.binary(rule, start, end, symbol, operator, tighter)
            }
            None => self.grouping(start, end),
        };

        if result.is_none() && self.memoize {
            self.failures.insert((rule, start, end));
        }
        result
    }

    fn binary(
        &mut self,
        rule: Rule,
        start: usize,
        end: usize,
        symbol: u8,
        operator: Operator,
        tighter: Rule,
    ) -> Option<NodeId> {
        if end - start > 2 {
            for split in (start + 1)..(end - 1) {
                if self.input.as_bytes()[split] != symbol {
                    continue;
                }
                let Some(left) = self.rule(rule, start, split) else {
                    continue;
                };
                match self.rule(tighter, split + 1, end) {
                    Some(right) => {
                        trace!(?rule, split, "split {:?}", &self.input[start..end]);
                        let node = self.tree.insert_node(NodeKind::Compound(operator), None);
                        self.tree.append_child(node, left);
                        self.tree.append_child(node, right);
                        return Some(node);
                    }
                    // Backtrack: the left tree is not part of any result
                    None => self.tree.remove_subtree(left),
                }
            }
        }
        self.rule(tighter, start, end)
    }

    fn grouping(&mut self, start: usize, end: usize) -> Option<NodeId> {
        let bytes = self.input.as_bytes();
        if end - start >= 3 && bytes[start] == b'(' && bytes[end - 1] == b')' {
            if let Some(inner) = self.rule(Rule::Addition, start + 1, end - 1) {
                let node = self
                    .tree
                    .insert_node(NodeKind::Compound(Operator::Group), None);
                self.tree.append_child(node, inner);
                return Some(node);
            }
        }
        self.literal(start, end)
    }

    fn literal(&mut self, start: usize, end: usize) -> Option<NodeId> {
        let literal = Literal::parse(&self.input[start..end])?;
        Some(self.tree.insert_node(NodeKind::Literal(literal), None))
    }
}
