//! Query parser.
//!
//! Parses a token stream into a query tree using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → unary+
//! unary      → "-" unary | primary
//! primary    → TERM | PHRASE | compare | range | field_expr | group
//! compare    → COMPARE (TERM | PHRASE)
//! range      → ("[" | "]") bound "TO" bound ("]" | "[")
//! bound      → TERM | PHRASE
//! field_expr → FIELD_PREFIX (TERM | PHRASE | range | group)
//! group      → "(" or_expr? ")"
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Field prefix and comparison: `field:`, `field>=`
//! 3. Negation: `-`
//! 4. AND (implicit, between adjacent terms)
//! 5. OR (explicit keyword)
//!
//! Parentheses around an AND or OR of several children produce that node
//! directly, since its serialized form already carries the parentheses. Any
//! other parenthesized expression becomes a [`Query::Group`]. Serializing a
//! parsed tree and parsing the result again therefore gives the same text.

use std::mem;

use log::trace;

use crate::{
    ast::{Query, TextQuery},
    error::{ParseError, QueryError},
    lexer::{Spanned, Token, tokenize_spanned},
};

/// Keyword separating the two bounds of a range. Case-sensitive.
const RANGE_SEPARATOR: &str = "TO";

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream with byte offsets.
    tokens: Vec<Spanned>,
    /// Current position in token stream.
    position: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query.
    fn parse(mut self) -> Result<Option<Query>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let query = self.parse_or_expr()?;

        if let Some(token) = self.peek() {
            return Err(self.error(format!("unexpected token: {token:?}")));
        }

        Ok(Some(query))
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<Query, ParseError> {
        let mut alternatives = vec![self.parse_and_expr()?];

        while self.check(&Token::Or) {
            self.advance(); // consume OR
            alternatives.push(self.parse_and_expr()?);
        }

        Ok(Query::or(alternatives))
    }

    /// Parses: and_expr → unary+
    fn parse_and_expr(&mut self) -> Result<Query, ParseError> {
        let mut terms = vec![self.parse_unary()?];

        while self.can_start_unary() {
            terms.push(self.parse_unary()?);
        }

        Ok(Query::and(terms))
    }

    /// Checks if the current token can start a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Term(_)
                    | Token::Phrase(_)
                    | Token::Not
                    | Token::LParen
                    | Token::LBracket
                    | Token::RBracket
                    | Token::FieldPrefix(_)
                    | Token::Compare { .. }
            )
        )
    }

    /// Parses: unary → "-" unary | primary
    fn parse_unary(&mut self) -> Result<Query, ParseError> {
        if self.check(&Token::Not) {
            self.advance(); // consume -
            return Ok(Query::not(self.parse_unary()?));
        }

        self.parse_primary()
    }

    /// Parses: primary → TERM | PHRASE | compare | range | field_expr | group
    fn parse_primary(&mut self) -> Result<Query, ParseError> {
        match self.peek().cloned() {
            Some(Token::Term(_) | Token::Phrase(_)) => Ok(self.parse_term_or_phrase()),

            Some(Token::Compare { field, operator }) => {
                self.advance();
                self.parse_compare(field, operator)
            }

            Some(Token::LBracket | Token::RBracket) => self.parse_range(),

            Some(Token::FieldPrefix(name)) => {
                self.advance();
                self.parse_field_expr(name)
            }

            Some(Token::LParen) => self.parse_group(),

            Some(Token::RParen) => Err(self.error("unexpected closing parenthesis")),

            Some(Token::Or) => Err(self.error("unexpected OR (needs expression before it)")),

            // parse_unary consumes negations before we get here
            Some(Token::Not) => Err(self.error("unexpected negation")),

            None => Err(self.error("unexpected end of query")),
        }
    }

    /// Parses the value after a comparison prefix.
    fn parse_compare(&mut self, field: String, operator: String) -> Result<Query, ParseError> {
        let Some(text) = self.take_text() else {
            return Err(self.error(format!(
                "expected value after comparison '{field}{operator}'"
            )));
        };
        Ok(Query::compare(field, operator, text))
    }

    /// Parses: range → ("[" | "]") bound "TO" bound ("]" | "[")
    fn parse_range(&mut self) -> Result<Query, ParseError> {
        let start_inclusive = self.check(&Token::LBracket);
        self.advance(); // consume opening bracket

        let Some(start) = self.take_text() else {
            return Err(self.error("expected start of range"));
        };

        if !matches!(self.peek(), Some(Token::Term(word)) if word == RANGE_SEPARATOR) {
            return Err(self.error("expected TO in range"));
        }
        self.advance(); // consume TO

        let Some(end) = self.take_text() else {
            return Err(self.error("expected end of range"));
        };

        let end_inclusive = match self.peek() {
            Some(Token::RBracket) => true,
            Some(Token::LBracket) => false,
            _ => return Err(self.error("expected ] or [ to close range")),
        };
        self.advance(); // consume closing bracket

        Ok(Query::range(start, start_inclusive, end, end_inclusive))
    }

    /// Parses the expression after a field prefix.
    fn parse_field_expr(&mut self, name: String) -> Result<Query, ParseError> {
        let child = match self.peek().cloned() {
            Some(Token::Term(_) | Token::Phrase(_)) => self.parse_term_or_phrase(),
            Some(Token::LBracket | Token::RBracket) => self.parse_range()?,
            Some(Token::LParen) => self.parse_group()?,
            _ => {
                return Err(self.error(format!(
                    "expected term, phrase, range, or group after '{name}:'"
                )));
            }
        };

        Ok(Query::field(name, child))
    }

    /// Parses a TERM or PHRASE token into a query, consuming the token.
    ///
    /// A quoted string with several words becomes a phrase; one word (or none)
    /// stays a single exact term.
    fn parse_term_or_phrase(&mut self) -> Query {
        match self.take_text() {
            Some(text) if text.is_exact_match() => {
                let words: Vec<&str> = text.text().split_whitespace().collect();
                if words.len() > 1 {
                    Query::phrase(words)
                } else {
                    Query::Text(text)
                }
            }
            Some(text) => Query::Text(text),
            None => unreachable!("parse_term_or_phrase called on non-term/phrase token"),
        }
    }

    /// Parses a parenthesized expression, consuming the surrounding parentheses.
    fn parse_group(&mut self) -> Result<Query, ParseError> {
        self.advance(); // consume (

        if self.check(&Token::RParen) {
            self.advance();
            return Ok(Query::And(Vec::new()));
        }

        let inner = self.parse_or_expr()?;

        if !self.check(&Token::RParen) {
            return Err(self.error("expected closing parenthesis"));
        }
        self.advance(); // consume )

        let carries_parens =
            matches!(&inner, Query::And(children) | Query::Or(children) if children.len() > 1);
        Ok(if carries_parens {
            inner
        } else {
            Query::group(inner)
        })
    }

    /// Consumes a TERM or PHRASE token as a [`TextQuery`].
    fn take_text(&mut self) -> Option<TextQuery> {
        let text = match self.peek()? {
            Token::Term(text) => TextQuery::term(text.as_str()),
            Token::Phrase(text) => TextQuery::exact(text.as_str()),
            _ => return None,
        };
        self.advance();
        Some(text)
    }

    /// Creates an error pointing at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        let position = self.tokens.get(self.position).map(|(_, start)| *start);
        ParseError::new(message, position)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    /// Checks if the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a query string into a tree.
///
/// Returns `Ok(None)` for empty queries, `Ok(Some(query))` for valid queries,
/// or `Err(QueryError)` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<Query>, QueryError> {
    let tokens = tokenize_spanned(input)?;
    let query = Parser::new(tokens)
        .parse()
        .map_err(|err| QueryError::from(err).with_query(input))?;
    if let Some(query) = &query {
        trace!("parsed {input:?} as {query:#}");
    }
    Ok(query)
}
