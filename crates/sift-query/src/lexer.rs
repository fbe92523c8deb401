//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word (search term).
    Term(String),

    /// A quoted string (the quotes are stripped, content preserved).
    Phrase(String),

    /// The OR keyword.
    Or,

    /// Negation prefix (-).
    Not,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Left square bracket.
    LBracket,

    /// Right square bracket.
    RBracket,

    /// Field prefix (e.g., "title:" produces FieldPrefix("title")).
    FieldPrefix(String),

    /// Field comparison prefix (e.g., "year>=" produces a comparison on "year").
    Compare {
        /// Field being compared.
        field: String,
        /// One of `=`, `<`, `>`, `<=`, `>=`.
        operator: String,
    },
}

/// A token together with the byte offset where it starts.
pub(crate) type Spanned = (Token, usize);

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                break;
            }
            let start = self.position;
            if let Some(token) = self.next_token()? {
                tokens.push((token, start));
            }
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if the input only held separators.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let single = match ch {
            '"' => return self.read_phrase(),
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '-' => Token::Not,
            _ => return Ok(self.read_word()),
        };
        self.advance();
        Ok(Some(single))
    }

    /// Reads a quoted string.
    fn read_phrase(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance(); // consume closing quote
                    return Ok(Some(Token::Phrase(content)));
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(self.error_at("unclosed quote", start_pos));
                }
            }
        }
    }

    /// Reads a term, keyword (OR), field prefix or comparison prefix.
    fn read_word(&mut self) -> Option<Token> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '"') {
                break;
            }

            if ch == ':' {
                self.advance(); // consume the colon
                if word.is_empty() {
                    // Bare colon, treat as part of next term
                    continue;
                }
                return Some(Token::FieldPrefix(word));
            }

            if matches!(ch, '=' | '<' | '>')
                && !word.is_empty()
                && !word.starts_with(['=', '<', '>'])
            {
                return Some(self.read_compare(word));
            }

            word.push(ch);
            self.advance();
        }

        if word.is_empty() {
            return None;
        }

        // Check for OR keyword (case-insensitive)
        if word.eq_ignore_ascii_case("OR") {
            return Some(Token::Or);
        }

        Some(Token::Term(word))
    }

    /// Reads the comparison operator following a field name.
    fn read_compare(&mut self, field: String) -> Token {
        let mut operator = String::new();
        if let Some(ch) = self.chars.peek().copied() {
            operator.push(ch);
            self.advance();
            if ch != '=' && self.chars.peek() == Some(&'=') {
                operator.push('=');
                self.advance();
            }
        }
        Token::Compare { field, operator }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes a query string, keeping the start offset of every token.
pub(crate) fn tokenize_spanned(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|(token, _)| token)
        .collect())
}
