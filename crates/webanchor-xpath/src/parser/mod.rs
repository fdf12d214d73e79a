//! # Parser - Recursive Descent over Tokens
//!
//! The parser walks the token stream produced by the [`lexer`](crate::lexer)
//! and builds a [`LocationPath`] directly. XPath location paths are shallow
//! (a flat list of steps, each with a flat list of predicates), so there is
//! no need for an intermediate event stream: each grammar rule in
//! [`grammar`] returns the node it parsed or a [`ParseError`] pointing at
//! the offending token.
//!
//! ```
//! use webanchor_xpath::parse;
//!
//! let path = parse("/p[2]/text()[1]").unwrap();
//! assert_eq!(path.steps.len(), 2);
//! assert_eq!(path.to_string(), "/child::p[2]/child::text()[1]");
//! ```

mod grammar;

use crate::ast::LocationPath;
use crate::lexer::{Token, TokenKind, lex};

/// Why an expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected `{found}` at offset {offset}, expected {expected}")]
    Unexpected {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unknown axis `{name}` at offset {offset}")]
    UnknownAxis { name: String, offset: usize },

    #[error("unsupported function `{name}()` at offset {offset}")]
    UnsupportedFunction { name: String, offset: usize },

    #[error("number `{text}` at offset {offset} is out of range")]
    NumberOutOfRange { text: String, offset: usize },
}

/// Parse an XPath location path.
pub fn parse(input: &str) -> Result<LocationPath, ParseError> {
    let tokens = lex(input);
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    Parser::new(&tokens).parse()
}

/// Cursor over the token stream.
///
/// Grammar functions receive `&mut Parser` and use its methods to inspect
/// (`current()`, `nth()`, `at()`, `at_end()`) and consume (`bump()`,
/// `expect()`) tokens.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the tokens as a complete location path.
    pub fn parse(mut self) -> Result<LocationPath, ParseError> {
        grammar::location_path(&mut self)
    }

    /// Current token kind, or `None` past the end.
    pub fn current(&self) -> Option<TokenKind> {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: TokenKind) -> bool {
        self.current() == Some(kind)
    }

    /// Consume and return the current token.
    ///
    /// Grammar rules only call this after checking `current()`, so running
    /// past the end is a bug in the grammar.
    pub fn bump(&mut self) -> &'t Token<'input> {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    /// Consume the current token if it has the given kind, or fail.
    pub fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<&'t Token<'input>, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Build an error describing the current token.
    pub fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) => ParseError::Unexpected {
                found: token.text.to_string(),
                offset: token.offset,
                expected,
            },
            None => ParseError::UnexpectedEnd { expected },
        }
    }
}
