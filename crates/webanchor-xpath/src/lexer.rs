//! # Lexer - Tokenizing XPath Expressions
//!
//! This module breaks an XPath location path into tokens using the [Logos]
//! lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! Whitespace between tokens is insignificant in XPath, so unlike a lossless
//! lexer we skip it. Every other byte ends up in exactly one token; bytes the
//! lexer does not recognise become [`TokenKind::Error`] tokens so the parser
//! can report them with their position.
//!
//! ```
//! use webanchor_xpath::lexer::{lex, TokenKind};
//!
//! let kinds: Vec<_> = lex("/p[2]").iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Slash,
//!         TokenKind::Name,
//!         TokenKind::LBracket,
//!         TokenKind::Number,
//!         TokenKind::RBracket,
//!     ]
//! );
//! ```
//!
//! Keywords such as `text`, `child` or `last` are lexed as plain
//! [`TokenKind::Name`] tokens; whether a name is a node type test, an axis or
//! an element name depends on what follows it, which is the parser's job.

use logos::Logos;

/// Token kinds produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    /// `//` abbreviation for `/descendant-or-self::node()/`
    #[token("//")]
    DoubleSlash,

    /// `/` step separator
    #[token("/")]
    Slash,

    /// `..` abbreviation for `parent::node()`
    #[token("..")]
    DotDot,

    /// `.` abbreviation for `self::node()`
    #[token(".")]
    Dot,

    /// `@` abbreviation for `attribute::`
    #[token("@")]
    At,

    /// `*` name wildcard
    #[token("*")]
    Star,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// `::` between an axis name and a node test
    #[token("::")]
    ColonColon,

    #[token("=")]
    Eq,

    #[token("!=")]
    NotEq,

    /// Unsigned integer literal
    #[regex(r"[0-9]+")]
    Number,

    /// Quoted string literal, either quote style
    #[regex(r#""[^"]*"|'[^']*'"#)]
    Literal,

    /// Element, attribute, axis or function name
    #[regex(r"[A-Za-z_][A-Za-z0-9_.\-]*")]
    Name,

    /// Any byte sequence the lexer does not recognise
    Error,
}

/// A lexed token with its kind, text slice and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the source expression.
    pub offset: usize,
}

impl Token<'_> {
    /// The literal's contents without the surrounding quotes.
    ///
    /// Returns the raw text for non-literal tokens.
    pub fn unquoted(&self) -> &str {
        if self.kind == TokenKind::Literal && self.text.len() >= 2 {
            &self.text[1..self.text.len() - 1]
        } else {
            self.text
        }
    }
}

/// Lex the input into a sequence of tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Error);
        tokens.push(Token {
            kind,
            text: lexer.slice(),
            offset: lexer.span().start,
        });
    }

    tokens
}
