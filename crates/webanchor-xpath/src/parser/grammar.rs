//! # Grammar Rules
//!
//! ```text
//! path      := '/' relative? | '//' relative | relative
//! relative  := step (('/' | '//') step)*
//! step      := '.' | '..' | axis? test predicate*
//! axis      := NAME '::' | '@'
//! test      := '*' | NAME | ('text' | 'node' | 'comment') '(' ')'
//! predicate := '[' NUMBER ']'
//!            | '[' 'last' '(' ')' ']'
//!            | '[' 'position' '(' ')' '=' NUMBER ']'
//!            | '[' '@' NAME (('=' | '!=') LITERAL)? ']'
//! ```

use crate::ast::{Axis, LocationPath, NodeTest, Predicate, Step};
use crate::lexer::{Token, TokenKind};
use crate::parser::{ParseError, Parser};

pub(super) fn location_path(p: &mut Parser<'_, '_>) -> Result<LocationPath, ParseError> {
    let mut steps = Vec::new();
    let absolute = match p.current() {
        Some(TokenKind::Slash) => {
            p.bump();
            if p.at_end() {
                // `/` alone selects the root node
                return Ok(LocationPath {
                    absolute: true,
                    steps,
                });
            }
            true
        }
        Some(TokenKind::DoubleSlash) => {
            p.bump();
            steps.push(descendant_or_self());
            true
        }
        _ => false,
    };

    steps.push(step(p)?);
    loop {
        match p.current() {
            None => break,
            Some(TokenKind::Slash) => {
                p.bump();
            }
            Some(TokenKind::DoubleSlash) => {
                p.bump();
                steps.push(descendant_or_self());
            }
            Some(_) => return Err(p.unexpected("`/` or end of expression")),
        }
        steps.push(step(p)?);
    }

    Ok(LocationPath { absolute, steps })
}

fn descendant_or_self() -> Step {
    Step::new(Axis::DescendantOrSelf, NodeTest::Node)
}

fn step(p: &mut Parser<'_, '_>) -> Result<Step, ParseError> {
    match p.current() {
        Some(TokenKind::Dot) => {
            p.bump();
            return Ok(Step::new(Axis::SelfNode, NodeTest::Node));
        }
        Some(TokenKind::DotDot) => {
            p.bump();
            return Ok(Step::new(Axis::Parent, NodeTest::Node));
        }
        _ => {}
    }

    let axis = if p.at(TokenKind::At) {
        p.bump();
        Axis::Attribute
    } else if p.at(TokenKind::Name) && p.nth(1) == Some(TokenKind::ColonColon) {
        let name = p.bump();
        p.bump();
        Axis::from_name(name.text).ok_or_else(|| ParseError::UnknownAxis {
            name: name.text.to_string(),
            offset: name.offset,
        })?
    } else {
        Axis::Child
    };

    let mut step = Step::new(axis, node_test(p)?);
    while p.at(TokenKind::LBracket) {
        p.bump();
        step.predicates.push(predicate(p)?);
        p.expect(TokenKind::RBracket, "`]`")?;
    }
    Ok(step)
}

fn node_test(p: &mut Parser<'_, '_>) -> Result<NodeTest, ParseError> {
    match p.current() {
        Some(TokenKind::Star) => {
            p.bump();
            Ok(NodeTest::Wildcard)
        }
        Some(TokenKind::Name) => {
            let name = p.bump();
            if !p.at(TokenKind::LParen) {
                return Ok(NodeTest::Name(name.text.to_string()));
            }
            let test = match name.text {
                "text" => NodeTest::Text,
                "node" => NodeTest::Node,
                "comment" => NodeTest::Comment,
                _ => return Err(unsupported_function(name)),
            };
            p.bump();
            p.expect(TokenKind::RParen, "`)`")?;
            Ok(test)
        }
        _ => Err(p.unexpected("a node test")),
    }
}

fn predicate(p: &mut Parser<'_, '_>) -> Result<Predicate, ParseError> {
    match p.current() {
        Some(TokenKind::Number) => Ok(Predicate::Position(number(p.bump())?)),
        Some(TokenKind::At) => {
            p.bump();
            let name = p.expect(TokenKind::Name, "an attribute name")?.text.to_string();
            match p.current() {
                Some(TokenKind::Eq) => {
                    p.bump();
                    let value = p.expect(TokenKind::Literal, "a string literal")?;
                    Ok(Predicate::AttributeEquals {
                        name,
                        value: value.unquoted().to_string(),
                    })
                }
                Some(TokenKind::NotEq) => {
                    p.bump();
                    let value = p.expect(TokenKind::Literal, "a string literal")?;
                    Ok(Predicate::AttributeNotEquals {
                        name,
                        value: value.unquoted().to_string(),
                    })
                }
                _ => Ok(Predicate::HasAttribute(name)),
            }
        }
        Some(TokenKind::Name) => {
            let function = p.bump();
            let is_known = matches!(function.text, "last" | "position");
            if !is_known {
                return Err(unsupported_function(function));
            }
            p.expect(TokenKind::LParen, "`(`")?;
            p.expect(TokenKind::RParen, "`)`")?;
            if function.text == "last" {
                return Ok(Predicate::Last);
            }
            p.expect(TokenKind::Eq, "`=`")?;
            let value = p.expect(TokenKind::Number, "a number")?;
            Ok(Predicate::Position(number(value)?))
        }
        _ => Err(p.unexpected("a predicate")),
    }
}

fn number(token: &Token<'_>) -> Result<usize, ParseError> {
    token
        .text
        .parse()
        .map_err(|_| ParseError::NumberOutOfRange {
            text: token.text.to_string(),
            offset: token.offset,
        })
}

fn unsupported_function(token: &Token<'_>) -> ParseError {
    ParseError::UnsupportedFunction {
        name: token.text.to_string(),
        offset: token.offset,
    }
}
