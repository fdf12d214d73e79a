//! # webanchor-xpath
//!
//! Lexer and parser for the XPath location paths that webanchor stores in
//! range selectors, built with [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! Anchors produced by webanchor only ever contain simple positional paths
//! such as `/div[1]/p[2]/text()[1]`. Paths coming back from storage, or
//! produced by other annotation tools, can be richer, so this crate accepts
//! the abbreviated location path subset of XPath 1.0:
//!
//! - absolute and relative paths, `//` and `.`/`..` abbreviations
//! - the `child`, `descendant`, `descendant-or-self`, `self`, `parent`,
//!   `ancestor`, `ancestor-or-self`, `following-sibling`,
//!   `preceding-sibling` and `attribute` axes
//! - name tests, `*`, `text()`, `comment()` and `node()`
//! - positional predicates (`[2]`, `[last()]`, `[position() = 2]`) and
//!   attribute predicates (`[@id]`, `[@id = 'x']`, `[@id != 'x']`)
//!
//! Evaluation lives next to the tree it runs against; this crate only turns
//! text into an [`ast::LocationPath`].
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → LocationPath
//!               (Logos)          (Grammar)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! webanchor-xpath/
//! ├── lib.rs           # This file - public API
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── ast.rs           # LocationPath, Step, Axis, NodeTest, Predicate
//! └── parser/
//!     ├── mod.rs       # Parser cursor, ParseError, public parse() function
//!     └── grammar.rs   # Grammar rules
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use webanchor_xpath::ast::{Axis, NodeTest};
//! use webanchor_xpath::parse;
//!
//! let path = parse("/div[1]/text()[2]").unwrap();
//! assert!(path.absolute);
//! assert_eq!(path.steps[0].axis, Axis::Child);
//! assert_eq!(path.steps[1].test, NodeTest::Text);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::LocationPath;
pub use parser::{ParseError, parse};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn snapshot_anchor_paths() {
        let paths = [
            "/.",
            "/div[1]",
            "/div[1]/p[2]/text()[1]",
            "/section[1]/comment()[1]",
            "/DIV[1]/Span[3]",
        ];
        let rendered: Vec<String> = paths
            .iter()
            .map(|p| format!("{p} => {}", parse(p).unwrap()))
            .collect();
        assert_snapshot!(rendered.join("\n"), @r"
        /. => /self::node()
        /div[1] => /child::div[1]
        /div[1]/p[2]/text()[1] => /child::div[1]/child::p[2]/child::text()[1]
        /section[1]/comment()[1] => /child::section[1]/child::comment()[1]
        /DIV[1]/Span[3] => /child::DIV[1]/child::Span[3]
        ");
    }

    #[test]
    fn display_is_reparseable() {
        let inputs = [
            "//p[last()]",
            "../following-sibling::*[@class='note'][2]",
            "ancestor-or-self::node()",
            "/",
        ];
        for input in inputs {
            let parsed = parse(input).unwrap();
            let reparsed = parse(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "Reparse failed for: {input:?}");
        }
    }
}
