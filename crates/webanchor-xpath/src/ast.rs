//! Location path syntax tree.
//!
//! The parser desugars every abbreviation (`.`, `..`, `//`, `@`, omitted
//! `child::`), so evaluators only ever see explicit axes. `Display` writes
//! the unabbreviated form back out.

use std::fmt;

/// A parsed location path such as `/div[1]/p[2]` or `.//text()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath {
    /// Starts at the root of the tree rather than at the context node.
    pub absolute: bool,
    pub steps: Vec<Step>,
}

/// One `axis::test[predicate]...` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    pub fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfNode,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Attribute,
}

impl Axis {
    /// Look up an axis by its XPath name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "self" => Axis::SelfNode,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "attribute" => Axis::Attribute,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::SelfNode => "self",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Attribute => "attribute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Element (or attribute) name, compared ASCII case-insensitively.
    Name(String),
    /// `*`
    Wildcard,
    /// `text()`
    Text,
    /// `comment()`
    Comment,
    /// `node()`
    Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]` or `[position() = n]`, 1-based.
    Position(usize),
    /// `[last()]`
    Last,
    /// `[@name]`
    HasAttribute(String),
    /// `[@name = 'value']`
    AttributeEquals { name: String, value: String },
    /// `[@name != 'value']`
    AttributeNotEquals { name: String, value: String },
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 || self.absolute {
                f.write_str("/")?;
            }
            write!(f, "{step}")?;
        }
        if self.steps.is_empty() && self.absolute {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.axis.name(), self.test)?;
        for predicate in &self.predicates {
            write!(f, "[{predicate}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Name(name) => f.write_str(name),
            NodeTest::Wildcard => f.write_str("*"),
            NodeTest::Text => f.write_str("text()"),
            NodeTest::Comment => f.write_str("comment()"),
            NodeTest::Node => f.write_str("node()"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Position(n) => write!(f, "{n}"),
            Predicate::Last => f.write_str("last()"),
            Predicate::HasAttribute(name) => write!(f, "@{name}"),
            Predicate::AttributeEquals { name, value } => write!(f, "@{name}='{value}'"),
            Predicate::AttributeNotEquals { name, value } => write!(f, "@{name}!='{value}'"),
        }
    }
}
