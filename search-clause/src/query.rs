//! Boolean expression tree produced by the query parser.
//!
//! The tree mirrors what the classic parser builds: a
//! boolean group keeps the occur of each member, leaves carry the field they
//! apply to and the kind of match.

use std::fmt;

/// How a member of a boolean group participates in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

impl Occur {
    /// The prefix operator used for this occur in query syntax.
    pub fn as_operator(&self) -> &'static str {
        match self {
            Occur::Must => "+",
            Occur::Should => "",
            Occur::MustNot => "-",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Occur::Must => "MUST",
            Occur::Should => "SHOULD",
            Occur::MustNot => "MUST_NOT",
        }
    }
}

impl fmt::Display for Occur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    Group(Vec<BoolClause>),
    Boosted(Box<Node>, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolClause {
    pub occur: Occur,
    pub node: Node,
}

impl BoolClause {
    pub fn new(occur: Occur, node: Node) -> Self {
        Self { occur, node }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub field: String,
    pub kind: LeafKind,
}

/// Atomic match expressions. Terms are stored unescaped, except for
/// wildcard patterns which keep their escapes so literal `*`/`?` stay
/// distinguishable from live ones.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafKind {
    Term(String),
    Wildcard(String),
    Prefix(String),
    Range {
        lower: Option<String>,
        upper: Option<String>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
    Regexp(String),
    Fuzzy { term: String, slop: String },
    MatchAll,
}

impl LeafKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            LeafKind::Term(_) => "term",
            LeafKind::Wildcard(_) => "wildcard",
            LeafKind::Prefix(_) => "prefix",
            LeafKind::Range { .. } => "range",
            LeafKind::Regexp(_) => "regexp",
            LeafKind::Fuzzy { .. } => "fuzzy",
            LeafKind::MatchAll => "match-all",
        }
    }
}

impl Node {
    pub fn leaf(field: impl Into<String>, kind: LeafKind) -> Self {
        Node::Leaf(Leaf {
            field: field.into(),
            kind,
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Leaf(leaf) => leaf.kind.kind_name(),
            Node::Group(_) => "boolean",
            Node::Boosted(..) => "boosted",
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LeafKind::MatchAll => return f.write_str("*:*"),
            _ => write!(f, "{}:", self.field)?,
        }
        match &self.kind {
            LeafKind::Term(text) | LeafKind::Wildcard(text) => f.write_str(text),
            LeafKind::Prefix(prefix) => write!(f, "{}*", prefix),
            LeafKind::Range {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            } => write!(
                f,
                "{}{} TO {}{}",
                if *lower_inclusive { '[' } else { '{' },
                lower.as_deref().unwrap_or("*"),
                upper.as_deref().unwrap_or("*"),
                if *upper_inclusive { ']' } else { '}' },
            ),
            LeafKind::Regexp(re) => write!(f, "/{}/", re),
            LeafKind::Fuzzy { term, slop } => write!(f, "{}~{}", term, slop),
            LeafKind::MatchAll => Ok(()),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => leaf.fmt(f),
            Node::Boosted(inner, boost) => write!(f, "({})^{}", inner, boost),
            Node::Group(clauses) => {
                for (idx, clause) in clauses.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(clause.occur.as_operator())?;
                    match &clause.node {
                        Node::Group(_) => write!(f, "({})", clause.node)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }
        }
    }
}
