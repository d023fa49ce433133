//! Recursive-descent parser for the Lucene classic query syntax.
//!
//! Follows the classic parser's grammar and its `addClause` rules for the
//! default OR operator. Analysis is keyword-style: every term or quoted
//! string is a single token, and leading wildcards are allowed.

use crate::errors::QueryError;
use crate::escape::discard_escape_char;
use crate::lexer::{Lexer, RangeBound, RangeToken, Token, TokenKind};
use crate::query::{BoolClause, LeafKind, Node, Occur};

/// Deepest parenthesis nesting accepted; deeper queries are rejected instead
/// of exhausting the stack.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    None,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Required,
    Prohibited,
}

/// Parses `query` into a boolean expression tree. Terms without a field
/// prefix apply to `default_field`.
pub fn parse(query: &str, default_field: &str) -> Result<Node, QueryError> {
    let tokens = Lexer::new(query).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let node = parser.query(default_field)?;
    parser.expect_eof()?;
    Ok(node)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // The token stream always ends with Eof, and Eof is never consumed.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expecting: &str) -> QueryError {
        let token = self.peek();
        QueryError::syntax(
            token.position,
            format!("Encountered {}. Was expecting {}", token.kind, expecting),
        )
    }

    fn expect_eof(&self) -> Result<(), QueryError> {
        match self.peek().kind {
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("<EOF>")),
        }
    }

    fn starts_clause(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::BareOperator(_)
                | TokenKind::LParen
                | TokenKind::Star
                | TokenKind::Quoted(_)
                | TokenKind::Term(_)
                | TokenKind::PrefixTerm(_)
                | TokenKind::WildTerm(_)
                | TokenKind::Regexp(_)
                | TokenKind::Range(_)
        )
    }

    fn conjunction(&mut self) -> Conjunction {
        match self.peek().kind {
            TokenKind::And => {
                self.advance();
                Conjunction::And
            }
            TokenKind::Or => {
                self.advance();
                Conjunction::Or
            }
            _ => Conjunction::None,
        }
    }

    fn modifiers(&mut self) -> Modifier {
        match self.peek().kind {
            TokenKind::Plus => {
                self.advance();
                Modifier::Required
            }
            TokenKind::Minus | TokenKind::Not => {
                self.advance();
                Modifier::Prohibited
            }
            _ => Modifier::None,
        }
    }

    fn query(&mut self, field: &str) -> Result<Node, QueryError> {
        let mut clauses = Vec::new();

        let mods = self.modifiers();
        let node = self.clause(field)?;
        let first_unmodified = mods == Modifier::None;
        add_clause(&mut clauses, Conjunction::None, mods, node);

        while self.starts_clause() {
            let conj = self.conjunction();
            let mods = self.modifiers();
            let node = self.clause(field)?;
            add_clause(&mut clauses, conj, mods, node);
        }

        if clauses.len() == 1 && first_unmodified {
            if let Some(single) = clauses.pop() {
                return Ok(single.node);
            }
        }
        Ok(Node::Group(clauses))
    }

    fn clause(&mut self, default_field: &str) -> Result<Node, QueryError> {
        let mut field = default_field.to_string();

        if *self.peek_kind_at(1) == TokenKind::Colon {
            let token = self.peek().clone();
            match &token.kind {
                TokenKind::Term(image) => {
                    field = discard_escape_char(image, token.position)?;
                }
                TokenKind::Star => field = "*".to_string(),
                _ => {}
            }
            if matches!(token.kind, TokenKind::Term(_) | TokenKind::Star) {
                self.advance();
                self.advance();
            }
        }

        if self.peek().kind == TokenKind::LParen {
            let open = self.advance();
            if self.depth >= MAX_NESTING {
                return Err(QueryError::syntax(
                    open.position,
                    format!("Query nested too deeply, at most {} levels", MAX_NESTING),
                ));
            }
            self.depth += 1;
            let inner = self.query(&field)?;
            self.depth -= 1;
            if self.peek().kind != TokenKind::RParen {
                return Err(self.unexpected("\")\""));
            }
            self.advance();
            return self.optional_boost(inner);
        }

        self.term(&field)
    }

    fn optional_boost(&mut self, node: Node) -> Result<Node, QueryError> {
        if let TokenKind::Boost(number) = &self.peek().kind {
            let position = self.peek().position;
            let boost = number
                .parse::<f32>()
                .map_err(|e| QueryError::syntax(position, format!("Invalid boost: {}", e)))?;
            self.advance();
            return Ok(Node::Boosted(Box::new(node), boost));
        }
        Ok(node)
    }

    fn optional_fuzzy(&mut self) -> Option<String> {
        if let TokenKind::FuzzySlop(slop) = &self.peek().kind {
            let slop = slop.clone();
            self.advance();
            return Some(slop);
        }
        None
    }

    fn term(&mut self, field: &str) -> Result<Node, QueryError> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Term(_)
            | TokenKind::Star
            | TokenKind::PrefixTerm(_)
            | TokenKind::WildTerm(_)
            | TokenKind::Regexp(_)
            | TokenKind::BareOperator(_) => {
                self.advance();
                let mut fuzzy = self.optional_fuzzy();
                let boost = if let TokenKind::Boost(number) = &self.peek().kind {
                    let boost = (number.clone(), self.peek().position);
                    self.advance();
                    if fuzzy.is_none() {
                        fuzzy = self.optional_fuzzy();
                    }
                    Some(boost)
                } else {
                    None
                };
                let kind = bare_token_kind(&token, field, fuzzy)?;
                with_boost(Node::leaf(field, kind), boost)
            }
            TokenKind::Range(range) => {
                self.advance();
                let kind = range_kind(range)?;
                self.optional_boost(Node::leaf(field, kind))
            }
            TokenKind::Quoted(image) => {
                self.advance();
                // A keyword-analyzed phrase is a single term, the slop has no effect.
                let _slop = self.optional_fuzzy();
                let text = discard_escape_char(image, token.position + 1)?;
                self.optional_boost(Node::leaf(field, LeafKind::Term(text)))
            }
            _ => Err(self.unexpected("a term, a quoted string, a range or \"(\"")),
        }
    }
}

fn with_boost(node: Node, boost: Option<(String, usize)>) -> Result<Node, QueryError> {
    match boost {
        Some((number, position)) => {
            let boost = number
                .parse::<f32>()
                .map_err(|e| QueryError::syntax(position, format!("Invalid boost: {}", e)))?;
            Ok(Node::Boosted(Box::new(node), boost))
        }
        None => Ok(node),
    }
}

fn bare_token_kind(
    token: &Token,
    field: &str,
    fuzzy: Option<String>,
) -> Result<LeafKind, QueryError> {
    let kind = match &token.kind {
        TokenKind::Star if field == "*" => LeafKind::MatchAll,
        TokenKind::Star => LeafKind::Wildcard("*".to_string()),
        TokenKind::WildTerm(image) => LeafKind::Wildcard(image.clone()),
        TokenKind::PrefixTerm(image) => {
            let prefix = image.strip_suffix('*').unwrap_or(image);
            LeafKind::Prefix(discard_escape_char(prefix, token.position)?)
        }
        TokenKind::Regexp(image) => LeafKind::Regexp(image.clone()),
        TokenKind::BareOperator(c) => LeafKind::Term(c.to_string()),
        TokenKind::Term(image) => {
            let text = discard_escape_char(image, token.position)?;
            match fuzzy {
                Some(slop) => LeafKind::Fuzzy { term: text, slop },
                None => LeafKind::Term(text),
            }
        }
        other => {
            return Err(QueryError::syntax(
                token.position,
                format!("Encountered {}. Was expecting a term", other),
            ))
        }
    };
    Ok(kind)
}

fn range_bound(bound: &RangeBound) -> Result<Option<String>, QueryError> {
    if !bound.quoted && bound.image == "*" {
        return Ok(None);
    }
    let offset = if bound.quoted {
        bound.position + 1
    } else {
        bound.position
    };
    discard_escape_char(&bound.image, offset).map(Some)
}

fn range_kind(range: &RangeToken) -> Result<LeafKind, QueryError> {
    Ok(LeafKind::Range {
        lower: range_bound(&range.lower)?,
        upper: range_bound(&range.upper)?,
        lower_inclusive: range.lower_inclusive,
        upper_inclusive: range.upper_inclusive,
    })
}

/// Appends a clause, adjusting the previous one for AND conjunctions the way
/// the classic parser does with its default OR operator.
fn add_clause(clauses: &mut Vec<BoolClause>, conj: Conjunction, mods: Modifier, node: Node) {
    if conj == Conjunction::And {
        if let Some(previous) = clauses.last_mut() {
            if previous.occur != Occur::MustNot {
                previous.occur = Occur::Must;
            }
        }
    }

    let prohibited = mods == Modifier::Prohibited;
    let required = mods == Modifier::Required || (conj == Conjunction::And && !prohibited);

    let occur = match (required, prohibited) {
        (_, true) => Occur::MustNot,
        (true, false) => Occur::Must,
        (false, false) => Occur::Should,
    };
    clauses.push(BoolClause::new(occur, node));
}
