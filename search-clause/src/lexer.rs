//! Tokenizer for the Lucene classic query syntax.
//!
//! Positions are character offsets into the query. Range expressions are
//! lexed as a single token since their contents follow different rules.

use crate::errors::QueryError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    And,
    Or,
    Not,
    Plus,
    Minus,
    LParen,
    RParen,
    Colon,
    Star,
    /// `+`, `-` or `!` followed by whitespace, used as a plain term.
    BareOperator(char),
    /// Number following `^`.
    Boost(String),
    /// Text following `~`, possibly empty.
    FuzzySlop(String),
    /// Contents of a quoted string, escapes kept.
    Quoted(String),
    Term(String),
    PrefixTerm(String),
    WildTerm(String),
    Regexp(String),
    Range(RangeToken),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RangeToken {
    pub lower: RangeBound,
    pub upper: RangeBound,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RangeBound {
    pub image: String,
    pub quoted: bool,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::And => write!(f, "\"AND\""),
            TokenKind::Or => write!(f, "\"OR\""),
            TokenKind::Not => write!(f, "\"NOT\""),
            TokenKind::Plus => write!(f, "\"+\""),
            TokenKind::Minus => write!(f, "\"-\""),
            TokenKind::LParen => write!(f, "\"(\""),
            TokenKind::RParen => write!(f, "\")\""),
            TokenKind::Colon => write!(f, "\":\""),
            TokenKind::Star => write!(f, "\"*\""),
            TokenKind::BareOperator(c) => write!(f, "\"{} \"", c),
            TokenKind::Boost(n) => write!(f, "\"^{}\"", n),
            TokenKind::FuzzySlop(s) => write!(f, "\"~{}\"", s),
            TokenKind::Quoted(s) => write!(f, "\"\\\"{}\\\"\"", s),
            TokenKind::Term(s) | TokenKind::PrefixTerm(s) | TokenKind::WildTerm(s) => {
                write!(f, "\"{}\"", s)
            }
            TokenKind::Regexp(s) => write!(f, "\"/{}/\"", s),
            TokenKind::Range(r) => write!(
                f,
                "\"{}{} TO {}{}\"",
                if r.lower_inclusive { '[' } else { '{' },
                r.lower.image,
                r.upper.image,
                if r.upper_inclusive { ']' } else { '}' }
            ),
            TokenKind::Eof => write!(f, "\"<EOF>\""),
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{3000}')
}

fn is_term_start(c: char) -> bool {
    !is_whitespace(c)
        && !matches!(
            c,
            '+' | '-'
                | '!'
                | '('
                | ')'
                | ':'
                | '^'
                | '['
                | ']'
                | '"'
                | '{'
                | '}'
                | '~'
                | '*'
                | '?'
                | '\\'
                | '/'
        )
}

fn is_term_char(c: char) -> bool {
    is_term_start(c) || c == '-' || c == '+'
}

pub(crate) struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(query: &str) -> Self {
        Self {
            chars: query.chars().collect(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, QueryError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
    }

    fn next_token(&mut self) -> Result<Token, QueryError> {
        self.skip_whitespace();
        let start = self.pos;
        let token = |kind| Ok(Token {
            kind,
            position: start,
        });

        let Some(c) = self.peek() else {
            return token(TokenKind::Eof);
        };

        match c {
            '+' | '-' | '!' if self.peek_at(1).map_or(false, is_whitespace) => {
                self.pos += 2;
                token(TokenKind::BareOperator(c))
            }
            '+' => {
                self.pos += 1;
                token(TokenKind::Plus)
            }
            '-' => {
                self.pos += 1;
                token(TokenKind::Minus)
            }
            '!' => {
                self.pos += 1;
                token(TokenKind::Not)
            }
            '(' => {
                self.pos += 1;
                token(TokenKind::LParen)
            }
            ')' => {
                self.pos += 1;
                token(TokenKind::RParen)
            }
            ':' => {
                self.pos += 1;
                token(TokenKind::Colon)
            }
            '^' => {
                self.pos += 1;
                let number = self.read_number()?;
                token(TokenKind::Boost(number))
            }
            '~' => {
                self.pos += 1;
                let slop = self.read_decimal();
                token(TokenKind::FuzzySlop(slop))
            }
            '"' => {
                let content = self.read_delimited('"', "quoted string")?;
                token(TokenKind::Quoted(content))
            }
            '/' => {
                let content = self.read_delimited('/', "regular expression")?;
                token(TokenKind::Regexp(content))
            }
            '[' | '{' => {
                let range = self.read_range()?;
                token(TokenKind::Range(range))
            }
            ']' | '}' => Err(QueryError::syntax(
                start,
                format!("Lexical error: unexpected '{}'", c),
            )),
            _ => {
                let kind = self.read_word()?;
                token(kind)
            }
        }
    }

    fn read_while(&mut self, pred: fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|c| pred(*c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn read_number(&mut self) -> Result<String, QueryError> {
        let number = self.read_decimal();
        if number.is_empty() {
            return Err(QueryError::syntax(
                self.pos,
                "Lexical error: expected a number after '^'",
            ));
        }
        Ok(number)
    }

    /// Digits with an optional fraction, empty if there are no digits.
    fn read_decimal(&mut self) -> String {
        let mut number = self.read_while(|c| c.is_ascii_digit());
        if !number.is_empty()
            && self.peek() == Some('.')
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.pos += 1;
            number.push('.');
            number.push_str(&self.read_while(|c| c.is_ascii_digit()));
        }
        number
    }

    /// Reads from an opening `delim` to the next unescaped `delim`, returning
    /// the contents with escapes preserved.
    fn read_delimited(&mut self, delim: char, what: &str) -> Result<String, QueryError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(QueryError::syntax(
                        start,
                        format!("Lexical error: unterminated {}", what),
                    ))
                }
                Some(c) if c == delim => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some('\\') => {
                    out.push('\\');
                    self.pos += 1;
                    if let Some(escaped) = self.peek() {
                        out.push(escaped);
                        self.pos += 1;
                    }
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn read_word(&mut self) -> Result<TokenKind, QueryError> {
        let start = self.pos;
        let mut image = String::new();
        let mut live_wildcards = Vec::new();

        while let Some(c) = self.peek() {
            if c == '\\' {
                let Some(escaped) = self.peek_at(1) else {
                    return Err(QueryError::syntax(
                        self.pos,
                        "Term can not end with escape character.",
                    ));
                };
                image.push(c);
                image.push(escaped);
                self.pos += 2;
            } else if c == '*' || c == '?' {
                live_wildcards.push((image.chars().count(), c));
                image.push(c);
                self.pos += 1;
            } else if is_term_char(c) {
                image.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }

        if image.is_empty() {
            let c = self.peek().unwrap_or(' ');
            return Err(QueryError::syntax(
                start,
                format!("Lexical error: unexpected '{}'", c),
            ));
        }

        let kind = match image.as_str() {
            "AND" | "&&" => TokenKind::And,
            "OR" | "||" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            "*" => TokenKind::Star,
            _ => {
                let len = image.chars().count();
                match live_wildcards.as_slice() {
                    [] => TokenKind::Term(image),
                    [(idx, '*')] if *idx == len - 1 => TokenKind::PrefixTerm(image),
                    _ => TokenKind::WildTerm(image),
                }
            }
        };
        Ok(kind)
    }

    fn read_range(&mut self) -> Result<RangeToken, QueryError> {
        let start = self.pos;
        let lower_inclusive = self.peek() == Some('[');
        self.pos += 1;

        self.skip_whitespace();
        let lower = self.read_range_bound(start)?;
        self.skip_whitespace();
        let to = self.read_range_bound(start)?;
        if to.quoted || to.image != "TO" {
            return Err(QueryError::syntax(
                to.position,
                format!("Encountered \"{}\". Was expecting \"TO\"", to.image),
            ));
        }
        self.skip_whitespace();
        let upper = self.read_range_bound(start)?;
        self.skip_whitespace();

        let upper_inclusive = match self.peek() {
            Some(']') => true,
            Some('}') => false,
            _ => {
                return Err(QueryError::syntax(
                    self.pos,
                    "Lexical error: expected ']' or '}' to close range",
                ))
            }
        };
        self.pos += 1;

        Ok(RangeToken {
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        })
    }

    fn read_range_bound(&mut self, range_start: usize) -> Result<RangeBound, QueryError> {
        let position = self.pos;
        match self.peek() {
            None => Err(QueryError::syntax(
                range_start,
                "Lexical error: unterminated range",
            )),
            Some('"') => Ok(RangeBound {
                image: self.read_delimited('"', "quoted range bound")?,
                quoted: true,
                position,
            }),
            Some(_) => {
                let image = self.read_while(|c| !is_whitespace(c) && c != ']' && c != '}');
                if image.is_empty() {
                    return Err(QueryError::syntax(
                        position,
                        "Lexical error: empty range bound",
                    ));
                }
                Ok(RangeBound {
                    image,
                    quoted: false,
                    position,
                })
            }
        }
    }
}
