//! Lexer and recursive-descent parser for expressions.
//!
//! Positions reported in [`ParseError`] are 0-indexed character offsets.

use super::{Anchor, Expression, OtherGrouping, OtherProperty, Operator, PropertyPath, Reference, Term};
use thiserror::Error;

/// Maximum supported nesting depth of parenthesised groups.
const MAX_NESTING: usize = 64;

/// Error produced when an expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// Character offset into the input
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

pub(super) fn parse(input: &str) -> Result<Expression, ParseError> {
    let tokens = Lexer::new(input).lex()?;
    let mut parser = Parser { tokens, index: 0 };
    if parser.current().token == Token::Eof {
        return Ok(Expression::new());
    }
    let expression = parser.parse_expression(0)?;
    let end = parser.current();
    match end.token {
        Token::Eof => Ok(expression),
        _ => Err(ParseError::new("unexpected ')'", end.position)),
    }
}

/// Whether a character must be backslash-escaped when printing a name.
pub(super) fn needs_escape(c: char, first: bool) -> bool {
    is_terminator(c) || c == '\\' || c == '.' || (first && matches!(c, '~' | '/'))
}

fn is_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '&' | '|' | '^' | '!' | '\'' | '"')
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Not,
    Op(Operator),
    Reference(Reference),
    Eof,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    position: usize,
}

struct Lexer {
    chars: Vec<char>,
    offset: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            offset: 0,
        }
    }

    fn lex(mut self) -> Result<Vec<Spanned>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            while self.peek().map_or(false, char::is_whitespace) {
                self.offset += 1;
            }
            let start = self.offset;
            let Some(c) = self.peek() else {
                tokens.push(Spanned {
                    token: Token::Eof,
                    position: start,
                });
                return Ok(tokens);
            };
            let token = match c {
                '(' => {
                    self.offset += 1;
                    Token::LParen
                }
                ')' => {
                    self.offset += 1;
                    Token::RParen
                }
                '!' => {
                    self.offset += 1;
                    Token::Not
                }
                '&' | '|' | '^' => {
                    if self.peek_at(1) != Some(c) {
                        return Err(ParseError::new(format!("expected '{c}{c}'"), start));
                    }
                    self.offset += 2;
                    Token::Op(match c {
                        '&' => Operator::And,
                        '|' => Operator::Or,
                        _ => Operator::Xor,
                    })
                }
                '~' => {
                    self.offset += 1;
                    let token = match self.peek() {
                        Some(quote @ ('\'' | '"')) => self.read_quoted(quote)?,
                        _ => {
                            let token = self.read_bare(false)?;
                            if token.is_empty() {
                                return Err(ParseError::new("expected condition name", self.offset));
                            }
                            token
                        }
                    };
                    Token::Reference(Reference::Condition(token))
                }
                _ => Token::Reference(Reference::Property(self.read_path()?)),
            };
            tokens.push(Spanned {
                token,
                position: start,
            });
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.offset + ahead).copied()
    }

    fn read_path(&mut self) -> Result<PropertyPath, ParseError> {
        let anchor = if self.peek() == Some('/') && self.peek_at(1) == Some('.') {
            self.offset += 2;
            if self.peek() == Some('.') {
                return Err(ParseError::new("unexpected '.' after root anchor", self.offset));
            }
            Anchor::Root
        } else {
            let mut levels = 0;
            while self.peek() == Some('.') {
                levels += 1;
                self.offset += 1;
            }
            if levels == 0 {
                Anchor::Current
            } else {
                Anchor::Up(levels)
            }
        };

        // `.` and `/.` alone refer to the anchor object itself
        let anchor_only = self
            .peek()
            .map_or(true, |c| is_terminator(c) && !matches!(c, '\'' | '"'));
        if anchor != Anchor::Current && anchor_only {
            return Ok(PropertyPath {
                anchor,
                names: Vec::new(),
            });
        }

        let mut names = Vec::new();
        loop {
            let segment_start = self.offset;
            let name = match self.peek() {
                Some(quote @ ('\'' | '"')) => self.read_quoted(quote)?,
                _ => {
                    let name = self.read_bare(true)?;
                    if name.is_empty() {
                        return Err(ParseError::new("expected property name", segment_start));
                    }
                    name
                }
            };
            names.push(name);
            if self.peek() == Some('.') {
                self.offset += 1;
            } else {
                break;
            }
        }
        Ok(PropertyPath { anchor, names })
    }

    // Unquoted name; a backslash takes the next character literally
    fn read_bare(&mut self, stop_at_dot: bool) -> Result<String, ParseError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                let escape_at = self.offset;
                self.offset += 1;
                let Some(escaped) = self.peek() else {
                    return Err(ParseError::new("dangling escape", escape_at));
                };
                name.push(escaped);
                self.offset += 1;
                continue;
            }
            if is_terminator(c) || (stop_at_dot && c == '.') {
                break;
            }
            name.push(c);
            self.offset += 1;
        }
        Ok(name)
    }

    fn read_quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let open = self.offset;
        self.offset += 1;
        let mut name = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::new("unterminated quoted name", open)),
                Some('\\') => {
                    self.offset += 1;
                    let Some(escaped) = self.peek() else {
                        return Err(ParseError::new("unterminated quoted name", open));
                    };
                    name.push(escaped);
                    self.offset += 1;
                }
                Some(c) if c == quote => {
                    self.offset += 1;
                    return Ok(name);
                }
                Some(c) => {
                    name.push(c);
                    self.offset += 1;
                }
            }
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser {
    tokens: Vec<Spanned>,
    index: usize,
}

impl Parser {
    fn current(&self) -> &Spanned {
        // the lexer always terminates the stream with Eof
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    fn parse_expression(&mut self, depth: usize) -> Result<Expression, ParseError> {
        let mut expression = Expression::new();
        let first = self.parse_term(depth)?;
        expression.push_term(Operator::And, first);
        loop {
            let current = self.current();
            match current.token {
                Token::Op(op) => {
                    self.advance();
                    let term = self.parse_term(depth)?;
                    expression.push_term(op, term);
                }
                Token::RParen | Token::Eof => return Ok(expression),
                _ => return Err(ParseError::new("expected operator", current.position)),
            }
        }
    }

    fn parse_term(&mut self, depth: usize) -> Result<Term, ParseError> {
        let mut not = false;
        while self.current().token == Token::Not {
            not = !not;
            self.advance();
        }
        let Spanned { token, position } = self.current().clone();
        let mut term = match token {
            Token::Reference(reference) => {
                self.advance();
                Term::Property(OtherProperty {
                    op: Operator::And,
                    not: false,
                    reference,
                })
            }
            Token::LParen => {
                if depth >= MAX_NESTING {
                    return Err(ParseError::new("expression nesting too deep", position));
                }
                self.advance();
                if self.current().token == Token::RParen {
                    return Err(ParseError::new("empty group", position));
                }
                let inner = self.parse_expression(depth + 1)?;
                if self.current().token != Token::RParen {
                    return Err(ParseError::new("unclosed '('", position));
                }
                self.advance();
                Term::Grouping(OtherGrouping::new(inner))
            }
            Token::RParen => return Err(ParseError::new("unexpected ')'", position)),
            Token::Eof => return Err(ParseError::new("unexpected end of expression", position)),
            Token::Op(op) => {
                return Err(ParseError::new(format!("unexpected operator '{op}'"), position))
            }
            Token::Not => return Err(ParseError::new("unexpected '!'", position)),
        };
        if not {
            term.negate();
        }
        Ok(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn err(input: &str) -> ParseError {
        parse(input).unwrap_err()
    }

    #[test]
    fn parses_mixed_quoting_and_groups() {
        let expr = parse("(foo&&'bar') || (\"foo\"&& baz) || (bar && baz) && !(foo && bar && baz)")
            .unwrap();
        assert_eq!(expr.len(), 4);

        let conds = HashSet::new();
        let mut obj = json!({"foo": "x"});
        assert!(!expr.evaluate(&obj, &[], &conds));
        obj["bar"] = json!("x");
        assert!(expr.evaluate(&obj, &[], &conds));
        obj["baz"] = json!("x");
        assert!(!expr.evaluate(&obj, &[], &conds));
    }

    #[test]
    fn parses_paths() {
        let expr = parse(r"..foo.bar && /.root && 'a.b'.c && x\.y").unwrap();
        let paths: Vec<_> = expr
            .terms()
            .iter()
            .map(|t| match t {
                Term::Property(OtherProperty {
                    reference: Reference::Property(p),
                    ..
                }) => p.clone(),
                other => panic!("unexpected term {other:?}"),
            })
            .collect();
        assert_eq!(paths[0].anchor, Anchor::Up(2));
        assert_eq!(paths[0].names, vec!["foo", "bar"]);
        assert_eq!(paths[1].anchor, Anchor::Root);
        assert_eq!(paths[2].names, vec!["a.b", "c"]);
        assert_eq!(paths[3].names, vec!["x.y"]);
    }

    #[test]
    fn slash_before_escaped_dot_is_literal() {
        let expr = parse(r"/\.foo").unwrap();
        match &expr.terms()[0] {
            Term::Property(OtherProperty {
                reference: Reference::Property(p),
                ..
            }) => {
                assert_eq!(p.anchor, Anchor::Current);
                assert_eq!(p.names, vec!["/.foo"]);
            }
            other => panic!("unexpected term {other:?}"),
        }
        assert_eq!(parse(&expr.to_string()).unwrap(), expr);
    }

    #[test]
    fn quoted_conditions_and_bare_anchors() {
        let expr = parse("~'' || ~\"a b\" || . || /. && ..").unwrap();
        let refs: Vec<_> = expr
            .terms()
            .iter()
            .map(|t| match t {
                Term::Property(p) => p.reference.clone(),
                other => panic!("unexpected term {other:?}"),
            })
            .collect();
        assert_eq!(refs[0], Reference::Condition(String::new()));
        assert_eq!(refs[1], Reference::Condition("a b".into()));
        let anchors = [Anchor::Up(1), Anchor::Root, Anchor::Up(2)];
        for (reference, anchor) in refs[2..].iter().zip(anchors) {
            assert_eq!(
                reference,
                &Reference::Property(PropertyPath {
                    anchor,
                    names: Vec::new(),
                })
            );
        }
        assert_eq!(parse(&expr.to_string()).unwrap(), expr);
    }

    #[test]
    fn double_negation_cancels() {
        assert_eq!(parse("!!foo").unwrap(), parse("foo").unwrap());
    }

    #[test]
    fn error_positions() {
        assert_eq!(err("foo &"), ParseError::new("expected '&&'", 4));
        assert_eq!(err("foo bar"), ParseError::new("expected operator", 4));
        assert_eq!(err("(foo"), ParseError::new("unclosed '('", 0));
        assert_eq!(err("foo)"), ParseError::new("unexpected ')'", 3));
        assert_eq!(err("foo &&"), ParseError::new("unexpected end of expression", 6));
        assert_eq!(err("&& foo"), ParseError::new("unexpected operator '&&'", 0));
        assert_eq!(err("a || ()"), ParseError::new("empty group", 5));
        assert_eq!(err("'abc"), ParseError::new("unterminated quoted name", 0));
        assert_eq!(err("foo."), ParseError::new("expected property name", 4));
        assert_eq!(err("~ && a"), ParseError::new("expected condition name", 1));
        assert_eq!(err("~'a"), ParseError::new("unterminated quoted name", 1));
        assert_eq!(err(r"foo\"), ParseError::new("dangling escape", 3));
        assert_eq!(err("foo !"), ParseError::new("expected operator", 4));
    }

    #[test]
    fn positions_count_characters() {
        assert_eq!(err("ü && é &"), ParseError::new("expected '&&'", 7));
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}a{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert_eq!(err(&deep).message, "expression nesting too deep");
        let ok = format!("{}a{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse(&ok).is_ok());
    }

    #[test]
    fn error_display() {
        assert_eq!(err("foo bar").to_string(), "expected operator at position 4");
    }
}
