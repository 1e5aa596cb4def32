//! ASON text → [`Value`].
//!
//! ASON is JSON plus two infix operators, `|` (union) and `&`
//! (intersection), parenthesized grouping, bare identifiers (variables) and
//! the contradiction literal `empty`. The input is tokenized up front and
//! then read by a precedence-climbing parser, so operator precedence is a
//! table lookup and can be switched through [`ParseOptions`].
//!
//! ```text
//! expr    := primary (op primary)*
//! op      := "|" | "&"
//! primary := null | true | false | empty | number | string
//!          | "[" (expr ("," expr)*)? "]"
//!          | "{" (string ":" expr ("," string ":" expr)*)? "}"
//!          | "(" expr ")"
//!          | identifier
//! ```
//!
//! Chains of the same operator are collected into one n-ary node, so
//! `1 | 2 | 3` is a single three-member union.

use crate::config::{IdentifierMode, Precedence};
use crate::error::{ParseError, ParseErrorKind, Position};
use crate::number::Number;
use crate::value::{ObjectMap, Value, WILDCARD};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Options controlling how text is read.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub precedence: Precedence,
    pub identifiers: IdentifierMode,
    /// Maximum nesting of lists, objects and parentheses.
    pub max_depth: usize,
    /// Values substituted for identifiers under [`IdentifierMode::Bindings`]
    /// and [`IdentifierMode::BindingsOnly`].
    pub bindings: BTreeMap<String, Value>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            precedence: Precedence::default(),
            identifiers: IdentifierMode::default(),
            max_depth: 128,
            bindings: BTreeMap::new(),
        }
    }
}

impl ParseOptions {
    /// Add an identifier binding and switch to [`IdentifierMode::Bindings`]
    /// unless a binding mode is already selected.
    pub fn with_binding(mut self, name: impl Into<String>, value: Value) -> Self {
        if self.identifiers == IdentifierMode::Variables {
            self.identifiers = IdentifierMode::Bindings;
        }
        self.bindings.insert(name.into(), value);
        self
    }
}

/// Parse ASON text with the default options.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    parse_with(text, &ParseOptions::default())
}

/// Parse ASON text. The whole input must form one expression.
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let tokens = Lexer::new(text).tokenize()?;
    tracing::trace!(tokens = tokens.len(), "tokenized ASON input");
    let mut parser = Parser {
        tokens,
        index: 0,
        end: end_position(text),
        options,
    };
    let value = parser.parse_expr(0, 0)?;
    if let Some(tok) = parser.peek() {
        return Err(ParseError {
            kind: ParseErrorKind::TrailingInput,
            position: tok.position,
        });
    }
    Ok(value)
}

fn end_position(text: &str) -> Position {
    let mut pos = Position::start();
    for ch in text.chars() {
        advance_position(&mut pos, ch);
    }
    pos
}

fn advance_position(pos: &mut Position, ch: char) {
    pos.offset += ch.len_utf8();
    if ch == '\n' {
        pos.line += 1;
        pos.column = 1;
    } else {
        pos.column += 1;
    }
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    Pipe,
    Amp,
    String(String),
    Number(Number),
    Ident(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Amp => "'&'".to_string(),
            Token::String(_) => "string".to_string(),
            Token::Number(n) => format!("number {n}"),
            Token::Ident(name) => format!("identifier '{name}'"),
        }
    }
}

#[derive(Debug, Clone)]
struct SpannedToken {
    token: Token,
    position: Position,
}

struct Lexer<'a> {
    src: &'a str,
    pos: Position,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: Position::start(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        advance_position(&mut self.pos, ch);
        Some(ch)
    }

    fn error(&self, kind: ParseErrorKind, position: Position) -> ParseError {
        ParseError { kind, position }
    }

    fn tokenize(mut self) -> Result<Vec<SpannedToken>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.peek() {
            let position = self.pos;
            let token = match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                    continue;
                }
                '{' => self.single(Token::LBrace),
                '}' => self.single(Token::RBrace),
                '[' => self.single(Token::LBracket),
                ']' => self.single(Token::RBracket),
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                ',' => self.single(Token::Comma),
                ':' => self.single(Token::Colon),
                '|' => self.single(Token::Pipe),
                '&' => self.single(Token::Amp),
                '!' => {
                    return Err(self.error(ParseErrorKind::UnsupportedComplement, position));
                }
                '"' => Token::String(self.string()?),
                '-' | '0'..='9' => Token::Number(self.number()?),
                c if c.is_ascii_alphabetic() || c == '_' => Token::Ident(self.identifier()),
                other => {
                    return Err(self.error(
                        ParseErrorKind::UnexpectedToken(format!("character '{other}'")),
                        position,
                    ))
                }
            };
            tokens.push(SpannedToken { token, position });
        }
        Ok(tokens)
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn identifier(&mut self) -> String {
        let start = self.pos.offset;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        self.src[start..self.pos.offset].to_string()
    }

    /// Scan the longest run of number-literal characters, then validate it.
    fn number(&mut self) -> Result<Number, ParseError> {
        let position = self.pos;
        let start = self.pos.offset;
        while matches!(
            self.peek(),
            Some('0'..='9' | '-' | '+' | '.' | 'e' | 'E')
        ) {
            self.bump();
        }
        let literal = &self.src[start..self.pos.offset];
        Number::parse_literal(literal).ok_or_else(|| {
            self.error(ParseErrorKind::InvalidNumber(literal.to_string()), position)
        })
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let open = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            let here = self.pos;
            match self.bump() {
                None => return Err(self.error(ParseErrorKind::UnterminatedString, open)),
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.escape(here)?),
                Some(c) if (c as u32) < 0x20 => {
                    return Err(self.error(
                        ParseErrorKind::UnexpectedToken("control character in string".to_string()),
                        here,
                    ))
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, start: Position) -> Result<char, ParseError> {
        let ch = match self.bump() {
            None => return Err(self.error(ParseErrorKind::UnterminatedString, start)),
            Some(c) => c,
        };
        match ch {
            '"' => Ok('"'),
            '\\' => Ok('\\'),
            '/' => Ok('/'),
            'b' => Ok('\u{0008}'),
            'f' => Ok('\u{000C}'),
            'n' => Ok('\n'),
            'r' => Ok('\r'),
            't' => Ok('\t'),
            'u' => {
                let high = self.hex4(start)?;
                if (0xD800..0xDC00).contains(&high) {
                    // High surrogate: a low surrogate escape must follow.
                    if self.bump() != Some('\\') || self.bump() != Some('u') {
                        return Err(self.error(ParseErrorKind::InvalidEscape, start));
                    }
                    let low = self.hex4(start)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(self.error(ParseErrorKind::InvalidEscape, start));
                    }
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(code)
                        .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape, start))
                } else {
                    char::from_u32(high)
                        .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape, start))
                }
            }
            _ => Err(self.error(ParseErrorKind::InvalidEscape, start)),
        }
    }

    fn hex4(&mut self, start: Position) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = match self.bump() {
                None => return Err(self.error(ParseErrorKind::UnterminatedString, start)),
                Some(c) => c
                    .to_digit(16)
                    .ok_or_else(|| self.error(ParseErrorKind::InvalidEscape, start))?,
            };
            code = code * 16 + digit;
        }
        Ok(code)
    }
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Union,
    Intersection,
}

impl Op {
    fn build(self, operands: Vec<Value>) -> Value {
        match self {
            Op::Union => Value::Union(Arc::from(operands)),
            Op::Intersection => Value::Intersection(Arc::from(operands)),
        }
    }
}

/// Left and right binding power of an operator. The right power is one
/// above the left, so equal operators group to the left.
fn binding_power(op: Op, precedence: Precedence) -> (u8, u8) {
    let left = match (precedence, op) {
        (Precedence::IntersectionFirst, Op::Union) => 1,
        (Precedence::IntersectionFirst, Op::Intersection) => 3,
        (Precedence::UnionFirst, Op::Intersection) => 1,
        (Precedence::UnionFirst, Op::Union) => 3,
        (Precedence::LeftToRight, _) => 1,
    };
    (left, left + 1)
}

struct Parser<'o> {
    tokens: Vec<SpannedToken>,
    index: usize,
    end: Position,
    options: &'o ParseOptions,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Result<SpannedToken, ParseError> {
        let tok = self.tokens.get(self.index).cloned().ok_or(ParseError {
            kind: ParseErrorKind::UnexpectedEnd,
            position: self.end,
        })?;
        self.index += 1;
        Ok(tok)
    }

    fn unexpected(tok: &SpannedToken) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedToken(tok.token.describe()),
            position: tok.position,
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        let tok = self.next()?;
        if &tok.token == expected {
            Ok(())
        } else {
            Err(Self::unexpected(&tok))
        }
    }

    fn peek_op(&self) -> Option<Op> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Pipe) => Some(Op::Union),
            Some(Token::Amp) => Some(Op::Intersection),
            _ => None,
        }
    }

    fn parse_expr(&mut self, min_bp: u8, depth: usize) -> Result<Value, ParseError> {
        let mut operands = vec![self.parse_primary(depth)?];
        let mut chain: Option<Op> = None;

        while let Some(op) = self.peek_op() {
            let (left_bp, right_bp) = binding_power(op, self.options.precedence);
            if left_bp < min_bp {
                break;
            }
            if let Some(current) = chain {
                if current != op {
                    let grouped = current.build(std::mem::take(&mut operands));
                    operands.push(grouped);
                }
            }
            chain = Some(op);
            self.index += 1;
            operands.push(self.parse_expr(right_bp, depth)?);
        }

        match chain {
            Some(op) => Ok(op.build(operands)),
            None => Ok(operands.swap_remove(0)),
        }
    }

    fn parse_primary(&mut self, depth: usize) -> Result<Value, ParseError> {
        let tok = self.next()?;
        match tok.token {
            Token::Number(n) => Ok(Value::Number(n)),
            Token::String(s) => Ok(Value::string(s)),
            Token::Ident(name) => self.identifier(name, tok.position),
            Token::LBracket => {
                self.enter(depth, tok.position)?;
                self.parse_list(depth + 1)
            }
            Token::LBrace => {
                self.enter(depth, tok.position)?;
                self.parse_object(depth + 1)
            }
            Token::LParen => {
                self.enter(depth, tok.position)?;
                let inner = self.parse_expr(0, depth + 1)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            _ => Err(Self::unexpected(&tok)),
        }
    }

    fn enter(&self, depth: usize, position: Position) -> Result<(), ParseError> {
        if depth >= self.options.max_depth {
            return Err(ParseError {
                kind: ParseErrorKind::NestingTooDeep,
                position,
            });
        }
        Ok(())
    }

    fn identifier(&self, name: String, position: Position) -> Result<Value, ParseError> {
        match name.as_str() {
            "null" => return Ok(Value::Null),
            "true" => return Ok(Value::Boolean(true)),
            "false" => return Ok(Value::Boolean(false)),
            "empty" => return Ok(Value::empty()),
            WILDCARD => return Ok(Value::wildcard()),
            _ => {}
        }
        match self.options.identifiers {
            IdentifierMode::Variables => Ok(Value::variable(name)),
            IdentifierMode::Bindings => Ok(self
                .options
                .bindings
                .get(&name)
                .cloned()
                .unwrap_or_else(|| Value::variable(&name))),
            IdentifierMode::BindingsOnly => {
                self.options.bindings.get(&name).cloned().ok_or(ParseError {
                    kind: ParseErrorKind::UnknownIdentifier(name),
                    position,
                })
            }
        }
    }

    fn parse_list(&mut self, depth: usize) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        if self.peek().map(|t| &t.token) == Some(&Token::RBracket) {
            self.index += 1;
            return Ok(Value::List(Arc::from(items)));
        }
        loop {
            items.push(self.parse_expr(0, depth)?);
            let tok = self.next()?;
            match tok.token {
                Token::Comma => continue,
                Token::RBracket => break,
                _ => return Err(Self::unexpected(&tok)),
            }
        }
        Ok(Value::List(Arc::from(items)))
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, ParseError> {
        let mut map = ObjectMap::new();
        if self.peek().map(|t| &t.token) == Some(&Token::RBrace) {
            self.index += 1;
            return Ok(Value::Object(Arc::new(map)));
        }
        loop {
            let tok = self.next()?;
            let key = match tok.token {
                Token::String(key) => key,
                _ => return Err(Self::unexpected(&tok)),
            };
            self.expect(&Token::Colon)?;
            let value = self.parse_expr(0, depth)?;
            map.insert(Arc::from(key), value);

            let tok = self.next()?;
            match tok.token {
                Token::Comma => continue,
                Token::RBrace => break,
                _ => return Err(Self::unexpected(&tok)),
            }
        }
        Ok(Value::Object(Arc::new(map)))
    }
}
