//! Reader for the structured literals accepted as command arguments.
//!
//! Accepts mappings, lists, single- or double-quoted strings, integers,
//! floats and the constants `True`/`False`/`None` (JSON `true`/`false`/`null`
//! are accepted too). Values come back as [`serde_json::Value`].
//!
//! The text is lexed with [`logos`] and the token stream is read by recursive
//! descent.

use std::ops::Range;

use logos::{Lexer, Logos};
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid literal at offset {offset}: {message}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum Token {
    #[error]
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    Error,

    #[token("{")]
    OpenMapping,

    #[token("}")]
    CloseMapping,

    #[token("[")]
    OpenList,

    #[token("]")]
    CloseList,

    #[token(":")]
    KeySeparator,

    #[token(",")]
    ItemSeparator,

    #[token("True")]
    #[token("true")]
    True,

    #[token("False")]
    #[token("false")]
    False,

    #[token("None")]
    #[token("null")]
    Null,

    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    #[regex(r#"'([^'\\]|\\.)*'"#, unquote)]
    Str(String),

    #[regex(r"[-+]?[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<i64>().ok())]
    Int(i64),

    #[regex(r"[-+]?([0-9][0-9_]*)?\.[0-9][0-9_]*([eE][-+]?[0-9]+)?", float)]
    #[regex(r"[-+]?[0-9][0-9_]*\.([eE][-+]?[0-9]+)?", float)]
    #[regex(r"[-+]?[0-9][0-9_]*[eE][-+]?[0-9]+", float)]
    Float(f64),
}

/// Strip the quotes from a string token and resolve its escapes.
fn unquote(lex: &mut Lexer<Token>) -> String {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(c) => {
                out.push('\\');
                out.push(c);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn float(lex: &mut Lexer<Token>) -> Option<f64> {
    lex.slice()
        .replace('_', "")
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}

/// Read `text` as a single literal. Surrounding whitespace is allowed.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(text);
    while let Some(token) = lexer.next() {
        if token == Token::Error {
            return Err(LiteralError {
                offset: lexer.span().start,
                message: format!("unexpected '{}'", lexer.slice()),
            });
        }
        tokens.push((token, lexer.span()));
    }

    let mut reader = Reader {
        tokens: &tokens,
        pos: 0,
        end: text.len(),
    };
    let value = reader.value()?;
    if reader.pos < tokens.len() {
        return Err(reader.error("unexpected trailing characters"));
    }
    Ok(value)
}

/// Read `text` as a mapping literal, or `None` if it is anything else.
pub fn parse_mapping(text: &str) -> Option<Map<String, Value>> {
    match parse_literal(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Read `text` as a list literal, or `None` if it is anything else.
pub fn parse_list(text: &str) -> Option<Vec<Value>> {
    match parse_literal(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

struct Reader<'a> {
    tokens: &'a [(Token, Range<usize>)],
    pos: usize,
    end: usize,
}

impl Reader<'_> {
    fn error(&self, message: &str) -> LiteralError {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.end, |(_, span)| span.start);
        LiteralError {
            offset,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error("unexpected end of input"));
        };
        let value = match token {
            Token::OpenMapping => return self.mapping(),
            Token::OpenList => return self.list(),
            Token::Str(s) => Value::String(s),
            Token::Int(i) => Value::from(i),
            Token::Float(f) => Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| self.error("invalid number"))?,
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Null => Value::Null,
            _ => return Err(self.error("expected a value")),
        };
        self.pos += 1;
        Ok(value)
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1;
        let mut map = Map::new();
        loop {
            if self.peek() == Some(&Token::CloseMapping) {
                self.pos += 1;
                return Ok(Value::Object(map));
            }
            let key = match self.peek() {
                Some(Token::Str(key)) => key.clone(),
                _ => return Err(self.error("mapping keys must be strings")),
            };
            self.pos += 1;
            if self.peek() != Some(&Token::KeySeparator) {
                return Err(self.error("expected ':'"));
            }
            self.pos += 1;
            let value = self.value()?;
            map.insert(key, value);
            if !self.separator(Token::CloseMapping)? {
                return Ok(Value::Object(map));
            }
        }
    }

    fn list(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(&Token::CloseList) {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            if !self.separator(Token::CloseList)? {
                return Ok(Value::Array(items));
            }
        }
    }

    /// Consume the token after an element. Returns `true` after a `,` and
    /// `false` after the closing delimiter.
    fn separator(&mut self, close: Token) -> Result<bool, LiteralError> {
        match self.peek() {
            Some(Token::ItemSeparator) => {
                self.pos += 1;
                Ok(true)
            }
            Some(token) if *token == close => {
                self.pos += 1;
                Ok(false)
            }
            _ => Err(self.error("expected ',' or a closing delimiter")),
        }
    }
}
