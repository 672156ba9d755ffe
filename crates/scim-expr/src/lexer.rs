//! Tokenizer for filter text.

use scim_schema::{Result, ScimError};
use serde_json::{Number, Value};

/// Filter tokens. Keywords (`and`, `or`, `not`, operators) arrive as
/// [`Token::Word`] and are recognized by the parser, since attribute
/// names and keywords share the same lexical shape.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Word(String),
    Literal(Value),
    LParen,
    RParen,
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{w}'"),
            Token::Literal(v) => v.to_string(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
        }
    }
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            b'(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            b'"' => {
                let end = string_end(input, pos)?;
                let s: String = serde_json::from_str(&input[pos..end]).map_err(|e| {
                    ScimError::invalid_filter(format!("bad string literal at {pos}: {e}"))
                })?;
                tokens.push(Token::Literal(Value::String(s)));
                pos = end;
            }
            b'-' | b'0'..=b'9' => {
                let start = pos;
                while pos < bytes.len() && is_number_byte(bytes[pos]) {
                    pos += 1;
                }
                let n: Number = serde_json::from_str(&input[start..pos]).map_err(|_| {
                    ScimError::invalid_filter(format!(
                        "bad number literal '{}'",
                        &input[start..pos]
                    ))
                })?;
                tokens.push(Token::Literal(Value::Number(n)));
            }
            b'[' | b']' => {
                return Err(ScimError::invalid_filter(
                    "nested value filters are not supported",
                ))
            }
            _ if is_word_start(c) => {
                let start = pos;
                while pos < bytes.len() && is_word_byte(bytes[pos]) {
                    pos += 1;
                }
                let word = &input[start..pos];
                let token = match word.to_ascii_lowercase().as_str() {
                    "true" => Token::Literal(Value::Bool(true)),
                    "false" => Token::Literal(Value::Bool(false)),
                    "null" => Token::Literal(Value::Null),
                    _ => Token::Word(word.to_string()),
                };
                tokens.push(token);
            }
            _ => {
                return Err(ScimError::invalid_filter(format!(
                    "unexpected character {:?} at {pos}",
                    char::from(c)
                )))
            }
        }
    }

    Ok(tokens)
}

/// Byte offset one past the closing quote of the string starting at `start`.
fn string_end(input: &str, start: usize) -> Result<usize> {
    let bytes = input.as_bytes();
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
    Err(ScimError::invalid_filter(format!(
        "unterminated string starting at {start}"
    )))
}

fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'$' | b'_')
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'$' | b'_' | b'-' | b'.' | b':')
}
