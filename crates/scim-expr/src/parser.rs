//! Recursive-descent filter parser.
//!
//! Precedence, loosest first:
//! - `or`
//! - `and`
//! - `not ( ... )`, `( ... )`, `attrPath op value`, `attrPath pr`

use scim_schema::{Result, ScimError};

use crate::filter::{AttrPath, CompareOp, Filter};
use crate::lexer::{tokenize, Token};

/// Compile filter text such as `type eq "work" and primary eq true`.
pub fn compile_filter(text: &str) -> Result<Filter> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ScimError::invalid_filter("empty filter"));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let filter = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(ScimError::invalid_filter(format!(
            "unexpected {} after end of filter",
            extra.describe()
        )));
    }
    Ok(filter)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.advance() {
            Some(ref t) if t == expected => Ok(()),
            Some(t) => Err(ScimError::invalid_filter(format!(
                "expected {}, found {}",
                expected.describe(),
                t.describe()
            ))),
            None => Err(ScimError::invalid_filter(format!(
                "unexpected end of filter, expected {}",
                expected.describe()
            ))),
        }
    }

    fn parse_or(&mut self) -> Result<Filter> {
        let mut left = self.parse_and()?;
        while self.check_keyword("or") {
            self.advance();
            let right = self.parse_and()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Filter> {
        let mut left = self.parse_unary()?;
        while self.check_keyword("and") {
            self.advance();
            let right = self.parse_unary()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Filter> {
        if self.check_keyword("not") {
            self.advance();
            self.expect(&Token::LParen)?;
            let inner = self.parse_or()?;
            self.expect(&Token::RParen)?;
            return Ok(inner.negate());
        }

        match self.advance() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Word(word)) => self.parse_comparison(&word),
            Some(t) => Err(ScimError::invalid_filter(format!(
                "expected attribute path, found {}",
                t.describe()
            ))),
            None => Err(ScimError::invalid_filter(
                "unexpected end of filter, expected attribute path",
            )),
        }
    }

    fn parse_comparison(&mut self, attr: &str) -> Result<Filter> {
        let path = attr_path(attr)?;
        let op = match self.advance() {
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("pr") => {
                return Ok(Filter::Present(path));
            }
            Some(Token::Word(w)) => CompareOp::from_keyword(&w).ok_or_else(|| {
                ScimError::invalid_filter(format!("unknown operator '{w}'"))
            })?,
            Some(t) => {
                return Err(ScimError::invalid_filter(format!(
                    "expected operator after '{attr}', found {}",
                    t.describe()
                )))
            }
            None => {
                return Err(ScimError::invalid_filter(format!(
                    "expected operator after '{attr}'"
                )))
            }
        };

        match self.advance() {
            Some(Token::Literal(value)) => Ok(Filter::compare(path, op, value)),
            Some(t) => Err(ScimError::invalid_filter(format!(
                "expected value after '{attr} {op}', found {}",
                t.describe()
            ))),
            None => Err(ScimError::invalid_filter(format!(
                "expected value after '{attr} {op}'"
            ))),
        }
    }
}

/// Split an operand into segments, dropping any schema URN prefix since
/// operands are resolved relative to the element under test.
fn attr_path(word: &str) -> Result<AttrPath> {
    let local = if word.len() > 4 && word[..4].eq_ignore_ascii_case("urn:") {
        match word.rfind(':') {
            Some(idx) => &word[idx + 1..],
            None => word,
        }
    } else {
        word
    };

    let segments: Vec<String> = local.split('.').map(str::to_string).collect();
    if segments.iter().any(|s| s.is_empty() || s.contains(':')) {
        return Err(ScimError::invalid_filter(format!(
            "invalid attribute path '{word}'"
        )));
    }
    Ok(AttrPath::new(segments))
}
