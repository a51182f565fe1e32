//! Restricted arithmetic for beat positions.
//!
//! Clients may send a beat position either as a JSON number or as an
//! expression string such as `"9 + 1/3"`. Expressions are evaluated over
//! exact rationals so that `1/3` survives tick conversion without drift:
//! `(9 + 1/3) * 480` is exactly `4480`.
//!
//! Grammar (whitespace insignificant):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := number | '(' expr ')' | ('+'|'-') factor
//! number  := digits ('.' digits)?
//! ```
//!
//! Division by zero, overflow, and unrecognized tokens all surface as
//! `MalformedExpression`. Negative results are legal here; callers that
//! need a non-negative beat reject them at the call site.

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// A beat quantity as authored by the client.
///
/// The authored form is part of the document: a note added with
/// `start: "9 + 1/3"` reads back with the string intact. Evaluation happens
/// wherever a numeric value is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BeatValue {
    Number(f64),
    Expression(String),
}

impl BeatValue {
    /// Evaluate to an exact rational number of beats.
    pub fn eval(&self) -> Result<Rational64, ScoreError> {
        match self {
            BeatValue::Number(n) => rational_from_f64(*n),
            BeatValue::Expression(expr) => eval_expression(expr),
        }
    }

    /// Evaluate and collapse to `f64`, for range comparisons.
    pub fn eval_f64(&self) -> Result<f64, ScoreError> {
        let r = self.eval()?;
        r.to_f64().ok_or_else(|| ScoreError::MalformedExpression {
            expr: self.to_string(),
            reason: "value does not fit in a float".into(),
        })
    }
}

impl std::fmt::Display for BeatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeatValue::Number(n) => write!(f, "{}", n),
            BeatValue::Expression(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for BeatValue {
    fn from(n: f64) -> Self {
        BeatValue::Number(n)
    }
}

impl From<&str> for BeatValue {
    fn from(s: &str) -> Self {
        BeatValue::Expression(s.to_string())
    }
}

/// Convert an f64 (from a JSON number) to a rational approximation.
fn rational_from_f64(n: f64) -> Result<Rational64, ScoreError> {
    if !n.is_finite() {
        return Err(ScoreError::MalformedExpression {
            expr: n.to_string(),
            reason: "not a finite number".into(),
        });
    }
    Rational64::approximate_float(n).ok_or_else(|| ScoreError::MalformedExpression {
        expr: n.to_string(),
        reason: "number out of rational range".into(),
    })
}

/// Evaluate an expression string to an exact rational.
pub fn eval_expression(src: &str) -> Result<Rational64, ScoreError> {
    let mut parser = Parser {
        src,
        bytes: src.as_bytes(),
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(parser.fail("trailing input after expression"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn fail(&self, reason: impl Into<String>) -> ScoreError {
        ScoreError::MalformedExpression {
            expr: self.src.to_string(),
            reason: reason.into(),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes.get(self.pos).copied()
    }

    fn expr(&mut self) -> Result<Rational64, ScoreError> {
        let mut acc = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            acc = match op {
                b'+' => acc.checked_add(&rhs),
                _ => acc.checked_sub(&rhs),
            }
            .ok_or_else(|| self.fail("arithmetic overflow"))?;
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Rational64, ScoreError> {
        let mut acc = self.factor()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            acc = match op {
                b'*' => acc.checked_mul(&rhs),
                _ => acc.checked_div(&rhs),
            }
            .ok_or_else(|| {
                if rhs == Rational64::from_integer(0) {
                    self.fail("division by zero")
                } else {
                    self.fail("arithmetic overflow")
                }
            })?;
        }
        Ok(acc)
    }

    fn factor(&mut self) -> Result<Rational64, ScoreError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                let inner = self.expr()?;
                if self.peek() != Some(b')') {
                    return Err(self.fail("expected ')'"));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(b'+') => {
                self.pos += 1;
                self.factor()
            }
            Some(b'-') => {
                self.pos += 1;
                let inner = self.factor()?;
                Rational64::from_integer(0)
                    .checked_sub(&inner)
                    .ok_or_else(|| self.fail("arithmetic overflow"))
            }
            Some(c) if c.is_ascii_digit() => self.number(),
            Some(c) => Err(self.fail(format!("unexpected character {:?}", c as char))),
            None => Err(self.fail("unexpected end of expression")),
        }
    }

    fn number(&mut self) -> Result<Rational64, ScoreError> {
        let int_part = self.digits()?;
        if self.bytes.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            let frac_start = self.pos;
            let frac_part = self.digits()?;
            let frac_len = (self.pos - frac_start) as u32;
            let scale = 10i64
                .checked_pow(frac_len)
                .ok_or_else(|| self.fail("number has too many fractional digits"))?;
            let numer = int_part
                .checked_mul(scale)
                .and_then(|v| v.checked_add(frac_part))
                .ok_or_else(|| self.fail("number literal too large"))?;
            Ok(Rational64::new(numer, scale))
        } else {
            Ok(Rational64::from_integer(int_part))
        }
    }

    fn digits(&mut self) -> Result<i64, ScoreError> {
        let start = self.pos;
        let mut value: i64 = 0;
        while let Some(c) = self.bytes.get(self.pos).copied() {
            if !c.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((c - b'0') as i64))
                .ok_or_else(|| self.fail("number literal too large"))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.fail("expected a digit"));
        }
        Ok(value)
    }
}
