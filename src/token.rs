//! Tokens: parsed values together with their source slice.

use std::fmt;

use crate::chars::char;
use crate::context::{Buffer, Context};
use crate::value::Value;

/// A value plus the `[start, stop)` slice of the buffer it was recognized
/// in. Equality is structural over `(value, start, stop)`.
#[derive(Debug, Clone)]
pub struct Token {
    value: Box<Value>,
    input: Buffer,
    start: usize,
    stop: usize,
}

impl Token {
    pub fn new(value: Value, input: Buffer, start: usize, stop: usize) -> Token {
        debug_assert!(start <= stop && stop <= input.len());
        Token {
            value: Box::new(value),
            input,
            start,
            stop,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        *self.value
    }

    pub fn buffer(&self) -> &Buffer {
        &self.input
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn length(&self) -> usize {
        self.stop - self.start
    }

    /// The recognized source slice.
    pub fn text(&self) -> String {
        self.input[self.start..self.stop].iter().collect()
    }

    /// The 1-based line and column of this token's start.
    pub fn line_and_column(&self) -> (usize, usize) {
        line_and_column_in(&self.input, self.start)
    }

    /// The 1-based line and column of `position` in `buffer`. Counts `\n`,
    /// `\r\n` and `\r` as line terminators.
    pub fn line_and_column_of(buffer: &str, position: usize) -> (usize, usize) {
        line_and_column_in(&buffer.chars().collect::<Vec<_>>().into(), position)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Token) -> bool {
        self.value == other.value && self.start == other.start && self.stop == other.stop
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token[{}..{}]: {}", self.start, self.stop, self.value)
    }
}

fn line_and_column_in(buffer: &Buffer, position: usize) -> (usize, usize) {
    let newline = char('\n').or(&char('\r').seq(&char('\n').optional()));
    let mut line = 1;
    let mut offset = 0;
    for value in newline
        .token()
        .matches_skipping_in(Context::with_buffer(buffer.clone(), 0))
    {
        if let Value::Token(token) = value {
            if position < token.stop() {
                return (line, position - offset + 1);
            }
            line += 1;
            offset = token.stop();
        }
    }
    (line, position - offset + 1)
}
