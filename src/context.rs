//! Parse contexts and results.
//!
//! A [`Context`] is an immutable `(buffer, position)` pair. Parsers never
//! mutate it; they produce a [`Success`] carrying the context *after* the
//! match, or a [`Failure`] whose context records the point of failure.
//! Combinators thread `success.context` into the next parser and surface
//! the first failure with `?`.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Shared, immutable parse input decoded to code points.
pub type Buffer = Rc<[char]>;

/// An immutable position inside a shared input buffer.
#[derive(Debug, Clone)]
pub struct Context {
    input: Buffer,
    position: usize,
}

impl Context {
    /// Decodes `input` once and starts at position zero.
    pub fn new(input: &str) -> Context {
        Context {
            input: input.chars().collect::<Vec<_>>().into(),
            position: 0,
        }
    }

    pub fn with_buffer(input: Buffer, position: usize) -> Context {
        Context { input, position }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.input
    }

    pub fn buffer_len(&self) -> usize {
        self.input.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The same buffer at another position.
    pub fn at(&self, position: usize) -> Context {
        Context {
            input: self.input.clone(),
            position,
        }
    }

    /// A success at the current position.
    pub fn success(&self, value: Value) -> Success {
        Success {
            context: self.clone(),
            value,
        }
    }

    /// A success at an explicitly supplied position.
    pub fn success_at(&self, value: Value, position: usize) -> Success {
        Success {
            context: self.at(position),
            value,
        }
    }

    /// A failure at the current position.
    pub fn failure(&self, message: impl Into<String>) -> Failure {
        Failure {
            context: self.clone(),
            message: message.into(),
        }
    }

    /// A failure at an explicitly supplied position.
    pub fn failure_at(&self, message: impl Into<String>, position: usize) -> Failure {
        Failure {
            context: self.at(position),
            message: message.into(),
        }
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub(crate) fn slice_text(&self, start: usize, stop: usize) -> String {
        self.input[start..stop].iter().collect()
    }
}

/// A successful parse: the context after the match plus the produced value.
#[derive(Debug, Clone)]
pub struct Success {
    pub context: Context,
    pub value: Value,
}

impl Success {
    pub fn position(&self) -> usize {
        self.context.position()
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Display for Success {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Success[{}]: {}", self.position(), self.value)
    }
}

/// A failed parse: the point of failure plus a human-readable message.
#[derive(Debug, Clone)]
pub struct Failure {
    pub context: Context,
    pub message: String,
}

impl Failure {
    pub fn position(&self) -> usize {
        self.context.position()
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Failure) -> bool {
        self.position() == other.position() && self.message == other.message
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failure[{}]: {}", self.position(), self.message)
    }
}

impl std::error::Error for Failure {}

/// Result type for parse operations.
pub type ParseResult = Result<Success, Failure>;
