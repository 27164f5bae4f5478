//! Leaf parsers.

use std::rc::Rc;

use super::{Parser, ParserKind};
use crate::value::Value;

/// Consumes any single element.
pub fn any() -> Parser {
    any_with("input expected")
}

pub fn any_with(message: &str) -> Parser {
    Parser::new(ParserKind::Any {
        message: message.to_owned(),
    })
}

/// Consumes nothing and succeeds with null.
pub fn epsilon() -> Parser {
    epsilon_with(Value::Null)
}

/// Consumes nothing and succeeds with `result`.
pub fn epsilon_with(result: Value) -> Parser {
    Parser::new(ParserKind::Epsilon { result })
}

/// Always fails with `message`.
pub fn failure(message: &str) -> Parser {
    Parser::new(ParserKind::Fail {
        message: message.to_owned(),
    })
}

/// Reads `length` elements and succeeds with the slice iff `predicate`
/// accepts it.
pub fn predicate(
    length: usize,
    predicate: impl Fn(&str) -> bool + 'static,
    message: &str,
) -> Parser {
    Parser::new(ParserKind::Predicate {
        length,
        predicate: Rc::new(predicate),
        message: message.to_owned(),
    })
}

/// Recognizes `text` exactly.
pub fn string(text: &str) -> Parser {
    let expected = text.to_owned();
    let message = format!("'{text}' expected");
    predicate(text.chars().count(), move |slice| slice == expected, &message)
}

/// Recognizes `text` ignoring case.
pub fn string_ignore_case(text: &str) -> Parser {
    let expected = text.to_lowercase();
    let message = format!("'{text}' expected");
    predicate(
        text.chars().count(),
        move |slice| slice.to_lowercase() == expected,
        &message,
    )
}

/// A setable placeholder that fails until a delegate is set.
pub fn undefined() -> Parser {
    undefined_with("undefined parser")
}

pub fn undefined_with(message: &str) -> Parser {
    failure(message).setable()
}
