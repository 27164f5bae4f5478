//! The three repetition evaluators.
//!
//! All carry `(min, max)` with `min <= max`. The mandatory `min` elements
//! propagate the delegate's failure; the strategies differ only in how the
//! optional tail is consumed. The greedy and lazy variants never consume
//! their limit parser.

use super::Parser;
use crate::context::{Context, ParseResult};
use crate::value::Value;

/// Consumes greedily without backtracking.
pub(crate) fn parse_possessive(
    child: &Parser,
    min: usize,
    max: usize,
    context: &Context,
) -> ParseResult {
    let mut current = context.clone();
    let mut elements = Vec::new();
    while elements.len() < min {
        let success = child.parse_on(&current)?;
        elements.push(success.value);
        current = success.context;
    }
    while elements.len() < max {
        match child.parse_on(&current) {
            Ok(success) => {
                elements.push(success.value);
                current = success.context;
            }
            Err(_) => break,
        }
    }
    Ok(current.success(Value::List(elements)))
}

/// Consumes as much as possible, then drops optional elements one by one
/// until the limit accepts at the resulting position.
pub(crate) fn parse_greedy(
    child: &Parser,
    limit: &Parser,
    min: usize,
    max: usize,
    context: &Context,
) -> ParseResult {
    let mut current = context.clone();
    let mut elements = Vec::new();
    while elements.len() < min {
        let success = child.parse_on(&current)?;
        elements.push(success.value);
        current = success.context;
    }
    // contexts[0] is the position after the mandatory elements; every
    // further entry records one optional step.
    let mut contexts = vec![current];
    while elements.len() < max {
        match child.parse_on(&contexts[contexts.len() - 1]) {
            Ok(success) => {
                elements.push(success.value);
                contexts.push(success.context);
            }
            Err(_) => break,
        }
    }
    loop {
        let deepest = contexts[contexts.len() - 1].clone();
        match limit.parse_on(&deepest) {
            Ok(_) => return Ok(deepest.success(Value::List(elements))),
            Err(failure) => {
                if contexts.len() == 1 {
                    return Err(failure);
                }
                contexts.pop();
                elements.pop();
            }
        }
    }
}

/// Consumes as little as possible: tries the limit before every optional
/// step and stops as soon as it accepts.
pub(crate) fn parse_lazy(
    child: &Parser,
    limit: &Parser,
    min: usize,
    max: usize,
    context: &Context,
) -> ParseResult {
    let mut current = context.clone();
    let mut elements = Vec::new();
    while elements.len() < min {
        let success = child.parse_on(&current)?;
        elements.push(success.value);
        current = success.context;
    }
    loop {
        match limit.parse_on(&current) {
            Ok(_) => return Ok(current.success(Value::List(elements))),
            Err(failure) => {
                if elements.len() >= max {
                    return Err(failure);
                }
                match child.parse_on(&current) {
                    Ok(success) => {
                        elements.push(success.value);
                        current = success.context;
                    }
                    Err(_) => return Err(failure),
                }
            }
        }
    }
}
