//! Continuation-based wrappers for tracing and profiling.
//!
//! Each wrapper is a plain [`transform`] that routes every reachable parser
//! through a continuation node; the graph under observation is left
//! untouched.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::transform;
use crate::context::ParseResult;
use crate::parser::Parser;

/// Wraps every reachable parser with an indented enter/exit trace emitted
/// through `output`.
pub fn debug(root: &Parser, output: impl Fn(String) + 'static) -> Parser {
    let output: Rc<dyn Fn(String)> = Rc::new(output);
    let level = Rc::new(Cell::new(0usize));
    transform(root, move |parser| {
        let output = Rc::clone(&output);
        let level = Rc::clone(&level);
        let label = parser.clone();
        parser.continuation(move |context, continuation| {
            output(format!("{}{}", "  ".repeat(level.get()), label));
            level.set(level.get() + 1);
            let result = continuation(context);
            level.set(level.get() - 1);
            output(format!("{}{}", "  ".repeat(level.get()), describe(&result)));
            result
        })
    })
}

/// Wraps every reachable parser with a position marker (one `*` per
/// consumed position) emitted through `output` on entry.
pub fn progress(root: &Parser, output: impl Fn(String) + 'static) -> Parser {
    let output: Rc<dyn Fn(String)> = Rc::new(output);
    transform(root, move |parser| {
        let output = Rc::clone(&output);
        let label = parser.clone();
        parser.continuation(move |context, continuation| {
            output(format!("{}{}", "*".repeat(context.position() + 1), label));
            continuation(context)
        })
    })
}

/// Invocation count and cumulative time for one wrapped parser.
#[derive(Clone)]
pub struct ProfileEntry {
    pub parser: Parser,
    pub count: u64,
    pub elapsed: Duration,
}

/// Shared handle onto the records collected by [`profile`].
#[derive(Clone)]
pub struct Profile {
    entries: Rc<RefCell<Vec<ProfileEntry>>>,
}

impl Profile {
    pub fn entries(&self) -> Vec<ProfileEntry> {
        self.entries.borrow().clone()
    }

    pub fn reset(&self) {
        for entry in self.entries.borrow_mut().iter_mut() {
            entry.count = 0;
            entry.elapsed = Duration::ZERO;
        }
    }
}

/// Wraps every reachable parser with an invocation counter and a cumulative
/// timer; returns the wrapped root and the records handle.
pub fn profile(root: &Parser) -> (Parser, Profile) {
    let entries = Rc::new(RefCell::new(Vec::new()));
    let records = Rc::clone(&entries);
    let wrapped = transform(root, move |parser| {
        let slot = {
            let mut entries = records.borrow_mut();
            entries.push(ProfileEntry {
                parser: parser.clone(),
                count: 0,
                elapsed: Duration::ZERO,
            });
            entries.len() - 1
        };
        let entries = Rc::clone(&records);
        parser.continuation(move |context, continuation| {
            entries.borrow_mut()[slot].count += 1;
            let started = Instant::now();
            let result = continuation(context);
            entries.borrow_mut()[slot].elapsed += started.elapsed();
            result
        })
    });
    (wrapped, Profile { entries })
}

fn describe(result: &ParseResult) -> String {
    match result {
        Ok(success) => success.to_string(),
        Err(failure) => failure.to_string(),
    }
}
