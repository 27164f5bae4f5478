//! The parser graph and its evaluation.
//!
//! Every parser is a node in a directed, possibly cyclic graph. A
//! [`Parser`] is a cheap-to-clone handle onto a shared node; node identity
//! is pointer identity, and the graph-node protocol (`children`, `replace`,
//! `copy`, `structural_eq`, `set`) operates on handles. Evaluation
//! ([`Parser::parse_on`]) takes only immutable borrows, so re-entrant
//! parsing over cyclic graphs is sound; mutation happens during
//! construction and explicit transforms only.

mod combinators;
mod primitives;
mod repeaters;

pub use primitives::{
    any, any_with, epsilon, epsilon_with, failure, predicate, string, string_ignore_case,
    undefined, undefined_with,
};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::chars::CharMatcher;
use crate::context::{Context, ParseResult, Success};
use crate::token::Token;
use crate::value::Value;

/// Sentinel for repetitions without an upper bound.
pub const UNBOUNDED: usize = usize::MAX;

pub(crate) type ActionFn = Rc<dyn Fn(Value) -> Value>;
pub(crate) type PredicateFn = Rc<dyn Fn(&str) -> bool>;
pub(crate) type ContinuationFn =
    Rc<dyn Fn(&Context, &dyn Fn(&Context) -> ParseResult) -> ParseResult>;

/// The sum of all node kinds. Scalar configuration is cloned by `copy`;
/// children and closures are shared by reference.
#[derive(Clone)]
pub(crate) enum ParserKind {
    Any {
        message: String,
    },
    Epsilon {
        result: Value,
    },
    Fail {
        message: String,
    },
    Predicate {
        length: usize,
        predicate: PredicateFn,
        message: String,
    },
    Char {
        matcher: CharMatcher,
        message: String,
    },
    Sequence {
        children: Vec<Parser>,
    },
    Choice {
        children: Vec<Parser>,
    },
    Optional {
        child: Parser,
        otherwise: Value,
    },
    And {
        child: Parser,
    },
    Not {
        child: Parser,
        message: String,
    },
    End {
        child: Parser,
        message: String,
    },
    Flatten {
        child: Parser,
    },
    Token {
        child: Parser,
    },
    Trim {
        child: Parser,
        trimmer: Parser,
    },
    Action {
        child: Parser,
        action: ActionFn,
    },
    Repeat {
        child: Parser,
        min: usize,
        max: usize,
    },
    GreedyRepeat {
        child: Parser,
        limit: Parser,
        min: usize,
        max: usize,
    },
    LazyRepeat {
        child: Parser,
        limit: Parser,
        min: usize,
        max: usize,
    },
    Setable {
        child: Parser,
    },
    Continuation {
        child: Parser,
        handler: ContinuationFn,
    },
}

/// A handle onto a node in a parser graph.
#[derive(Clone)]
pub struct Parser {
    node: Rc<RefCell<ParserKind>>,
}

impl Parser {
    pub(crate) fn new(kind: ParserKind) -> Parser {
        Parser {
            node: Rc::new(RefCell::new(kind)),
        }
    }

    /// Node identity, used as a key by the reflection traversals.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.node) as *const () as usize
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Parser) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Parses `input` from the start.
    pub fn parse(&self, input: &str) -> ParseResult {
        self.parse_on(&Context::new(input))
    }

    /// Whether `input` is accepted (from the start; the end need not be reached).
    pub fn accept(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }

    /// Parses at the given context.
    pub fn parse_on(&self, context: &Context) -> ParseResult {
        let kind = self.node.borrow();
        match &*kind {
            ParserKind::Any { message } => match context.peek() {
                Some(value) => Ok(context.success_at(Value::Char(value), context.position() + 1)),
                None => Err(context.failure(message)),
            },
            ParserKind::Epsilon { result } => Ok(context.success(result.clone())),
            ParserKind::Fail { message } => Err(context.failure(message)),
            ParserKind::Predicate {
                length,
                predicate,
                message,
            } => {
                let stop = context.position() + length;
                if stop <= context.buffer_len() {
                    let slice = context.slice_text(context.position(), stop);
                    if predicate(&slice) {
                        return Ok(context.success_at(Value::Str(slice), stop));
                    }
                }
                Err(context.failure(message))
            }
            ParserKind::Char { matcher, message } => match context.peek() {
                Some(value) if matcher.matches(value) => {
                    Ok(context.success_at(Value::Char(value), context.position() + 1))
                }
                _ => Err(context.failure(message)),
            },
            ParserKind::Sequence { children } => {
                let mut current = context.clone();
                let mut elements = Vec::with_capacity(children.len());
                for child in children {
                    let Success { context, value } = child.parse_on(&current)?;
                    elements.push(value);
                    current = context;
                }
                Ok(current.success(Value::List(elements)))
            }
            ParserKind::Choice { children } => {
                let mut last_failure = None;
                for child in children {
                    match child.parse_on(context) {
                        Ok(success) => return Ok(success),
                        Err(failure) => last_failure = Some(failure),
                    }
                }
                Err(last_failure.unwrap_or_else(|| context.failure("empty choice")))
            }
            ParserKind::Optional { child, otherwise } => match child.parse_on(context) {
                Ok(success) => Ok(success),
                Err(_) => Ok(context.success(otherwise.clone())),
            },
            ParserKind::And { child } => {
                let Success { value, .. } = child.parse_on(context)?;
                Ok(context.success(value))
            }
            ParserKind::Not { child, message } => match child.parse_on(context) {
                Ok(_) => Err(context.failure(message)),
                Err(_) => Ok(context.success(Value::Null)),
            },
            ParserKind::End { child, message } => {
                let success = child.parse_on(context)?;
                if success.position() == success.context.buffer_len() {
                    Ok(success)
                } else {
                    Err(success.context.failure(message))
                }
            }
            ParserKind::Flatten { child } => {
                let Success { context: after, .. } = child.parse_on(context)?;
                let text = context.slice_text(context.position(), after.position());
                Ok(after.success(Value::Str(text)))
            }
            ParserKind::Token { child } => {
                let Success {
                    context: after,
                    value,
                } = child.parse_on(context)?;
                let token = Token::new(
                    value,
                    context.buffer().clone(),
                    context.position(),
                    after.position(),
                );
                Ok(after.success(Value::Token(token)))
            }
            ParserKind::Trim { child, trimmer } => {
                let mut current = context.clone();
                while let Ok(success) = trimmer.parse_on(&current) {
                    current = success.context;
                }
                let Success {
                    context: after,
                    value,
                } = child.parse_on(&current)?;
                let mut after = after;
                while let Ok(success) = trimmer.parse_on(&after) {
                    after = success.context;
                }
                Ok(after.success(value))
            }
            ParserKind::Action { child, action } => {
                let Success {
                    context: after,
                    value,
                } = child.parse_on(context)?;
                Ok(after.success(action(value)))
            }
            ParserKind::Repeat { child, min, max } => {
                repeaters::parse_possessive(child, *min, *max, context)
            }
            ParserKind::GreedyRepeat {
                child,
                limit,
                min,
                max,
            } => repeaters::parse_greedy(child, limit, *min, *max, context),
            ParserKind::LazyRepeat {
                child,
                limit,
                min,
                max,
            } => repeaters::parse_lazy(child, limit, *min, *max, context),
            ParserKind::Setable { child } => child.parse_on(context),
            ParserKind::Continuation { child, handler } => {
                let delegate = child.clone();
                handler(context, &move |inner: &Context| delegate.parse_on(inner))
            }
        }
    }

    /// Direct sub-parsers, in evaluation order. May contain duplicates.
    pub fn children(&self) -> Vec<Parser> {
        match &*self.node.borrow() {
            ParserKind::Any { .. }
            | ParserKind::Epsilon { .. }
            | ParserKind::Fail { .. }
            | ParserKind::Predicate { .. }
            | ParserKind::Char { .. } => Vec::new(),
            ParserKind::Sequence { children } | ParserKind::Choice { children } => {
                children.clone()
            }
            ParserKind::Optional { child, .. }
            | ParserKind::And { child }
            | ParserKind::Not { child, .. }
            | ParserKind::End { child, .. }
            | ParserKind::Flatten { child }
            | ParserKind::Token { child }
            | ParserKind::Action { child, .. }
            | ParserKind::Repeat { child, .. }
            | ParserKind::Setable { child }
            | ParserKind::Continuation { child, .. } => vec![child.clone()],
            ParserKind::Trim { child, trimmer } => vec![child.clone(), trimmer.clone()],
            ParserKind::GreedyRepeat { child, limit, .. }
            | ParserKind::LazyRepeat { child, limit, .. } => {
                vec![child.clone(), limit.clone()]
            }
        }
    }

    /// In-place substitution of every identity-equal occurrence of `source`
    /// among the direct children. A no-op on leaves.
    pub fn replace(&self, source: &Parser, target: &Parser) {
        let mut kind = self.node.borrow_mut();
        match &mut *kind {
            ParserKind::Any { .. }
            | ParserKind::Epsilon { .. }
            | ParserKind::Fail { .. }
            | ParserKind::Predicate { .. }
            | ParserKind::Char { .. } => {}
            ParserKind::Sequence { children } | ParserKind::Choice { children } => {
                for child in children {
                    if child.ptr_eq(source) {
                        *child = target.clone();
                    }
                }
            }
            ParserKind::Optional { child, .. }
            | ParserKind::And { child }
            | ParserKind::Not { child, .. }
            | ParserKind::End { child, .. }
            | ParserKind::Flatten { child }
            | ParserKind::Token { child }
            | ParserKind::Action { child, .. }
            | ParserKind::Repeat { child, .. }
            | ParserKind::Setable { child }
            | ParserKind::Continuation { child, .. } => {
                if child.ptr_eq(source) {
                    *child = target.clone();
                }
            }
            ParserKind::Trim { child, trimmer } => {
                if child.ptr_eq(source) {
                    *child = target.clone();
                }
                if trimmer.ptr_eq(source) {
                    *trimmer = target.clone();
                }
            }
            ParserKind::GreedyRepeat { child, limit, .. }
            | ParserKind::LazyRepeat { child, limit, .. } => {
                if child.ptr_eq(source) {
                    *child = target.clone();
                }
                if limit.ptr_eq(source) {
                    *limit = target.clone();
                }
            }
        }
    }

    /// A shallow clone: configuration is duplicated, children and action
    /// closures are shared by reference.
    pub fn copy(&self) -> Parser {
        Parser::new(self.node.borrow().clone())
    }

    /// Structural equality: same kind, same scalar configuration, children
    /// pairwise structurally equal. Closures compare by identity. Cycles
    /// terminate optimistically through a seen-set of visited nodes.
    pub fn structural_eq(&self, other: &Parser) -> bool {
        self.structural_eq_seen(other, &mut Vec::new())
    }

    fn structural_eq_seen(&self, other: &Parser, seen: &mut Vec<Parser>) -> bool {
        if seen.iter().any(|parser| parser.ptr_eq(self)) {
            return true;
        }
        seen.push(self.clone());
        let a = self.node.borrow();
        let b = other.node.borrow();
        match (&*a, &*b) {
            (ParserKind::Any { message: ma }, ParserKind::Any { message: mb }) => ma == mb,
            (ParserKind::Epsilon { result: ra }, ParserKind::Epsilon { result: rb }) => ra == rb,
            (ParserKind::Fail { message: ma }, ParserKind::Fail { message: mb }) => ma == mb,
            (
                ParserKind::Predicate {
                    length: la,
                    predicate: pa,
                    message: ma,
                },
                ParserKind::Predicate {
                    length: lb,
                    predicate: pb,
                    message: mb,
                },
            ) => la == lb && ma == mb && Rc::ptr_eq(pa, pb),
            (
                ParserKind::Char {
                    matcher: ca,
                    message: ma,
                },
                ParserKind::Char {
                    matcher: cb,
                    message: mb,
                },
            ) => ca == cb && ma == mb,
            (ParserKind::Sequence { children: ca }, ParserKind::Sequence { children: cb })
            | (ParserKind::Choice { children: ca }, ParserKind::Choice { children: cb }) => {
                children_eq(ca, cb, seen)
            }
            (
                ParserKind::Optional {
                    child: ca,
                    otherwise: oa,
                },
                ParserKind::Optional {
                    child: cb,
                    otherwise: ob,
                },
            ) => oa == ob && ca.structural_eq_seen(cb, seen),
            (ParserKind::And { child: ca }, ParserKind::And { child: cb }) => {
                ca.structural_eq_seen(cb, seen)
            }
            (
                ParserKind::Not {
                    child: ca,
                    message: ma,
                },
                ParserKind::Not {
                    child: cb,
                    message: mb,
                },
            )
            | (
                ParserKind::End {
                    child: ca,
                    message: ma,
                },
                ParserKind::End {
                    child: cb,
                    message: mb,
                },
            ) => ma == mb && ca.structural_eq_seen(cb, seen),
            (ParserKind::Flatten { child: ca }, ParserKind::Flatten { child: cb })
            | (ParserKind::Token { child: ca }, ParserKind::Token { child: cb })
            | (ParserKind::Setable { child: ca }, ParserKind::Setable { child: cb }) => {
                ca.structural_eq_seen(cb, seen)
            }
            (
                ParserKind::Trim {
                    child: ca,
                    trimmer: ta,
                },
                ParserKind::Trim {
                    child: cb,
                    trimmer: tb,
                },
            ) => ca.structural_eq_seen(cb, seen) && ta.structural_eq_seen(tb, seen),
            (
                ParserKind::Action {
                    child: ca,
                    action: aa,
                },
                ParserKind::Action {
                    child: cb,
                    action: ab,
                },
            ) => Rc::ptr_eq(aa, ab) && ca.structural_eq_seen(cb, seen),
            (
                ParserKind::Repeat {
                    child: ca,
                    min: mina,
                    max: maxa,
                },
                ParserKind::Repeat {
                    child: cb,
                    min: minb,
                    max: maxb,
                },
            ) => mina == minb && maxa == maxb && ca.structural_eq_seen(cb, seen),
            (
                ParserKind::GreedyRepeat {
                    child: ca,
                    limit: la,
                    min: mina,
                    max: maxa,
                },
                ParserKind::GreedyRepeat {
                    child: cb,
                    limit: lb,
                    min: minb,
                    max: maxb,
                },
            )
            | (
                ParserKind::LazyRepeat {
                    child: ca,
                    limit: la,
                    min: mina,
                    max: maxa,
                },
                ParserKind::LazyRepeat {
                    child: cb,
                    limit: lb,
                    min: minb,
                    max: maxb,
                },
            ) => {
                mina == minb
                    && maxa == maxb
                    && ca.structural_eq_seen(cb, seen)
                    && la.structural_eq_seen(lb, seen)
            }
            (
                ParserKind::Continuation {
                    child: ca,
                    handler: ha,
                },
                ParserKind::Continuation {
                    child: cb,
                    handler: hb,
                },
            ) => Rc::ptr_eq(ha, hb) && ca.structural_eq_seen(cb, seen),
            _ => false,
        }
    }

    /// Whether this node is a setable indirection.
    pub fn is_setable(&self) -> bool {
        matches!(&*self.node.borrow(), ParserKind::Setable { .. })
    }

    pub(crate) fn setable_child(&self) -> Option<Parser> {
        match &*self.node.borrow() {
            ParserKind::Setable { child } => Some(child.clone()),
            _ => None,
        }
    }

    /// Replaces the delegate of a setable indirection.
    ///
    /// # Panics
    ///
    /// Panics when called on any other node kind.
    pub fn set(&self, parser: &Parser) {
        let mut kind = self.node.borrow_mut();
        match &mut *kind {
            ParserKind::Setable { child } => *child = parser.clone(),
            _ => panic!("set() requires a setable parser"),
        }
    }
}

fn children_eq(a: &[Parser], b: &[Parser], seen: &mut Vec<Parser>) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(left, right)| left.structural_eq_seen(right, seen))
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.node.borrow() {
            ParserKind::Any { .. } => write!(f, "any"),
            ParserKind::Epsilon { .. } => write!(f, "epsilon"),
            ParserKind::Fail { message } => write!(f, "failure[{message}]"),
            ParserKind::Predicate { message, .. } => write!(f, "predicate[{message}]"),
            ParserKind::Char { message, .. } => write!(f, "char[{message}]"),
            ParserKind::Sequence { .. } => write!(f, "sequence"),
            ParserKind::Choice { .. } => write!(f, "choice"),
            ParserKind::Optional { .. } => write!(f, "optional"),
            ParserKind::And { .. } => write!(f, "and"),
            ParserKind::Not { .. } => write!(f, "not"),
            ParserKind::End { .. } => write!(f, "end"),
            ParserKind::Flatten { .. } => write!(f, "flatten"),
            ParserKind::Token { .. } => write!(f, "token"),
            ParserKind::Trim { .. } => write!(f, "trim"),
            ParserKind::Action { .. } => write!(f, "action"),
            ParserKind::Repeat { min, max, .. } => write!(f, "repeat[{}]", bounds(*min, *max)),
            ParserKind::GreedyRepeat { min, max, .. } => {
                write!(f, "repeat-greedy[{}]", bounds(*min, *max))
            }
            ParserKind::LazyRepeat { min, max, .. } => {
                write!(f, "repeat-lazy[{}]", bounds(*min, *max))
            }
            ParserKind::Setable { .. } => write!(f, "setable"),
            ParserKind::Continuation { .. } => write!(f, "continuation"),
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn bounds(min: usize, max: usize) -> String {
    if max == UNBOUNDED {
        format!("{min}..*")
    } else {
        format!("{min}..{max}")
    }
}
