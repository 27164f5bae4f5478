//! The fluent combinator surface.
//!
//! Every method wraps the receiver in a fresh node and returns the new
//! handle, so `p.plus().flatten()` and `p.flatten().plus()` build distinct
//! graphs with no shared wrapper state.

use std::cell::RefCell;
use std::rc::Rc;

use super::primitives::any;
use super::{Parser, ParserKind, UNBOUNDED};
use crate::chars::whitespace;
use crate::context::{Context, ParseResult};
use crate::value::Value;

fn sequence_of(children: Vec<Parser>) -> Parser {
    Parser::new(ParserKind::Sequence { children })
}

impl Parser {
    /// Sequence: self then `other`; the value is the flat list of element
    /// values. When self is already a sequence the new node extends it
    /// instead of nesting.
    pub fn seq(&self, other: &Parser) -> Parser {
        let mut children = match &*self.node.borrow() {
            ParserKind::Sequence { children } => children.clone(),
            _ => vec![self.clone()],
        };
        children.push(other.clone());
        sequence_of(children)
    }

    /// Ordered choice: alternatives are tried in declared order at the same
    /// position; the last failure surfaces when all fail. Flattens when self
    /// is already a choice.
    pub fn or(&self, other: &Parser) -> Parser {
        let mut children = match &*self.node.borrow() {
            ParserKind::Choice { children } => children.clone(),
            _ => vec![self.clone()],
        };
        children.push(other.clone());
        Parser::new(ParserKind::Choice { children })
    }

    /// Succeeds with self's value, or with null consuming nothing.
    pub fn optional(&self) -> Parser {
        self.optional_with(Value::Null)
    }

    /// Succeeds with self's value, or with `otherwise` consuming nothing.
    pub fn optional_with(&self, otherwise: Value) -> Parser {
        Parser::new(ParserKind::Optional {
            child: self.clone(),
            otherwise,
        })
    }

    /// Lookahead: succeeds with self's value but leaves the position unchanged.
    pub fn and(&self) -> Parser {
        Parser::new(ParserKind::And {
            child: self.clone(),
        })
    }

    /// Negative lookahead: succeeds with null iff self fails; consumes nothing.
    pub fn not(&self, message: &str) -> Parser {
        Parser::new(ParserKind::Not {
            child: self.clone(),
            message: message.to_owned(),
        })
    }

    /// Consumes one element that self does *not* accept.
    pub fn neg(&self, message: &str) -> Parser {
        self.not(message).seq(&any()).pick(1)
    }

    /// Succeeds iff self succeeds having consumed the whole input.
    pub fn end(&self) -> Parser {
        self.end_with("end of input expected")
    }

    pub fn end_with(&self, message: &str) -> Parser {
        Parser::new(ParserKind::End {
            child: self.clone(),
            message: message.to_owned(),
        })
    }

    /// Replaces self's value with the consumed substring.
    pub fn flatten(&self) -> Parser {
        Parser::new(ParserKind::Flatten {
            child: self.clone(),
        })
    }

    /// Wraps self's value into a [`crate::token::Token`] spanning the match.
    pub fn token(&self) -> Parser {
        Parser::new(ParserKind::Token {
            child: self.clone(),
        })
    }

    /// Consumes whitespace before and after self, keeping self's value.
    pub fn trim(&self) -> Parser {
        self.trim_with(&whitespace())
    }

    /// Consumes zero-or-more `trimmer` before and after self.
    pub fn trim_with(&self, trimmer: &Parser) -> Parser {
        Parser::new(ParserKind::Trim {
            child: self.clone(),
            trimmer: trimmer.clone(),
        })
    }

    /// On success, replaces the value with `action(value)`.
    pub fn map(&self, action: impl Fn(Value) -> Value + 'static) -> Parser {
        Parser::new(ParserKind::Action {
            child: self.clone(),
            action: Rc::new(action),
        })
    }

    /// Selects index `index` of a list value; negative indices count from
    /// the end. Out-of-range indices yield null.
    pub fn pick(&self, index: isize) -> Parser {
        self.map(move |value| match value {
            Value::List(items) => pick_index(&items, index),
            other => other,
        })
    }

    /// Reorders a list value by the given indices; negative indices allowed.
    pub fn permute(&self, indexes: &[isize]) -> Parser {
        let indexes = indexes.to_vec();
        self.map(move |value| match value {
            Value::List(items) => Value::List(
                indexes
                    .iter()
                    .map(|&index| pick_index(&items, index))
                    .collect(),
            ),
            other => other,
        })
    }

    /// Possessive repetition: consumes greedily, never gives back.
    ///
    /// # Panics
    ///
    /// Panics when `min > max`.
    pub fn repeat(&self, min: usize, max: usize) -> Parser {
        assert!(min <= max, "repetition range {min}..{max} is inverted");
        Parser::new(ParserKind::Repeat {
            child: self.clone(),
            min,
            max,
        })
    }

    /// Zero or more, possessive.
    pub fn star(&self) -> Parser {
        self.repeat(0, UNBOUNDED)
    }

    /// One or more, possessive.
    pub fn plus(&self) -> Parser {
        self.repeat(1, UNBOUNDED)
    }

    /// Exactly `count` repetitions.
    pub fn times(&self, count: usize) -> Parser {
        self.repeat(count, count)
    }

    /// Greedy repetition that backtracks until `limit` accepts at the
    /// position after the repeated elements. `limit` is not consumed.
    pub fn repeat_greedy(&self, limit: &Parser, min: usize, max: usize) -> Parser {
        assert!(min <= max, "repetition range {min}..{max} is inverted");
        Parser::new(ParserKind::GreedyRepeat {
            child: self.clone(),
            limit: limit.clone(),
            min,
            max,
        })
    }

    pub fn star_greedy(&self, limit: &Parser) -> Parser {
        self.repeat_greedy(limit, 0, UNBOUNDED)
    }

    pub fn plus_greedy(&self, limit: &Parser) -> Parser {
        self.repeat_greedy(limit, 1, UNBOUNDED)
    }

    /// Lazy repetition that stops as soon as `limit` accepts. `limit` is
    /// not consumed.
    pub fn repeat_lazy(&self, limit: &Parser, min: usize, max: usize) -> Parser {
        assert!(min <= max, "repetition range {min}..{max} is inverted");
        Parser::new(ParserKind::LazyRepeat {
            child: self.clone(),
            limit: limit.clone(),
            min,
            max,
        })
    }

    pub fn star_lazy(&self, limit: &Parser) -> Parser {
        self.repeat_lazy(limit, 0, UNBOUNDED)
    }

    pub fn plus_lazy(&self, limit: &Parser) -> Parser {
        self.repeat_lazy(limit, 1, UNBOUNDED)
    }

    /// `self (separator self)*` as a flat list including the separators.
    pub fn separated_by(&self, separator: &Parser) -> Parser {
        self.separated_by_with(separator, true, false)
    }

    /// `self (separator self)*`, optionally allowing a trailing separator.
    /// The result is a flat list; separators are included only when
    /// `include_separators` is set, and a trailing separator only when it
    /// was actually present.
    pub fn separated_by_with(
        &self,
        separator: &Parser,
        include_separators: bool,
        optional_separator_at_end: bool,
    ) -> Parser {
        // The pair node is built directly so a sequence-valued separator
        // keeps its own shape instead of being flattened into the pair.
        let pair = sequence_of(vec![separator.clone(), self.clone()]);
        let mut children = vec![self.clone(), pair.star()];
        if optional_separator_at_end {
            children.push(separator.optional());
        }
        sequence_of(children).map(move |value| {
            let items = match value {
                Value::List(items) => items,
                other => return other,
            };
            let mut items = items.into_iter();
            let first = items.next().unwrap_or(Value::Null);
            let pairs = items.next().unwrap_or_else(|| Value::List(Vec::new()));
            let tail = items.next();
            let mut result = vec![first];
            if let Value::List(pairs) = pairs {
                for entry in pairs {
                    if let Value::List(mut entry) = entry {
                        let element = entry.pop().unwrap_or(Value::Null);
                        let sep = entry.pop().unwrap_or(Value::Null);
                        if include_separators {
                            result.push(sep);
                        }
                        result.push(element);
                    }
                }
            }
            if include_separators {
                if let Some(tail) = tail {
                    if !tail.is_null() {
                        result.push(tail);
                    }
                }
            }
            Value::List(result)
        })
    }

    /// Wraps self in a mutable indirection, the node used to tie recursive
    /// knots and to permit graph rewiring.
    pub fn setable(&self) -> Parser {
        Parser::new(ParserKind::Setable {
            child: self.clone(),
        })
    }

    /// A delegating parser whose evaluation is routed through `handler`;
    /// calling the passed continuation runs the wrapped parser.
    pub fn continuation(
        &self,
        handler: impl Fn(&Context, &dyn Fn(&Context) -> ParseResult) -> ParseResult + 'static,
    ) -> Parser {
        Parser::new(ParserKind::Continuation {
            child: self.clone(),
            handler: Rc::new(handler),
        })
    }

    /// All overlapping matches of self anywhere in `input`.
    pub fn matches(&self, input: &str) -> Vec<Value> {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        let collector = self.and().map(move |value| {
            sink.borrow_mut().push(value);
            Value::Null
        });
        let _ = collector.seq(&any()).or(&any()).star().parse(input);
        results.take()
    }

    /// All non-overlapping matches of self anywhere in `input`.
    pub fn matches_skipping(&self, input: &str) -> Vec<Value> {
        self.matches_skipping_in(Context::new(input))
    }

    pub(crate) fn matches_skipping_in(&self, context: Context) -> Vec<Value> {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        let collector = self.map(move |value| {
            sink.borrow_mut().push(value);
            Value::Null
        });
        let _ = collector.or(&any()).star().parse_on(&context);
        results.take()
    }
}

fn pick_index(items: &[Value], index: isize) -> Value {
    let index = if index < 0 {
        items.len() as isize + index
    } else {
        index
    };
    if index < 0 {
        return Value::Null;
    }
    items.get(index as usize).cloned().unwrap_or(Value::Null)
}
