//! parsekit - composable recursive-descent parsing with first-class grammars
//!
//! This library builds top-down, backtracking parsers by composing small
//! recognizers through algebraic combinators. Grammars are ordinary values:
//! they can be constructed fluently, introspected as a graph, transformed,
//! and rewritten after definition — including tying recursive knots through
//! setable indirections and attaching semantic actions post-hoc.
//!
//! ```
//! use parsekit::{char, digit};
//!
//! let number = digit().plus().flatten();
//! let list = number.separated_by_with(&char(','), false, false);
//! assert!(list.end().accept("1,22,333"));
//! ```

pub mod chars;
pub mod context;
pub mod errors;
pub mod grammar;
pub mod parser;
pub mod reflect;
pub mod token;
pub mod value;

pub use chars::{
    any_in, char, char_matcher, digit, letter, lowercase, pattern, pattern_with, range,
    uppercase, whitespace, word, CharMatcher,
};
pub use context::{Buffer, Context, Failure, ParseResult, Success};
pub use errors::{GrammarError, ParserError};
pub use grammar::{Grammar, GrammarDefinition};
pub use parser::{
    any, any_with, epsilon, epsilon_with, failure, predicate, string, string_ignore_case,
    undefined, undefined_with, Parser, UNBOUNDED,
};
pub use reflect::{
    all_parsers, debug, profile, progress, remove_duplicates, remove_setables, transform,
    Profile, ProfileEntry,
};
pub use token::Token;
pub use value::Value;
