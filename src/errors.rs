//! Grammar-construction errors and the parse-failure promotion.
//!
//! Parse failures are ordinary values ([`crate::context::Failure`] inside a
//! [`crate::context::ParseResult`]). Everything here is raised while a
//! grammar is being *built*, or when a caller chooses to promote a failure
//! into a returned error.

use thiserror::Error;

use crate::context::Failure;

/// Errors raised while defining a composite grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// `define` was called for a name that already has a production.
    #[error("production '{0}' is already defined")]
    RedefinedProduction(String),

    /// A name was referenced or redefined but never defined.
    #[error("production '{0}' is not defined")]
    UndefinedProduction(String),

    /// The grammar completed; definitions can no longer change.
    #[error("grammar can no longer be changed once completed")]
    CompletedGrammar,
}

/// A parse failure promoted into a returned error.
#[derive(Debug, Clone, Error)]
#[error("{message} at {position}")]
pub struct ParserError {
    pub message: String,
    pub position: usize,
}

impl From<Failure> for ParserError {
    fn from(failure: Failure) -> Self {
        ParserError {
            position: failure.position(),
            message: failure.message,
        }
    }
}
