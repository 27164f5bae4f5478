//! Named-production grammars with forward references and late binding.
//!
//! A grammar definition registers productions by name during
//! [`GrammarDefinition::initialize`]; [`Grammar::reference`] hands out
//! identity-stable placeholders before a name is defined, which is what
//! makes mutually recursive productions possible. After initialization a
//! completion pass wires every placeholder to its final definition and
//! freezes the grammar. Layered definitions (one definition delegating to
//! another, then calling `redefine`/`action` on top) are the way to attach
//! semantic actions to an existing grammar.

use std::collections::HashMap;

use crate::context::ParseResult;
use crate::errors::GrammarError;
use crate::parser::{undefined_with, Parser};
use crate::value::Value;

/// The hook a grammar implements to register its productions.
pub trait GrammarDefinition {
    fn initialize(&self, grammar: &mut Grammar) -> Result<(), GrammarError>;
}

/// A set of named productions; the grammar itself parses via its `start`
/// production and composes with any other combinator.
pub struct Grammar {
    delegate: Parser,
    productions: HashMap<String, Parser>,
    placeholders: HashMap<String, Parser>,
    completed: bool,
}

impl Grammar {
    /// Runs `definition` and the completion pass.
    pub fn new(definition: &dyn GrammarDefinition) -> Result<Grammar, GrammarError> {
        let mut grammar = Grammar {
            delegate: undefined_with("grammar not initialized"),
            productions: HashMap::new(),
            placeholders: HashMap::new(),
            completed: false,
        };
        definition.initialize(&mut grammar)?;
        grammar.complete()?;
        Ok(grammar)
    }

    /// Registers a production.
    pub fn define(&mut self, name: &str, parser: &Parser) -> Result<(), GrammarError> {
        if self.completed {
            return Err(GrammarError::CompletedGrammar);
        }
        if self.productions.contains_key(name) {
            return Err(GrammarError::RedefinedProduction(name.to_owned()));
        }
        self.productions.insert(name.to_owned(), parser.clone());
        Ok(())
    }

    /// A parser for the named production.
    ///
    /// Before completion this returns the placeholder for `name` — the same
    /// node on every call, usable before the production is defined. After
    /// completion it returns the final definition.
    pub fn reference(&mut self, name: &str) -> Result<Parser, GrammarError> {
        if self.completed {
            return self
                .productions
                .get(name)
                .cloned()
                .ok_or_else(|| GrammarError::UndefinedProduction(name.to_owned()));
        }
        let placeholder = self
            .placeholders
            .entry(name.to_owned())
            .or_insert_with(|| undefined_with(&format!("uninitialized production: {name}")));
        Ok(placeholder.clone())
    }

    /// Replaces an existing production.
    pub fn redefine(&mut self, name: &str, parser: &Parser) -> Result<(), GrammarError> {
        self.redefine_with(name, |_| parser.clone())
    }

    /// Replaces an existing production with a function of the old one.
    pub fn redefine_with(
        &mut self,
        name: &str,
        replacement: impl FnOnce(Parser) -> Parser,
    ) -> Result<(), GrammarError> {
        if self.completed {
            return Err(GrammarError::CompletedGrammar);
        }
        match self.productions.get(name).cloned() {
            Some(existing) => {
                self.productions.insert(name.to_owned(), replacement(existing));
                Ok(())
            }
            None => Err(GrammarError::UndefinedProduction(name.to_owned())),
        }
    }

    /// Attaches a semantic action to an existing production.
    pub fn action(
        &mut self,
        name: &str,
        action: impl Fn(Value) -> Value + 'static,
    ) -> Result<(), GrammarError> {
        self.redefine_with(name, move |parser| parser.map(action))
    }

    fn complete(&mut self) -> Result<(), GrammarError> {
        let start = self.reference("start")?;
        self.delegate.set(&start);
        for (name, placeholder) in &self.placeholders {
            match self.productions.get(name) {
                Some(definition) => placeholder.set(definition),
                None => return Err(GrammarError::UndefinedProduction(name.clone())),
            }
        }
        self.completed = true;
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The grammar as a plain parser, delegating to `start`.
    pub fn parser(&self) -> Parser {
        self.delegate.clone()
    }

    pub fn parse(&self, input: &str) -> ParseResult {
        self.delegate.parse(input)
    }

    pub fn accept(&self, input: &str) -> bool {
        self.delegate.accept(input)
    }
}
