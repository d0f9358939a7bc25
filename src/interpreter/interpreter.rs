use std::{rc::Rc, time::Instant};

use tracing::debug;

use crate::{
    ast::ast::Node,
    errors::errors::Error,
    evaluator::evaluator::Evaluator,
    lexer::{lexer::tokenize, stats::LexicalStats, tokens::Token},
    parser::parser::parse,
    runtime::environment::Environment,
    semantics::checker::SemanticsChecker,
};

/// Source to result in one place: tokenize, parse, check, then evaluate.
/// Each stage only starts once the previous one succeeded.
#[derive(Debug, Clone)]
pub struct Interpreter {
    file_name: String,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new("shell")
    }
}

impl Interpreter {
    /// `file_name` is only used to label error positions.
    pub fn new(file_name: &str) -> Self {
        Interpreter {
            file_name: file_name.to_string(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, Error> {
        let start = Instant::now();
        let tokens = tokenize(source.to_string(), Some(self.file_name.clone()))?;
        debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

        Ok(tokens)
    }

    pub fn lexical_stats(&self, source: &str) -> Result<LexicalStats, Error> {
        Ok(LexicalStats::collect(&self.tokenize(source)?))
    }

    pub fn parse(&self, source: &str) -> Result<Vec<Node>, Error> {
        let tokens = self.tokenize(source)?;

        let start = Instant::now();
        let (_, nodes) = parse(tokens, Rc::new(self.file_name.clone()));
        let nodes = nodes?;
        debug!(elapsed = ?start.elapsed(), "parsed");

        Ok(nodes)
    }

    /// Parses and checks `source`, returning the annotated program.
    pub fn check(&self, source: &str) -> Result<Vec<Node>, Error> {
        let nodes = self.parse(source)?;

        let start = Instant::now();
        SemanticsChecker::new().check_program(&nodes)?;
        debug!(elapsed = ?start.elapsed(), "checked");

        Ok(nodes)
    }

    pub fn run(&self, source: &str, environment: &mut dyn Environment) -> Result<(), Error> {
        let nodes = self.check(source)?;

        let start = Instant::now();
        Evaluator::new(environment).evaluate_program(&nodes)?;
        debug!(elapsed = ?start.elapsed(), "evaluated");

        Ok(())
    }
}
