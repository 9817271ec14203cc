use crate::environment::{EnvError, Environment, ScopeId};
use crate::evaluator::{EvalError, evaluate};
use crate::lexer::{LexWarning, tokenize_with_warnings};
use crate::parser::{ParseError, Parser, parse_str};
use crate::source::Span;
use crate::value::RuntimeVal;
use thiserror::Error;

/// Any failure of the lex → parse → evaluate pipeline for one input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Runs independent sources against one long-lived global scope.
///
/// A failing source leaves the environment exactly as it was: evaluation only
/// reads bindings, and nothing is declared until the host asks for it.
#[derive(Debug, Clone)]
pub struct Interpreter {
    env: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Environment::new_global_populated(),
        }
    }

    pub fn with_environment(env: Environment) -> Self {
        Interpreter { env }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Seeds a global variable.
    pub fn declare(&mut self, name: &str, value: RuntimeVal) -> Result<RuntimeVal, EnvError> {
        self.env.declare(ScopeId::GLOBAL, name, value, Span::default())
    }

    /// Lexes, parses and evaluates `source`. Lexer warnings go to stderr.
    pub fn eval_str(&mut self, source: &str) -> Result<RuntimeVal, Error> {
        let program = parse_str(source)?;
        Ok(evaluate(&program, &self.env, ScopeId::GLOBAL)?)
    }

    /// Like [`Interpreter::eval_str`], but hands lexer warnings back to the
    /// caller instead of printing them.
    pub fn eval_str_with_warnings(
        &mut self,
        source: &str,
    ) -> (Result<RuntimeVal, Error>, Vec<LexWarning>) {
        let (tokens, warnings) = tokenize_with_warnings(source);
        let result = Parser::new(tokens)
            .parse()
            .map_err(Error::from)
            .and_then(|program| Ok(evaluate(&program, &self.env, ScopeId::GLOBAL)?));
        (result, warnings)
    }
}
