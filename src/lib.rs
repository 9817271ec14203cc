// Declare modules publicly so they are part of the library interface
pub mod ast;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod pretty_print;
pub mod source;
pub mod value;

pub use ast::{BinaryOperator, Node, NodeKind};
pub use environment::{EnvError, Environment, ScopeId};
pub use evaluator::{EvalError, EvalResult, evaluate, evaluate_with_limits};
pub use interpreter::{Error, Interpreter};
pub use lexer::{LexWarning, Token, TokenKind, tokenize, tokenize_with_warnings};
pub use parser::{ParseError, Parser, parse_str};
pub use source::Span;
pub use value::RuntimeVal;
