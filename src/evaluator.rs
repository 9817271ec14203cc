use crate::ast::{BinaryOperator, Node, NodeKind};
use crate::environment::{EnvError, Environment, ScopeId};
use crate::source::Span;
use crate::value::RuntimeVal;
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Env(#[from] EnvError), // Errors from variable resolution
    #[error("Evaluation Error: {kind} node cannot be evaluated here")]
    UnexpectedNode { kind: &'static str, span: Span }, // A Program below the root
    #[error("Evaluation Error: expression nests deeper than {limit} levels")]
    TooDeep { limit: usize, span: Span },
}

// Result type alias for convenience
pub type EvalResult<T = RuntimeVal> = Result<T, EvalError>;

// --- Evaluate Function ---

/// Default limit on nested expression levels, matching the parser's `MAX_HEIGHT`.
pub const MAX_DEPTH: usize = 1000;

/// Evaluates `node` with variables resolved from `scope`.
///
/// A `Program` evaluates its statements in order and yields the last value,
/// or `Null` when it has none. A `Program` is only accepted at the root.
pub fn evaluate(node: &Node, env: &Environment, scope: ScopeId) -> EvalResult {
    evaluate_with_limits(node, env, scope, MAX_DEPTH)
}

/// Like [`evaluate`], failing with `TooDeep` once an expression tree is
/// taller than `max_depth`.
pub fn evaluate_with_limits(
    node: &Node,
    env: &Environment,
    scope: ScopeId,
    max_depth: usize,
) -> EvalResult {
    let walker = Walker {
        env,
        scope,
        max_depth,
    };
    match &node.kind {
        NodeKind::Program(body) => walker.evaluate_program(body),
        _ => walker.evaluate_expr(node, 1),
    }
}

// Everything that stays fixed while walking one tree
struct Walker<'a> {
    env: &'a Environment,
    scope: ScopeId,
    max_depth: usize,
}

impl Walker<'_> {
    fn evaluate_program(&self, body: &[Node]) -> EvalResult {
        let mut last = RuntimeVal::Null;
        for stmt in body {
            last = self.evaluate_expr(stmt, 1)?;
        }
        Ok(last)
    }

    // `depth` counts `node` and its ancestors, the root expression being 1
    fn evaluate_expr(&self, node: &Node, depth: usize) -> EvalResult {
        if depth > self.max_depth {
            return Err(EvalError::TooDeep {
                limit: self.max_depth,
                span: node.span,
            });
        }
        match &node.kind {
            NodeKind::NumericLiteral(value) => Ok(RuntimeVal::Number(*value)),
            NodeKind::Identifier(symbol) => Ok(self.env.lookup(self.scope, symbol, node.span)?),
            NodeKind::BinaryExpr {
                left,
                right,
                operator,
            } => self.evaluate_binary_expr(left, right, *operator, depth),
            NodeKind::Program(_) => Err(EvalError::UnexpectedNode {
                kind: node.kind.name(),
                span: node.span,
            }),
        }
    }

    // Left is fully evaluated before right. Non-numeric operands yield Null.
    fn evaluate_binary_expr(
        &self,
        left: &Node,
        right: &Node,
        operator: BinaryOperator,
        depth: usize,
    ) -> EvalResult {
        let lhs = self.evaluate_expr(left, depth + 1)?;
        let rhs = self.evaluate_expr(right, depth + 1)?;
        match (lhs, rhs) {
            (RuntimeVal::Number(l), RuntimeVal::Number(r)) => {
                Ok(RuntimeVal::Number(operator.apply(l, r)))
            }
            _ => Ok(RuntimeVal::Null),
        }
    }
}
