use crate::source::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind, // The syntactic shape
    pub span: Span,     // The source span it covers
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn new_program(body: Vec<Node>, span: Span) -> Self {
        Node::new(NodeKind::Program(body), span)
    }

    pub fn new_number(value: f64, span: Span) -> Self {
        Node::new(NodeKind::NumericLiteral(value), span)
    }

    pub fn new_identifier(symbol: impl Into<String>, span: Span) -> Self {
        Node::new(NodeKind::Identifier(symbol.into()), span)
    }

    /// The span of a binary expression always covers both operands.
    pub fn new_binary(left: Node, operator: BinaryOperator, right: Node) -> Self {
        let span = left.span.merge(right.span);
        Node::new(
            NodeKind::BinaryExpr {
                left: Box::new(left),
                right: Box::new(right),
                operator,
            },
            span,
        )
    }
}

/// Every shape the parser can produce. `Program` is the root; the other
/// variants are expressions, and any expression may stand as a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Vec<Node>),
    NumericLiteral(f64),
    Identifier(String),
    BinaryExpr {
        left: Box<Node>,
        right: Box<Node>,
        operator: BinaryOperator,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program(_) => "Program",
            NodeKind::NumericLiteral(_) => "NumericLiteral",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::BinaryExpr { .. } => "BinaryExpr",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOperator {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Sub),
            "*" => Some(BinaryOperator::Mul),
            "/" => Some(BinaryOperator::Div),
            "%" => Some(BinaryOperator::Rem),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
        }
    }

    /// IEEE double arithmetic. `%` is the floating remainder, and division by
    /// zero yields an infinity or NaN.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOperator::Add => lhs + rhs,
            BinaryOperator::Sub => lhs - rhs,
            BinaryOperator::Mul => lhs * rhs,
            BinaryOperator::Div => lhs / rhs,
            BinaryOperator::Rem => lhs % rhs,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// Fully parenthesised rendering, one statement per line for programs
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Program(body) => {
                let mut first = true;
                for stmt in body {
                    if !first {
                        writeln!(f)?;
                    }
                    write!(f, "{}", stmt)?;
                    first = false;
                }
                Ok(())
            }
            NodeKind::NumericLiteral(n) => write!(f, "{}", n),
            NodeKind::Identifier(symbol) => write!(f, "{}", symbol),
            NodeKind::BinaryExpr {
                left,
                right,
                operator,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lexemes() {
        for op in [
            BinaryOperator::Add,
            BinaryOperator::Sub,
            BinaryOperator::Mul,
            BinaryOperator::Div,
            BinaryOperator::Rem,
        ] {
            assert_eq!(BinaryOperator::from_lexeme(op.symbol()), Some(op));
        }
        assert_eq!(BinaryOperator::from_lexeme("="), None);
        assert_eq!(BinaryOperator::from_lexeme("**"), None);
    }

    #[test]
    fn test_apply_follows_float_semantics() {
        assert_eq!(BinaryOperator::Rem.apply(6.0, 4.0), 2.0);
        assert_eq!(BinaryOperator::Rem.apply(-7.0, 3.0), -1.0);
        assert_eq!(BinaryOperator::Div.apply(1.0, 0.0), f64::INFINITY);
        assert!(BinaryOperator::Div.apply(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_binary_span_covers_operands() {
        let node = Node::new_binary(
            Node::new_number(1.0, Span::new(0, 1)),
            BinaryOperator::Add,
            Node::new_identifier("x", Span::new(4, 5)),
        );
        assert_eq!(node.span, Span::new(0, 5));
        assert_eq!(node.to_string(), "(1 + x)");
    }
}
