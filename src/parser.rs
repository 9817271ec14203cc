use crate::ast::{BinaryOperator, Node};
use crate::lexer::{Token, TokenKind};
use crate::source::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(
        "Parse Error [at {}]: Unexpected token {}, expected {expected}",
        .found.span,
        .found
    )]
    UnexpectedToken { found: Token, expected: String },
    #[error(
        "Parse Error [at {}]: Unexpected token {} inside parenthesised expression, expected ')' to close '(' at {open}",
        .found.span,
        .found
    )]
    MissingCloseParen { found: Token, open: Span },
    #[error("Parse Error [at {span}]: Expression nests deeper than {limit} levels")]
    TooDeep { span: Span, limit: usize },
}

// Result type alias for convenience
pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest parenthesis nesting the parser descends into.
pub const MAX_NESTING: usize = 256;
/// Tallest expression tree the parser builds, counting leaves as height 1.
pub const MAX_HEIGHT: usize = 1000;

// A node together with its height
type Parsed = (Node, usize);

/// Recursive-descent parser over an owned token vector. The cursor only
/// moves forward and never looks further ahead than the current token.
pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    nesting: usize,
}

impl Parser {
    /// Guarantees the stream ends with EndOfFile so `at` is always valid.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfFile) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::end_of_file(end));
        }
        Parser {
            tokens,
            cursor: 0,
            nesting: 0,
        }
    }

    fn not_eof(&self) -> bool {
        self.at().kind != TokenKind::EndOfFile
    }

    // The current token. Past the end, EndOfFile is repeated.
    fn at(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.cursor.min(last)]
    }

    // Consumes the current token.
    fn eat(&mut self) -> Token {
        let token = self.at().clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    // Returns the operator if the current token is one of `accepted`.
    fn at_operator(&self, accepted: &[BinaryOperator]) -> Option<BinaryOperator> {
        let token = self.at();
        if token.kind != TokenKind::BinaryOperator {
            return None;
        }
        BinaryOperator::from_lexeme(&token.value).filter(|op| accepted.contains(op))
    }

    // Builds `left operator right`, refusing trees taller than MAX_HEIGHT.
    fn fold(
        (left, left_height): Parsed,
        operator: BinaryOperator,
        (right, right_height): Parsed,
    ) -> ParseResult<Parsed> {
        let height = left_height.max(right_height) + 1;
        if height > MAX_HEIGHT {
            return Err(ParseError::TooDeep {
                span: left.span.merge(right.span),
                limit: MAX_HEIGHT,
            });
        }
        Ok((Node::new_binary(left, operator, right), height))
    }

    /// Parses the whole stream into one Program node.
    pub fn parse(mut self) -> ParseResult<Node> {
        let mut body = Vec::new();
        while self.not_eof() {
            body.push(self.parse_stmt()?);
        }
        let end = self.at().span.end;
        Ok(Node::new_program(body, Span::new(0, end)))
    }

    fn parse_stmt(&mut self) -> ParseResult<Node> {
        self.parse_expr()
    }

    pub fn parse_expr(&mut self) -> ParseResult<Node> {
        self.parse_additive_expr().map(|(node, _)| node)
    }

    fn parse_additive_expr(&mut self) -> ParseResult<Parsed> {
        const ADDITIVE: [BinaryOperator; 2] = [BinaryOperator::Add, BinaryOperator::Sub];
        let mut left = self.parse_multiplicative_expr()?;
        while let Some(operator) = self.at_operator(&ADDITIVE) {
            self.eat();
            let right = self.parse_multiplicative_expr()?;
            left = Self::fold(left, operator, right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self) -> ParseResult<Parsed> {
        const MULTIPLICATIVE: [BinaryOperator; 3] =
            [BinaryOperator::Mul, BinaryOperator::Div, BinaryOperator::Rem];
        let mut left = self.parse_primary_expr()?;
        while let Some(operator) = self.at_operator(&MULTIPLICATIVE) {
            self.eat();
            let right = self.parse_primary_expr()?;
            left = Self::fold(left, operator, right)?;
        }
        Ok(left)
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Parsed> {
        match self.at().kind {
            TokenKind::Identifier => {
                let token = self.eat();
                Ok((Node::new_identifier(token.value, token.span), 1))
            }
            TokenKind::Number => {
                let token = self.eat();
                // Lexed digit runs always parse; hand-built tokens may not
                match token.value.parse::<f64>() {
                    Ok(value) => Ok((Node::new_number(value, token.span), 1)),
                    Err(_) => Err(ParseError::UnexpectedToken {
                        found: token,
                        expected: "a numeric literal".to_string(),
                    }),
                }
            }
            TokenKind::OpenParen => {
                let open = self.eat().span;
                if self.nesting == MAX_NESTING {
                    return Err(ParseError::TooDeep {
                        span: open,
                        limit: MAX_NESTING,
                    });
                }
                self.nesting += 1;
                let value = self.parse_additive_expr();
                self.nesting -= 1;
                let value = value?;
                let close = self.eat();
                if close.kind != TokenKind::CloseParen {
                    return Err(ParseError::MissingCloseParen { found: close, open });
                }
                Ok(value)
            }
            _ => Err(ParseError::UnexpectedToken {
                found: self.at().clone(),
                expected: "a number, an identifier or '('".to_string(),
            }),
        }
    }
}

/// Lexes and parses `input` in one step. Lexer warnings go to stderr.
pub fn parse_str(input: &str) -> ParseResult<Node> {
    let tokens = crate::lexer::tokenize(input);
    Parser::new(tokens).parse()
}
