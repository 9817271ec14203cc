use logos::Logos;
use std::fmt;

use crate::source::Span;

/// The closed set of token kinds the parser understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Identifier,
    Equals,
    OpenParen,
    CloseParen,
    BinaryOperator,
    Let,
    EndOfFile,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "Number",
            TokenKind::Identifier => "Identifier",
            TokenKind::Equals => "Equals",
            TokenKind::OpenParen => "OpenParen",
            TokenKind::CloseParen => "CloseParen",
            TokenKind::BinaryOperator => "BinaryOperator",
            TokenKind::Let => "Let",
            TokenKind::EndOfFile => "EndOfFile",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String, // The exact lexeme; "EndOfFile" for the terminator
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            value: value.into(),
            span,
        }
    }

    pub fn end_of_file(at: usize) -> Self {
        Token::new(TokenKind::EndOfFile, "EndOfFile", Span::new(at, at))
    }
}

// Debug listing format: { type: Number, value: "12" }
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ type: {}, value: {:?} }}", self.kind, self.value)
    }
}

// Raw scanner. Words are split into keywords and identifiers after matching,
// and anything no other rule accepts falls through to `Unrecognized`.
#[derive(Logos, Debug, Copy, Clone, PartialEq)]
#[logos(skip r"[ \t\n]+")] // Only space, newline and tab are skippable
enum Lexeme {
    #[regex(r"[0-9]+")]
    Number,
    #[regex(r"[\p{Lu}\p{Ll}\p{Lt}]+")]
    Word,
    #[token("=")]
    Equals,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[regex(r"[+\-*/%]")]
    BinaryOperator,
    #[regex(r".", priority = 0)]
    Unrecognized,
}

fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        "let" => Some(TokenKind::Let),
        _ => None,
    }
}

/// A character the lexer dropped. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct LexWarning {
    pub character: char,
    pub span: Span,
}

impl fmt::Display for LexWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unrecognized character found in source: {:?}",
            self.character
        )
    }
}

/// Scans `input` into tokens, collecting a warning for every character that
/// belongs to no token. The result always ends with exactly one EndOfFile.
pub fn tokenize_with_warnings(input: &str) -> (Vec<Token>, Vec<LexWarning>) {
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();

    for (lexeme, range) in Lexeme::lexer(input).spanned() {
        let span = Span::from(range.clone());
        let slice = &input[range];
        let kind = match lexeme {
            Ok(Lexeme::Number) => TokenKind::Number,
            Ok(Lexeme::Word) => keyword(slice).unwrap_or(TokenKind::Identifier),
            Ok(Lexeme::Equals) => TokenKind::Equals,
            Ok(Lexeme::OpenParen) => TokenKind::OpenParen,
            Ok(Lexeme::CloseParen) => TokenKind::CloseParen,
            Ok(Lexeme::BinaryOperator) => TokenKind::BinaryOperator,
            Ok(Lexeme::Unrecognized) | Err(()) => {
                for (offset, character) in slice.char_indices() {
                    let start = span.start + offset;
                    warnings.push(LexWarning {
                        character,
                        span: Span::new(start, start + character.len_utf8()),
                    });
                }
                continue;
            }
        };
        tokens.push(Token::new(kind, slice, span));
    }

    tokens.push(Token::end_of_file(input.len()));
    (tokens, warnings)
}

/// Scans `input` into tokens. Unrecognized characters are reported on stderr
/// and dropped; lexing itself cannot fail.
pub fn tokenize(input: &str) -> Vec<Token> {
    let (tokens, warnings) = tokenize_with_warnings(input);
    for warning in &warnings {
        eprintln!("Lexer warning [at {}]: {}", warning.span, warning);
    }
    tokens
}
