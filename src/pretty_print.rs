use crate::environment::EnvError;
use crate::evaluator::EvalError;
use crate::interpreter::Error;
use crate::lexer::LexWarning;
use crate::parser::ParseError;
use crate::source::Span;
use ariadne::{Label, Report, ReportKind, Source};
use std::io;

type SourceSpan<'a> = (&'a str, std::ops::Range<usize>);

fn simple_report<'a>(
    kind: ReportKind<'a>,
    name: &'a str,
    span: Span,
    message: String,
    label: String,
) -> Report<'a, SourceSpan<'a>> {
    Report::build(kind, (name, span.to_range()))
        .with_message(message)
        .with_label(Label::new((name, span.to_range())).with_message(label))
        .finish()
}

fn emit<'a>(report: Report<'a, SourceSpan<'a>>, name: &'a str, input: &str) -> io::Result<()> {
    report.eprint((name, Source::from(input)))
}

impl LexWarning {
    pub fn pretty_print(&self, name: &str, input: &str) -> io::Result<()> {
        let report = simple_report(
            ReportKind::Warning,
            name,
            self.span,
            format!("Unrecognized character {:?}", self.character),
            "This character is ignored".to_string(),
        );
        emit(report, name, input)
    }
}

impl ParseError {
    pub fn pretty_print(&self, name: &str, input: &str) -> io::Result<()> {
        let report = match self {
            ParseError::UnexpectedToken { found, expected } => simple_report(
                ReportKind::Error,
                name,
                found.span,
                format!("Unexpected token: {}", found.kind),
                format!("Expected {expected}"),
            ),
            ParseError::MissingCloseParen { found, open } => {
                Report::build(ReportKind::Error, (name, found.span.to_range()))
                    .with_message("Unclosed parenthesis")
                    .with_label(
                        Label::new((name, found.span.to_range()))
                            .with_message(format!("Expected ')', found {}", found.kind)),
                    )
                    .with_label(
                        Label::new((name, open.to_range()))
                            .with_message("Parenthesis opened here"),
                    )
                    .finish()
            }
            ParseError::TooDeep { span, limit } => simple_report(
                ReportKind::Error,
                name,
                *span,
                "Expression nests too deeply".to_string(),
                format!("Nesting exceeds {limit} levels here"),
            ),
        };
        emit(report, name, input)
    }
}

impl EvalError {
    pub fn pretty_print(&self, name: &str, input: &str) -> io::Result<()> {
        let report = match self {
            EvalError::Env(EnvError::UnresolvedVariable(symbol, span)) => simple_report(
                ReportKind::Error,
                name,
                *span,
                format!("Unresolved variable `{}`", symbol),
                "This name is not declared in any enclosing scope".to_string(),
            ),
            EvalError::Env(EnvError::DuplicateDeclaration(symbol, span)) => simple_report(
                ReportKind::Error,
                name,
                *span,
                format!("Duplicate declaration of `{}`", symbol),
                "This name is already declared in this scope".to_string(),
            ),
            EvalError::Env(EnvError::UnknownScope(scope, span)) => simple_report(
                ReportKind::Error,
                name,
                *span,
                format!("Unknown scope {:?}", scope),
                "This scope belongs to a different environment".to_string(),
            ),
            EvalError::UnexpectedNode { kind, span } => simple_report(
                ReportKind::Error,
                name,
                *span,
                format!("Cannot evaluate {} node", kind),
                "Only expressions may appear here".to_string(),
            ),
            EvalError::TooDeep { limit, span } => simple_report(
                ReportKind::Error,
                name,
                *span,
                "Expression nests too deeply".to_string(),
                format!("Evaluation exceeds {limit} levels here"),
            ),
        };
        emit(report, name, input)
    }
}

impl Error {
    pub fn pretty_print(&self, name: &str, input: &str) -> io::Result<()> {
        match self {
            Error::Parse(e) => e.pretty_print(name, input),
            Error::Eval(e) => e.pretty_print(name, input),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::lexer::tokenize_with_warnings;

    #[test]
    fn test_reports_render_for_every_stage() {
        let mut interpreter = Interpreter::new();
        let too_deep = "(".repeat(300);
        for input in ["1 + )", "(2 * 3", "width * 2", too_deep.as_str()] {
            let error = interpreter.eval_str(input).expect_err("input should fail");
            assert!(error.pretty_print("test", input).is_ok(), "Input: '{}'", input);
        }

        let input = "4 $ 2";
        let (_, warnings) = tokenize_with_warnings(input);
        assert!(warnings[0].pretty_print("test", input).is_ok());
    }
}
