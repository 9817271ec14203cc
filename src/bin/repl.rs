use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Cmd, Completer, Context, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use rustyline::{Helper, Highlighter, Hinter, Validator};

use reckon::{Interpreter, ScopeId, TokenKind, tokenize_with_warnings};

const HISTORY_FILE: &str = "reckon_history.txt";

struct ReckonCompleter {
    interpreter: Rc<RefCell<Interpreter>>,
}

impl rustyline::completion::Completer for ReckonCompleter {
    type Candidate = String;

    // Completes the identifier that ends at the cursor
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let (tokens, _) = tokenize_with_warnings(&line[..pos]);
        let prefix = tokens
            .iter()
            .rev()
            .find(|t| t.kind != TokenKind::EndOfFile)
            .filter(|t| t.kind == TokenKind::Identifier && t.span.end == pos)
            .map(|t| t.value.clone());

        let Some(prefix) = prefix else {
            return Ok((pos, vec![]));
        };
        let mut candidates: Vec<String> = self
            .interpreter
            .borrow()
            .env()
            .identifiers(ScopeId::GLOBAL)
            .into_iter()
            .filter_map(|id| id.strip_prefix(prefix.as_str()).map(str::to_string))
            .filter(|rest| !rest.is_empty())
            .collect();
        candidates.sort();
        Ok((pos, candidates))
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct InputHelper {
    #[rustyline(Validator)]
    validator: ReckonValidator,
    #[rustyline(Highlighter)]
    highlighter: ReckonHighlighter,
    #[rustyline(Completer)]
    completer: ReckonCompleter,
}

struct ReckonValidator;

impl Validator for ReckonValidator {
    // Keeps reading lines while a '(' is still open
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let mut depth = 0usize;
        for (i, c) in ctx.input().chars().enumerate() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => {
                    return Ok(ValidationResult::Invalid(Some(format!(
                        "  - Unmatched ')' at position {}",
                        i
                    ))));
                }
                ')' => depth -= 1,
                _ => {}
            }
        }
        if depth > 0 {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

struct ReckonHighlighter;

impl Highlighter for ReckonHighlighter {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        let mut open = Vec::new();
        let mut pairs = Vec::new();
        let mut unmatched = HashSet::new();
        for (i, c) in line.char_indices() {
            match c {
                '(' => open.push(i),
                ')' => match open.pop() {
                    Some(o) => pairs.push((o, i)),
                    None => {
                        unmatched.insert(i);
                    }
                },
                _ => {}
            }
        }
        unmatched.extend(open);

        // The pair touching the cursor is emphasised
        let touches = |i: usize| i == pos || Some(i) == pos.checked_sub(1);
        let active = pairs
            .iter()
            .find(|(o, c)| touches(*o) || touches(*c))
            .copied();

        if unmatched.is_empty() && active.is_none() {
            return Cow::Borrowed(line);
        }

        let mut highlighted = String::with_capacity(line.len() + 16);
        for (i, c) in line.char_indices() {
            if unmatched.contains(&i) {
                highlighted.push_str(&format!("\x1b[1;31m{}\x1b[0m", c)); // Red for unmatched
            } else if active.is_some_and(|(o, cl)| i == o || i == cl) {
                // Blue for the active pair
                highlighted.push_str(&format!("\x1b[1;34m{}\x1b[0m", c));
            } else {
                highlighted.push(c);
            }
        }
        Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn main() -> rustyline::Result<()> {
    println!("Reckon REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl-D to quit.");

    let interpreter = Rc::new(RefCell::new(Interpreter::new()));
    let h = InputHelper {
        highlighter: ReckonHighlighter,
        validator: ReckonValidator,
        completer: ReckonCompleter {
            interpreter: interpreter.clone(),
        },
    };
    let config = rustyline::config::Config::builder()
        .edit_mode(rustyline::EditMode::Vi)
        .build();
    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(h));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('s'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Newline),
    );
    if rl.load_history(HISTORY_FILE).is_err() {
        println!("No previous history.");
    }

    loop {
        match rl.readline("reckon> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let trimmed_input = line.trim();
                if trimmed_input.is_empty() {
                    continue;
                }
                if trimmed_input.eq_ignore_ascii_case("exit") {
                    break;
                }

                let (result, warnings) = interpreter.borrow_mut().eval_str_with_warnings(&line);
                for warning in &warnings {
                    if warning.pretty_print("REPL", &line).is_err() {
                        eprintln!("Warning: {}", warning);
                    }
                }
                match result {
                    Ok(value) => println!("{}", value),
                    Err(e) => {
                        if e.pretty_print("REPL", &line).is_err() {
                            eprintln!("Error: {}", e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type 'exit' or Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                eprintln!("Readline Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history(HISTORY_FILE)
}
