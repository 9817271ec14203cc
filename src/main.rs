use std::io::{self, Read};
use std::process::ExitCode;

use reckon::{Environment, Parser, ScopeId, evaluate, tokenize_with_warnings};

enum Mode {
    Tokens,
    Ast,
    Evaluate,
}

fn usage() -> ExitCode {
    eprintln!("Usage: reckon [--tokens | --ast] [PATH]");
    eprintln!("Reads PATH (or stdin when omitted) and prints its value.");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    let mut mode = Mode::Evaluate;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => mode = Mode::Tokens,
            "--ast" => mode = Mode::Ast,
            "-h" | "--help" => return usage(),
            flag if flag.starts_with("--") => return usage(),
            _ if path.is_none() => path = Some(arg.clone()),
            _ => return usage(),
        }
    }

    let (name, input) = match read_source(path.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path.as_deref().unwrap_or("stdin"), e);
            return ExitCode::FAILURE;
        }
    };

    let (tokens, warnings) = tokenize_with_warnings(&input);
    for warning in &warnings {
        if warning.pretty_print(&name, &input).is_err() {
            eprintln!("Lexer warning [at {}]: {}", warning.span, warning);
        }
    }

    if let Mode::Tokens = mode {
        for token in &tokens {
            println!("{}", token);
        }
        return ExitCode::SUCCESS;
    }

    let program = match Parser::new(tokens).parse() {
        Ok(program) => program,
        Err(e) => {
            if e.pretty_print(&name, &input).is_err() {
                eprintln!("{}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    if let Mode::Ast = mode {
        println!("{}", program);
        return ExitCode::SUCCESS;
    }

    let env = Environment::new_global_populated();
    match evaluate(&program, &env, ScopeId::GLOBAL) {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            if e.pretty_print(&name, &input).is_err() {
                eprintln!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: Option<&str>) -> io::Result<(String, String)> {
    match path {
        Some(path) => Ok((path.to_string(), std::fs::read_to_string(path)?)),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(("stdin".to_string(), input))
        }
    }
}
