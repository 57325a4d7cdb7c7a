//! CLI driver: compile a source file, or run a line REPL on stdin.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use ourjs::{Error, Node, lower, parse, tokenize};

/// Compile ourjs source to three-address intermediate code
#[derive(Debug, Parser)]
#[command(name = "ourjs", version, long_about = None)]
struct Args {
    /// Source file to compile; starts a REPL when omitted
    file: Option<PathBuf>,

    /// What to print for each compiled source
    #[arg(short, long, value_enum, default_value_t = Emit::Ir)]
    emit: Emit,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The token stream, one token per line
    Tokens,
    /// The syntax tree rendering
    Ast,
    /// Intermediate code
    Ir,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(io::stderr)
        .init();

    match &args.file {
        Some(path) => run_file(path, args.emit),
        None => repl(args.emit),
    }
}

fn run_file(path: &Path, emit: Emit) -> ExitCode {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            return ExitCode::from(2);
        }
    };

    match run(&path.display().to_string(), &text, emit) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.render());
            ExitCode::FAILURE
        }
    }
}

fn repl(emit: Emit) -> ExitCode {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("ourjs > ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                eprintln!("<stdin>: {e}");
                return ExitCode::FAILURE;
            }
            None => {
                println!();
                return ExitCode::SUCCESS;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match run("<stdin>", &line, emit) {
            Ok(output) => print!("{output}"),
            Err(e) => eprintln!("{}", e.render()),
        }
    }
}

fn run(source_name: &str, text: &str, emit: Emit) -> Result<String, Error> {
    let tokens = tokenize(source_name, text)?;
    tracing::debug!(source = source_name, tokens = tokens.len(), "tokenized");

    if emit == Emit::Tokens {
        return Ok(tokens.iter().map(|t| format!("{t}\n")).collect());
    }

    let root = parse(&tokens)?;
    if let Node::StatementList(list) = &root {
        tracing::debug!(source = source_name, statements = list.len(), "parsed");
    }

    if emit == Emit::Ast {
        return Ok(format!("{root}\n"));
    }

    let code = lower(&root);
    tracing::debug!(
        source = source_name,
        instructions = code.lines().count(),
        "lowered"
    );
    Ok(code)
}
