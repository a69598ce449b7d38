pub mod util;
pub mod interpreter;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use crate::interpreter::environment::Environment;
use crate::interpreter::evaluator::RuntimeError;
use crate::interpreter::lexer::LexerError;
use crate::interpreter::parser::ParseError;

pub use crate::interpreter::evaluator::execute;
pub use crate::interpreter::lexer::tokenize;
pub use crate::interpreter::parser::parse;

pub const BANNER: &str = "MiniLang Interpreter (type `exit` to quit)";
pub const PROMPT: &str = ">>> ";

#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Program to run; starts an interactive session when omitted")]
    pub input: Option<PathBuf>,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(LexerError),
    #[error(transparent)]
    Parse(ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("Could not read file {}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        match err {
            ParseError::Lexer(err) => Error::Lex(err),
            err => Error::Parse(err),
        }
    }
}

/// Parses and runs one chunk of source text against `environment`.
pub fn run_source(source: &str, environment: &mut Environment, out: &mut impl Write) -> Result<(), Error> {
    let statements = parse(source)?;
    tracing::debug!(statements = statements.len(), "parsed input");

    execute(&statements, environment, out)?;
    Ok(())
}

/// Runs a whole program file in a fresh environment and returns that environment.
pub fn run_file(path: &Path, out: &mut impl Write) -> Result<Environment, Error> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::File { path: path.to_owned(), source })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded program");

    let mut environment = Environment::new();
    run_source(&source, &mut environment, out)?;

    tracing::debug!(variables = ?environment.variables(), "program finished");
    Ok(environment)
}

/// Interactive loop: every line is a separate program sharing `environment`.
///
/// Stops at end of input or on a line reading `exit`. Errors are reported on
/// `err` and do not end the session.
pub fn repl(input: impl BufRead, out: &mut impl Write, err: &mut impl Write, environment: &mut Environment) -> std::io::Result<()> {
    writeln!(out, "{}", BANNER)?;

    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        if line == "exit" {
            break;
        }

        if let Err(error) = run_source(&line, environment, &mut *out) {
            writeln!(err, "Error: {}", error)?;
        }

        tracing::debug!(variables = environment.len(), "input finished");
    }

    Ok(())
}

pub fn init_tracing(verbose: bool) {
    // RUST_LOG takes precedence over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

pub fn run() -> Result<(), Error> {
    let config: Config = Config::parse();
    init_tracing(config.verbose);

    match &config.input {
        Some(path) => {
            run_file(path, &mut std::io::stdout().lock())?;
        },
        None => {
            let mut environment = Environment::new();
            repl(std::io::stdin().lock(), &mut std::io::stdout(), &mut std::io::stderr(), &mut environment)?;
        },
    }

    Ok(())
}
