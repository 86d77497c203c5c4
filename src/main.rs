use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use fhll::{
    ast::Module, config::Config, error::Error, format_module, interpreter::lexer::LexerConfig, parse,
    run, validate,
};
use tracing_subscriber::EnvFilter;

/// Exit code used when the front-end cannot write its own output.
const OUTPUT_FAILURE: u8 = 3;

/// fhll runs programs written in FHLL, a small statically typed language
/// with structs, nested enums and pattern matching.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Deepest chain of nested calls a program may reach.
    #[arg(long, global = true, default_value_t = 128)]
    max_recursion_depth: usize,

    /// Longest identifier accepted, in characters.
    #[arg(long, global = true, default_value_t = 128)]
    max_identifier_len: usize,

    /// Longest string literal accepted, in characters.
    #[arg(long, global = true, default_value_t = 128)]
    max_string_len: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the syntax tree of a source file.
    Print { file: PathBuf },
    /// Prints a source file in canonical form.
    Fmt { file: PathBuf },
    /// Validates and runs a source file, printing the returned value.
    Execute {
        file:  PathBuf,
        /// The function to start from.
        #[arg(long, default_value = "main")]
        entry: String,
    },
}

impl Args {
    fn config(&self) -> Config {
        Config { lexer:               LexerConfig { max_identifier_len: self.max_identifier_len,
                                                    max_string_len: self.max_string_len,
                                                    ..LexerConfig::default() },
                 max_recursion_depth: self.max_recursion_depth, }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("FHLL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();
    let config = args.config();

    let outcome = match &args.command {
        Command::Print { file } => read_module(file, &config).map(|module| format!("{module:#?}\n")),
        Command::Fmt { file } => read_module(file, &config).map(|module| format_module(&module)),
        Command::Execute { file, entry } => execute(file, entry, &config),
    };

    match outcome {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if stdout.write_all(output.as_bytes())
                     .and_then(|()| stdout.flush())
                     .is_err()
            {
                return ExitCode::from(OUTPUT_FAILURE);
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{e}");
            u8::try_from(e.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
        },
    }
}

fn read_module(path: &Path, config: &Config) -> Result<Module, Error> {
    let file = File::open(path)?;
    parse(file, &config.lexer)
}

fn execute(path: &Path, entry: &str, config: &Config) -> Result<String, Error> {
    let module = read_module(path, config)?;
    let program = validate(&module)?;
    Ok(run(&program, entry, config)?.map_or_else(String::new, |value| {
                                                    format!("{} {value}\n", value.type_name())
                                                }))
}
