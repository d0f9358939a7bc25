use std::{fs::read_to_string, path::PathBuf, process::ExitCode};

use clap::Parser;
use mystic::{
    display_error, errors::errors::Error, interpreter::interpreter::Interpreter,
    runtime::environment::ConsoleEnvironment,
};
use tracing_subscriber::EnvFilter;

/// Runs a mystic program. Input for `raid` is read from stdin, one value per
/// line, and every `exodus` prints one line to stdout.
#[derive(Parser, Debug)]
#[command(name = "mystic", version, about)]
struct Args {
    /// Program to run
    file: PathBuf,

    /// Stop after semantic analysis
    #[arg(long)]
    check: bool,

    /// Print the token stream and exit
    #[arg(long)]
    dump_tokens: bool,

    /// Print token counts per category and exit
    #[arg(long)]
    lexer_stats: bool,

    /// Print the parsed program and exit
    #[arg(long)]
    dump_ast: bool,
}

fn init_logging() {
    // Silent unless RUST_LOG asks for output
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn execute(args: &Args, interpreter: &Interpreter, source: &str) -> Result<(), Error> {
    if args.dump_tokens {
        for token in interpreter.tokenize(source)? {
            println!("{:?} {:?}", token.kind, token.value);
        }
        return Ok(());
    }

    if args.lexer_stats {
        println!("{}", interpreter.lexical_stats(source)?);
        return Ok(());
    }

    if args.dump_ast {
        println!("{:#?}", interpreter.parse(source)?);
        return Ok(());
    }

    if args.check {
        interpreter.check(source)?;
        return Ok(());
    }

    let mut environment = ConsoleEnvironment::stdio();
    interpreter.run(source, &mut environment)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let source = match read_to_string(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", args.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let interpreter = Interpreter::new(&file_name);

    match execute(&args, &interpreter, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            display_error(&error, &source);
            ExitCode::FAILURE
        }
    }
}
