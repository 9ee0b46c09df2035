use clap::Parser;
use loxi::config;
use loxi::error::LoxError;
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for a small dynamically-typed, class-based
/// scripting language
#[derive(Parser, Debug)]
#[command(name = "loxi")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for a small scripting language")]
struct CliArgs {
    /// Script file to execute
    #[arg(value_name = "FILE", conflicts_with = "source")]
    script: Option<PathBuf>,

    /// Inline source to execute instead of a file
    #[arg(short = 'e', long = "eval", value_name = "SOURCE")]
    source: Option<String>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let source = match read_source(&args) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("loxi: {message}");
            return ExitCode::FAILURE;
        }
    };

    match loxi::run(&source, std::io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn read_source(args: &CliArgs) -> Result<String, String> {
    if let Some(source) = &args.source {
        return Ok(source.clone());
    }
    match &args.script {
        Some(path) => {
            std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
        }
        None => Err("expected a script file or -e <SOURCE>".to_string()),
    }
}

fn report_error(err: &LoxError) {
    eprintln!("loxi: {err}");
}
