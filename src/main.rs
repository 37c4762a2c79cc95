//! MiniC compiler CLI
//!
//! Reads a unit from a file or stdin and writes its LLVM assembly.

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use minic::{ast::printer::PrettyPrint, compile_source, display_error, CompileOptions};

#[derive(Parser)]
#[command(name = "minic")]
#[command(about = "MiniC to LLVM IR compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Source file; reads stdin when absent
    path: Option<PathBuf>,

    /// Write the generated document to a file
    #[arg(short, long, num_args = 0..=1, default_missing_value = "out.ll")]
    emit: Option<PathBuf>,

    /// Print the checked AST and log every stage
    #[arg(short, long)]
    verbose: bool,

    /// Name of the compilation unit (defaults to the file stem)
    #[arg(long)]
    unit_name: Option<String>,

    /// Backend to render the module with
    #[cfg(feature = "llvm")]
    #[arg(long, value_enum, default_value = "text")]
    backend: BackendArg,
}

#[cfg(feature = "llvm")]
#[derive(Clone, Copy, clap::ValueEnum)]
enum BackendArg {
    Text,
    Llvm,
}

fn read_source(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let source = read_source(cli.path.as_ref())?;

    let file = cli
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| String::from("stdin"));
    let unit_name = cli
        .unit_name
        .clone()
        .or_else(|| {
            cli.path
                .as_ref()
                .and_then(|path| path.file_stem())
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| String::from("stdin"));

    #[allow(unused_mut)]
    let mut options = CompileOptions {
        unit_name,
        ..CompileOptions::default()
    };
    #[cfg(feature = "llvm")]
    {
        options.backend = match cli.backend {
            BackendArg::Text => minic::Backend::Text,
            BackendArg::Llvm => minic::Backend::Llvm,
        };
    }

    let output = match compile_source(&source, &options) {
        Ok(output) => output,
        Err(err) => {
            display_error(&err, &source, &file);
            return Ok(false);
        }
    };

    if cli.verbose {
        print!("{}", output.root.pretty());
    }

    match &cli.emit {
        Some(out) => fs::write(out, &output.text)
            .with_context(|| format!("failed to write {}", out.display()))?,
        None => print!("{}", output.text),
    }

    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(1)
        }
    }
}
