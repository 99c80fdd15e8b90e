use std::{fs::read_to_string, path::PathBuf, process::ExitCode, time::Instant};

use clap::Parser;
use colored::Colorize;
use popsi::{
    display_error, errors::errors::Error, lexer::lexer::tokenize, parser::parser::parse,
    type_checker::type_checker::type_check,
};

#[derive(Parser)]
#[command(name = "popsi", version, about = "Type checker for the Popsi language")]
struct Cli {
    /// Path to the .pop source file
    file: PathBuf,
    /// Print the token stream
    #[arg(long)]
    tokens: bool,
    /// Print the parsed program
    #[arg(long)]
    ast: bool,
    /// Print the typed program
    #[arg(long)]
    typed: bool,
    /// Print how long each phase took
    #[arg(long)]
    timings: bool,
}

/// Prints every diagnostic of a failed phase.
fn report(errors: &[Error]) -> ExitCode {
    for error in errors {
        display_error(error);
    }

    let plural = if errors.len() == 1 { "" } else { "s" };
    eprintln!("{}", format!("aborting due to {} error{}", errors.len(), plural).red().bold());
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!(
                "{} cannot read `{}`: {}",
                "error:".red().bold(),
                cli.file.display(),
                error
            );
            return ExitCode::from(2);
        }
    };
    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let start = Instant::now();
    let tokens = match tokenize(source, Some(file_name)) {
        Ok(tokens) => tokens,
        Err(errors) => return report(&errors),
    };
    if cli.timings {
        println!("Tokenized in {:?}", start.elapsed());
    }
    if cli.tokens {
        tokens.iter().for_each(|token| token.debug());
    }

    let parse_start = Instant::now();
    let program = match parse(tokens) {
        Ok(program) => program,
        Err(errors) => return report(&errors),
    };
    if cli.timings {
        println!("Parsed in {:?}", parse_start.elapsed());
    }
    if cli.ast {
        println!("{:#?}", program);
    }

    let type_check_start = Instant::now();
    let typed_program = match type_check(&program) {
        Ok(typed_program) => typed_program,
        Err(errors) => return report(&errors),
    };
    if cli.timings {
        println!("Type checked in {:?}", type_check_start.elapsed());
    }
    if cli.typed {
        print!("{}", typed_program.dump());
    }

    println!(
        "{} {} functions and {} records",
        "Checked".green().bold(),
        typed_program.functions.len(),
        typed_program.records.len()
    );
    if cli.timings {
        println!("Total time: {:?}", start.elapsed());
    }

    ExitCode::SUCCESS
}
