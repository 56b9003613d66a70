use clap::Parser;
use mediatidy::cli::{Args, run_cli};
use mediatidy::logging::init_tracing;
use mediatidy::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbosity()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run_cli(&args) {
        Ok(report) if args.strict && !report.is_complete_success() => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
