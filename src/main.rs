use clap::Parser;
use romsort::cli::{Args, run_cli};
use romsort::output::Output;
use romsort::prompt::LinePrompt;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Moves are single renames, so exiting mid-run leaves no partial file.
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\nUser requests exit");
        std::process::exit(0);
    }) {
        eprintln!("Warning: could not install interrupt handler: {}", e);
    }

    let args = Args::parse();

    match run_cli(args, &mut LinePrompt::stdio()) {
        Ok(outcome) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            Output::default().error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
