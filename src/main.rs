use std::process::ExitCode;

use fluxctl::{cli, setup_logging};

fn main() -> ExitCode {
    if let Err(err) = setup_logging() {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    }

    let argv: Vec<String> = std::env::args().collect();
    cli::run(&argv)
}
