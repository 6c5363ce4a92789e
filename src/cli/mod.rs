//! Command-line front end
//!
//! Strips global flags, resolves the action against the registry, invokes it,
//! and turns the outcome into a process exit code. Everything printed here
//! goes to stderr: stdout belongs to the tools, which use it for data.

pub mod dispatch;
pub mod flags;

use std::process::ExitCode;

use crate::tools;
use self::dispatch::Disposition;

/// Exit status for an unmasked fault, matching the status of an uncaught
/// panic so both propagation paths look the same to callers.
const FAULT_EXIT: u8 = 101;

/// Fixed marker line preceding a masked operational error.
const FATAL_BANNER: &str = "** FATAL ERROR:";

/// Run one invocation: `argv` is the raw process argument list.
pub fn run(argv: &[String]) -> ExitCode {
    let (flags, argv) = match flags::preprocess(argv) {
        Ok(pair) => pair,
        Err(flags::UnknownFlag(_)) => return usage(argv),
    };

    let module = match argv.get(1).and_then(|name| dispatch::resolve(tools::ACTIONS, name)) {
        Some(module) => module,
        None => return usage(&argv),
    };

    // The tool receives argv as it stands after flag stripping: program name
    // at position 0, the action identifier at position 1.
    let code = match dispatch::classify((module.entry)(&argv), flags.backtrace) {
        Disposition::Exit(code) => code,
        Disposition::Masked(err) => {
            eprintln!("{FATAL_BANNER}");
            eprintln!("{}", dispatch::dedent(&err.to_string()));
            1
        }
        Disposition::Propagate(err) => {
            eprintln!("Error: {:?}", anyhow::Error::from(err));
            FAULT_EXIT
        }
    };

    if let Some(start) = flags.timing_start {
        eprintln!("Time elapsed: {:.2} seconds", start.elapsed().as_secs_f64());
    }

    ExitCode::from(code)
}

/// Print the invocation synopsis and the full registry. Usage failures are
/// always exit 1.
fn usage(argv: &[String]) -> ExitCode {
    let prog = argv.first().map(String::as_str).unwrap_or("fluxctl");
    eprintln!("Usage: {prog} [--bt] [--time] <action> [-h] ...");
    eprintln!("  --bt        Propagate errors with a full backtrace");
    eprintln!("  --time      Print elapsed time after the action has executed");
    eprintln!("Actions:");
    for module in tools::ACTIONS {
        eprintln!("  {:<12}{}", module.name, module.description);
    }
    ExitCode::from(1)
}
