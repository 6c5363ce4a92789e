//! Global flag preprocessing.
//!
//! Flags recognized ahead of the action identifier are stripped here, before
//! action resolution. The scan stops at the first argument that does not
//! carry the `--` prefix; that argument is the candidate action.

use std::time::Instant;

/// Dispatcher-wide switches, written once per invocation.
#[derive(Debug, Clone, Default)]
pub struct GlobalFlags {
    /// Propagate errors with full detail instead of masking them.
    pub backtrace: bool,
    /// Wall-clock start, recorded when `--time` is first seen.
    pub timing_start: Option<Instant>,
}

/// A leading `--` argument that is not a recognized global flag.
#[derive(Debug)]
pub struct UnknownFlag(pub String);

/// Strip recognized global flags from the front of `argv`.
///
/// Returns the accumulated flags and the remaining arguments, with the
/// program name still at position 0. An unrecognized `--` argument stops
/// the scan immediately; nothing after it is consumed.
pub fn preprocess(argv: &[String]) -> Result<(GlobalFlags, Vec<String>), UnknownFlag> {
    let mut flags = GlobalFlags::default();

    let mut idx = 1;
    while idx < argv.len() && argv[idx].starts_with("--") {
        match argv[idx].as_str() {
            "--bt" => flags.backtrace = true,
            "--time" => {
                if flags.timing_start.is_none() {
                    flags.timing_start = Some(Instant::now());
                }
            }
            other => return Err(UnknownFlag(other.to_string())),
        }
        idx += 1;
    }

    let mut rest = Vec::with_capacity(argv.len() - idx + 1);
    rest.extend(argv.first().cloned());
    rest.extend(argv[idx..].iter().cloned());
    Ok((flags, rest))
}
