//! # fluxctl
//!
//! Host-side control tool for USB flux-level disk imaging devices. The binary
//! is a thin multi-action dispatcher: global flags are stripped first, the
//! action identifier is resolved against a fixed registry, and the resolved
//! tool runs with the remaining arguments. Tool outcomes are classified into
//! exit codes with a strict asymmetry between bug-class faults (never hidden)
//! and expected operational failures (masked to a one-line banner unless the
//! backtrace flag is set).
//!
//! ## Layout
//!
//! - [`cli`] — flag preprocessing, action resolution, outcome classification
//! - [`tools`] — the action implementations and the registry binding them
//! - [`device`] — USB CDC transport and the framed request protocol
//! - [`image`] — the raw flux image container read and written by the tools

pub mod cli;
pub mod device;
pub mod error;
pub mod image;
pub mod tools;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging on stderr.
///
/// Stdout stays reserved for tool-produced data, so log output must never
/// land there. Verbosity comes from `RUST_LOG`, defaulting to `info`.
pub fn setup_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
