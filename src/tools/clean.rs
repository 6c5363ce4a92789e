//! Run a head-cleaning cycle: sweep the heads across a cleaning disk.

use clap::Parser;
use tracing::info;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Run a head-cleaning cycle";

#[derive(Parser, Debug)]
#[command(name = "clean", about = DESCRIPTION)]
struct Args {
    /// Number of full sweeps across the cleaning disk
    #[arg(long, default_value = "3", value_name = "N")]
    passes: u8,

    /// Outermost cylinder of the sweep
    #[arg(long, default_value = "79", value_name = "CYL")]
    span: u8,

    /// Serial port of the device (auto-detected when omitted)
    #[arg(long, value_name = "PORT")]
    device: Option<String>,
}

pub fn run(argv: &[String]) -> Result<Option<u8>> {
    let args: Args = match parse_tool_args(argv)? {
        Parsed::Args(args) => args,
        Parsed::Exit(code) => return Ok(Some(code)),
    };

    let mut device = Device::open(args.device.as_deref())?;
    device.motor(true)?;
    for pass in 1..=args.passes {
        info!("cleaning pass {}/{}", pass, args.passes);
        for cylinder in 0..=args.span {
            device.seek(cylinder)?;
        }
        for cylinder in (0..=args.span).rev() {
            device.seek(cylinder)?;
        }
    }
    device.motor(false)?;
    info!("head cleaning complete");
    Ok(None)
}
