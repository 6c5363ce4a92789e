//! Reset the device to power-on defaults.

use clap::Parser;
use tracing::info;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Reset the device to power-on defaults";

#[derive(Parser, Debug)]
#[command(name = "reset", about = DESCRIPTION)]
struct Args {
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
    device.reset()?;
    info!("device reset to power-on defaults");
    Ok(None)
}
