//! Erase a disk by wiping flux from every track.

use clap::Parser;
use tracing::info;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Erase a disk";

#[derive(Parser, Debug)]
#[command(name = "erase", about = DESCRIPTION)]
struct Args {
    /// Number of cylinders to erase
    #[arg(long, default_value = "80", value_name = "N")]
    cylinders: u8,

    /// Number of heads
    #[arg(long, default_value = "2", value_name = "N")]
    heads: u8,

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
    let info = device.info()?;
    // A nominal 300 RPM revolution is 200 ms; erase a little over one
    // revolution per track so the wipe always closes on itself.
    let ticks = info.sample_freq_hz / 4;

    device.motor(true)?;
    for cylinder in 0..args.cylinders {
        device.seek(cylinder)?;
        for head in 0..args.heads {
            device.select_head(head)?;
            device.erase_flux(ticks)?;
        }
        info!("erased cylinder {}/{}", cylinder + 1, args.cylinders);
    }
    device.motor(false)?;
    info!("disk erased");
    Ok(None)
}
