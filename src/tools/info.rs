//! Report device identity and firmware version.

use clap::Parser;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Display information about the connected device";

#[derive(Parser, Debug)]
#[command(name = "info", about = DESCRIPTION)]
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
    let info = device.info()?;

    // Device identity is data, so it goes to stdout.
    println!("Model:            F{}", info.model);
    println!("Firmware:         {}.{}", info.fw_major, info.fw_minor);
    println!(
        "Sample frequency: {:.2} MHz",
        f64::from(info.sample_freq_hz) / 1e6
    );
    Ok(None)
}
