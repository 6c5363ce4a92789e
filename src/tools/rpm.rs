//! Measure drive rotation speed from index-to-index timings.

use clap::Parser;

use crate::device::Device;
use crate::error::{Result, ToolError};
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Measure drive rotation speed";

#[derive(Parser, Debug)]
#[command(name = "rpm", about = DESCRIPTION)]
struct Args {
    /// Number of revolutions to average over
    #[arg(long, default_value = "3", value_name = "N")]
    revs: u8,

    /// Serial port of the device (auto-detected when omitted)
    #[arg(long, value_name = "PORT")]
    device: Option<String>,
}

pub fn run(argv: &[String]) -> Result<Option<u8>> {
    let args: Args = match parse_tool_args(argv)? {
        Parsed::Args(args) => args,
        Parsed::Exit(code) => return Ok(Some(code)),
    };
    if args.revs == 0 {
        return Err(ToolError::operational("--revs must be at least 1"));
    }

    let mut device = Device::open(args.device.as_deref())?;
    let info = device.info()?;
    device.motor(true)?;
    let ticks = device.index_times(args.revs)?;
    device.motor(false)?;

    let mean_ticks = ticks.iter().map(|&t| f64::from(t)).sum::<f64>() / ticks.len() as f64;
    if mean_ticks <= 0.0 {
        return Err(ToolError::operational(
            "no index pulses measured (no disk in drive?)",
        ));
    }
    let period_s = mean_ticks / f64::from(info.sample_freq_hz);

    println!("Rotation: {:.3} RPM ({:.2} ms/rev)", 60.0 / period_s, period_s * 1e3);
    Ok(None)
}
