//! Display or adjust the device's drive motion delay parameters.
//!
//! With no options the current parameter block is printed. Any combination
//! of the setter options may be given; unspecified fields keep their value.

use clap::Parser;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Display or adjust device motion delay parameters";

#[derive(Parser, Debug)]
#[command(name = "delays", about = DESCRIPTION)]
struct Args {
    /// Drive select delay, microseconds
    #[arg(long, value_name = "N")]
    select: Option<u16>,

    /// Head step delay, microseconds
    #[arg(long, value_name = "N")]
    step: Option<u16>,

    /// Post-seek settle delay, milliseconds
    #[arg(long, value_name = "N")]
    settle: Option<u16>,

    /// Motor spin-up delay, milliseconds
    #[arg(long, value_name = "N")]
    motor: Option<u16>,

    /// Motor auto-off idle delay, milliseconds
    #[arg(long, value_name = "N")]
    auto_off: Option<u16>,

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
    let mut delays = device.get_delays()?;

    let mut changed = false;
    for (field, value) in [
        (&mut delays.select_us, args.select),
        (&mut delays.step_us, args.step),
        (&mut delays.settle_ms, args.settle),
        (&mut delays.motor_ms, args.motor),
        (&mut delays.auto_off_ms, args.auto_off),
    ] {
        if let Some(value) = value {
            *field = value;
            changed = true;
        }
    }
    if changed {
        device.set_delays(&delays)?;
    }

    println!("Select delay:   {} us", delays.select_us);
    println!("Step delay:     {} us", delays.step_us);
    println!("Settle time:    {} ms", delays.settle_ms);
    println!("Motor delay:    {} ms", delays.motor_ms);
    println!("Auto-off time:  {} ms", delays.auto_off_ms);
    Ok(None)
}
