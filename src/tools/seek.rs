//! Position the heads on a specified cylinder.

use clap::Parser;
use tracing::info;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Seek the heads to a specified cylinder";

#[derive(Parser, Debug)]
#[command(name = "seek", about = DESCRIPTION)]
struct Args {
    /// Target cylinder
    cylinder: u8,

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
    device.seek(args.cylinder)?;
    info!("heads on cylinder {}", args.cylinder);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cylinder() {
        let args = Args::try_parse_from(["seek", "40"]).unwrap();
        assert_eq!(args.cylinder, 40);
        assert!(args.device.is_none());
    }

    #[test]
    fn test_cylinder_is_required() {
        assert!(Args::try_parse_from(["seek"]).is_err());
    }
}
