//! Drive an interface output pin high or low.

use clap::Parser;
use tracing::info;

use crate::device::Device;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Change the level of an output pin";

#[derive(Parser, Debug)]
#[command(name = "pin", about = DESCRIPTION)]
struct Args {
    /// Interface pin number
    pin: u8,

    /// Level to drive: high/h/1 or low/l/0
    #[arg(value_parser = parse_level, action = clap::ArgAction::Set)]
    level: bool,

    /// Serial port of the device (auto-detected when omitted)
    #[arg(long, value_name = "PORT")]
    device: Option<String>,
}

fn parse_level(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "high" | "h" | "1" => Ok(true),
        "low" | "l" | "0" => Ok(false),
        _ => Err(format!("invalid level '{value}': expected high or low")),
    }
}

pub fn run(argv: &[String]) -> crate::error::Result<Option<u8>> {
    let args: Args = match parse_tool_args(argv)? {
        Parsed::Args(args) => args,
        Parsed::Exit(code) => return Ok(Some(code)),
    };

    let mut device = Device::open(args.device.as_deref())?;
    device.set_pin(args.pin, args.level)?;
    info!(
        "pin {} driven {}",
        args.pin,
        if args.level { "high" } else { "low" }
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_spellings() {
        for high in ["high", "H", "1"] {
            assert!(parse_level(high).unwrap());
        }
        for low in ["low", "L", "0"] {
            assert!(!parse_level(low).unwrap());
        }
        assert!(parse_level("maybe").is_err());
    }

    #[test]
    fn test_parse_pin_and_level() {
        let args = Args::try_parse_from(["pin", "2", "high"]).unwrap();
        assert_eq!(args.pin, 2);
        assert!(args.level);
    }
}
