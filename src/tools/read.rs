//! Capture a disk to a flux image file.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use crate::device::Device;
use crate::error::Result;
use crate::image::FluxImage;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Read a disk to a flux image file";

#[derive(Parser, Debug)]
#[command(name = "read", about = DESCRIPTION)]
struct Args {
    /// Output flux image file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Number of cylinders to capture
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
    let mut image = FluxImage::new(u16::from(args.cylinders), args.heads);

    device.motor(true)?;
    for cylinder in 0..args.cylinders {
        device.seek(cylinder)?;
        for head in 0..args.heads {
            device.select_head(head)?;
            let flux = device.read_flux()?;
            debug!(cylinder, head, bytes = flux.len(), "captured track");
            image.push_track(flux);
        }
        info!("read cylinder {}/{}", cylinder + 1, args.cylinders);
    }
    device.motor(false)?;

    image.save(&args.file)?;
    info!("flux image written to {}", args.file.display());
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["read", "disk.fluximg"]).unwrap();
        assert_eq!(args.file, PathBuf::from("disk.fluximg"));
        assert_eq!(args.cylinders, 80);
        assert_eq!(args.heads, 2);
    }

    #[test]
    fn test_output_file_is_required() {
        assert!(Args::try_parse_from(["read"]).is_err());
    }
}
