//! Replay a flux image file onto a disk.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::device::Device;
use crate::error::Result;
use crate::image::FluxImage;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Write a flux image file to a disk";

#[derive(Parser, Debug)]
#[command(name = "write", about = DESCRIPTION)]
struct Args {
    /// Input flux image file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Serial port of the device (auto-detected when omitted)
    #[arg(long, value_name = "PORT")]
    device: Option<String>,
}

pub fn run(argv: &[String]) -> Result<Option<u8>> {
    let args: Args = match parse_tool_args(argv)? {
        Parsed::Args(args) => args,
        Parsed::Exit(code) => return Ok(Some(code)),
    };

    let image = FluxImage::load(&args.file)?;
    let cylinders = u8::try_from(image.cylinders).map_err(|_| {
        crate::error::ToolError::operational(format!(
            "image spans {} cylinders, more than any drive supports",
            image.cylinders
        ))
    })?;
    let mut device = Device::open(args.device.as_deref())?;

    device.motor(true)?;
    let mut tracks = image.tracks.iter();
    for cylinder in 0..cylinders {
        device.seek(cylinder)?;
        for head in 0..image.heads {
            device.select_head(head)?;
            if let Some(track) = tracks.next() {
                device.write_flux(track)?;
            }
        }
        info!("wrote cylinder {}/{}", cylinder + 1, cylinders);
    }
    device.motor(false)?;

    info!("flux image {} written to disk", args.file.display());
    Ok(None)
}
