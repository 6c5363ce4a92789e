//! Update the device firmware.
//!
//! Firmware images carry a CRC-16/CCITT checksum in their final two bytes,
//! computed over everything before them. The image is validated host-side
//! before a single byte reaches the device; a corrupt file never starts an
//! update.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use crc::{CRC_16_IBM_3740, Crc};
use tracing::info;

use crate::device::Device;
use crate::error::{Result, ToolError};
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Update the device firmware";

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

#[derive(Parser, Debug)]
#[command(name = "update", about = DESCRIPTION)]
struct Args {
    /// Firmware image file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Serial port of the device (auto-detected when omitted)
    #[arg(long, value_name = "PORT")]
    device: Option<String>,
}

/// Check the image trailer and return the payload without it.
fn validate_image(image: &[u8]) -> Result<&[u8]> {
    let Some(payload_len) = image.len().checked_sub(2) else {
        return Err(ToolError::operational("firmware image is too short"));
    };
    let (payload, trailer) = image.split_at(payload_len);
    let expected = u16::from_be_bytes([trailer[0], trailer[1]]);
    if CRC16.checksum(payload) != expected {
        return Err(ToolError::operational(
            "firmware image is corrupt (checksum mismatch)",
        ));
    }
    Ok(payload)
}

pub fn run(argv: &[String]) -> Result<Option<u8>> {
    let args: Args = match parse_tool_args(argv)? {
        Parsed::Args(args) => args,
        Parsed::Exit(code) => return Ok(Some(code)),
    };

    let image = fs::read(&args.file)
        .map_err(|e| ToolError::operational_with(format!("cannot read {}", args.file.display()), e))?;
    let payload = validate_image(&image)?;
    info!("firmware image {} ({} bytes)", args.file.display(), payload.len());

    let mut device = Device::open(args.device.as_deref())?;
    device.update_firmware(payload)?;
    info!("firmware updated; power-cycle the device to finish");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_trailer(payload: &[u8]) -> Vec<u8> {
        let mut image = payload.to_vec();
        image.extend_from_slice(&CRC16.checksum(payload).to_be_bytes());
        image
    }

    #[test]
    fn test_valid_trailer_passes() {
        let image = with_trailer(b"firmware payload");
        assert_eq!(validate_image(&image).unwrap(), b"firmware payload");
    }

    #[test]
    fn test_corrupt_payload_is_rejected() {
        let mut image = with_trailer(b"firmware payload");
        image[0] ^= 0xff;
        let err = validate_image(&image).unwrap_err();
        match err {
            ToolError::Operational { message, .. } => assert!(message.contains("corrupt")),
            other => panic!("expected operational error, got {other:?}"),
        }
    }

    #[test]
    fn test_undersized_image_is_rejected() {
        assert!(validate_image(&[0xab]).is_err());
    }
}
