//! Measure raw USB throughput to and from the device.

use std::time::Instant;

use clap::Parser;

use crate::device::Device;
use crate::error::Result;
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Measure USB bandwidth to the device";

const PAYLOAD_BYTES: usize = 1 << 20;

#[derive(Parser, Debug)]
#[command(name = "bandwidth", about = DESCRIPTION)]
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
    let mut buf = vec![0u8; PAYLOAD_BYTES];

    let start = Instant::now();
    device.sink_bytes(&buf)?;
    let send = rate_mib(PAYLOAD_BYTES, start);

    let start = Instant::now();
    device.source_bytes(&mut buf)?;
    let receive = rate_mib(PAYLOAD_BYTES, start);

    println!("Send:    {send:.2} MiB/s");
    println!("Receive: {receive:.2} MiB/s");
    Ok(None)
}

fn rate_mib(bytes: usize, start: Instant) -> f64 {
    let secs = start.elapsed().as_secs_f64().max(f64::EPSILON);
    bytes as f64 / (1024.0 * 1024.0) / secs
}
