//! Convert between flux image containers.
//!
//! Two container forms exist: the structured flux image (per-track streams
//! behind a magic header) and a bare sample stream. A structured input is
//! flattened to a bare stream; a bare input is wrapped as a single-track
//! image. The direction follows from the input, not from file extensions.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::error::{Result, ToolError};
use crate::image::{FluxImage, is_flux_image};
use crate::tools::{Parsed, parse_tool_args};

pub const DESCRIPTION: &str = "Convert between flux image containers";

#[derive(Parser, Debug)]
#[command(name = "convert", about = DESCRIPTION)]
struct Args {
    /// Input file (flux image or bare sample stream)
    #[arg(value_name = "IN")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUT")]
    output: PathBuf,
}

pub fn run(argv: &[String]) -> Result<Option<u8>> {
    let args: Args = match parse_tool_args(argv)? {
        Parsed::Args(args) => args,
        Parsed::Exit(code) => return Ok(Some(code)),
    };

    let data = fs::read(&args.input)
        .map_err(|e| ToolError::operational_with(format!("cannot read {}", args.input.display()), e))?;

    let (out_bytes, direction) = if is_flux_image(&data) {
        let image = FluxImage::from_bytes(&data)?;
        let flat: Vec<u8> = image.tracks.into_iter().flatten().collect();
        (flat, "flux image -> bare stream")
    } else {
        let mut image = FluxImage::new(1, 1);
        image.push_track(data);
        (image.to_bytes(), "bare stream -> flux image")
    };

    fs::write(&args.output, out_bytes)
        .map_err(|e| ToolError::operational_with(format!("cannot write {}", args.output.display()), e))?;

    info!(
        "converted {} -> {} ({direction})",
        args.input.display(),
        args.output.display()
    );
    Ok(None)
}
