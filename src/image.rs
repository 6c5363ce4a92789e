//! Raw flux image container.
//!
//! Layout: 8-byte magic, u16-be cylinder count, u8 head count, then one
//! u32-be length-prefixed raw flux stream per track in cylinder-major order.
//! A malformed file here is bad user input, so parse failures are
//! operational, not bug-class.

use std::fs;
use std::path::Path;

use crate::error::{Result, ToolError};

const MAGIC: &[u8; 8] = b"FLUXIMG\0";

/// An in-memory flux image: per-track raw sample streams.
#[derive(Debug, Default)]
pub struct FluxImage {
    pub cylinders: u16,
    pub heads: u8,
    pub tracks: Vec<Vec<u8>>,
}

impl FluxImage {
    pub fn new(cylinders: u16, heads: u8) -> Self {
        Self {
            cylinders,
            heads,
            tracks: Vec::with_capacity(usize::from(cylinders) * usize::from(heads)),
        }
    }

    /// Append the next track in cylinder-major order.
    pub fn push_track(&mut self, data: Vec<u8>) {
        self.tracks.push(data);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let payload: usize = self.tracks.iter().map(|t| t.len() + 4).sum();
        let mut out = Vec::with_capacity(MAGIC.len() + 3 + payload);
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.cylinders.to_be_bytes());
        out.push(self.heads);
        for track in &self.tracks {
            out.extend_from_slice(&(track.len() as u32).to_be_bytes());
            out.extend_from_slice(track);
        }
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor { data, pos: 0 };
        if cursor.take(MAGIC.len())? != MAGIC {
            return Err(ToolError::operational("not a flux image (bad magic)"));
        }
        let field = cursor.take(2)?;
        let cylinders = u16::from_be_bytes([field[0], field[1]]);
        let heads = cursor.take(1)?[0];

        let count = usize::from(cylinders) * usize::from(heads);
        let mut image = Self::new(cylinders, heads);
        for _ in 0..count {
            let field = cursor.take(4)?;
            let len = u32::from_be_bytes([field[0], field[1], field[2], field[3]]);
            image.push_track(cursor.take(len as usize)?.to_vec());
        }
        Ok(image)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes()).map_err(|e| {
            ToolError::operational_with(format!("cannot write {}", path.display()), e)
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            ToolError::operational_with(format!("cannot read {}", path.display()), e)
        })?;
        Self::from_bytes(&data)
    }
}

/// Check whether a byte buffer carries the container magic.
pub fn is_flux_image(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && &data[..MAGIC.len()] == MAGIC
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len());
        match end {
            Some(end) => {
                let field = &self.data[self.pos..end];
                self.pos = end;
                Ok(field)
            }
            None => Err(ToolError::operational("truncated flux image")),
        }
    }
}
