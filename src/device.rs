//! USB CDC transport to the flux capture device.
//!
//! The device speaks a small framed protocol: a request is `[opcode, length,
//! payload...]` with `length` covering the whole frame, and every request is
//! acknowledged with the fixed-width pair `[opcode echo, status]`. A non-zero
//! status is a device-reported failure (operational); a mismatched echo or a
//! short fixed-width payload means one side is out of sync, which is a bug,
//! never a user error.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{SerialPort, SerialPortType};
use tracing::debug;

use crate::error::{Result, ToolError};

/// Request opcodes understood by the device firmware.
pub mod cmd {
    pub const GET_INFO: u8 = 0x00;
    pub const SEEK: u8 = 0x02;
    pub const GET_PARAMS: u8 = 0x03;
    pub const SET_PARAMS: u8 = 0x04;
    pub const MOTOR: u8 = 0x05;
    pub const HEAD: u8 = 0x06;
    pub const READ_FLUX: u8 = 0x07;
    pub const WRITE_FLUX: u8 = 0x08;
    pub const ERASE_FLUX: u8 = 0x0a;
    pub const SOURCE_BYTES: u8 = 0x0b;
    pub const SINK_BYTES: u8 = 0x0c;
    pub const GET_INDEX_TIMES: u8 = 0x0d;
    pub const SET_PIN: u8 = 0x0e;
    pub const RESET: u8 = 0x0f;
    pub const UPDATE_FW: u8 = 0x10;
}

/// Parameter block selector for GET_PARAMS/SET_PARAMS.
pub const PARAMS_DELAYS: u8 = 0x01;

const BAUD: u32 = 115_200;
const TIMEOUT: Duration = Duration::from_secs(5);

/// Firmware/device identity, decoded from the fixed 8-byte GET_INFO payload.
#[derive(Debug, Clone, Copy)]
pub struct DeviceInfo {
    pub fw_major: u8,
    pub fw_minor: u8,
    pub model: u8,
    pub sample_freq_hz: u32,
}

/// Drive motion delay parameters, a fixed 10-byte block of five u16 fields.
#[derive(Debug, Clone, Copy)]
pub struct Delays {
    pub select_us: u16,
    pub step_us: u16,
    pub settle_ms: u16,
    pub motor_ms: u16,
    pub auto_off_ms: u16,
}

/// An open connection to the device.
pub struct Device {
    port: Box<dyn SerialPort>,
}

/// Pick a serial port: the first USB CDC candidate on the system.
pub fn detect_port() -> Result<String> {
    let ports = serialport::available_ports()?;
    for port in ports {
        if let SerialPortType::UsbPort(_) = port.port_type {
            return Ok(port.port_name);
        }
    }
    Err(ToolError::operational(
        "no device found; connect one or pass --device <port>",
    ))
}

/// Build a request frame for `op` with the given payload.
fn encode_frame(op: u8, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() + 2;
    assert!(len <= usize::from(u8::MAX), "command payload too large");
    let mut frame = Vec::with_capacity(len);
    frame.push(op);
    frame.push(len as u8);
    frame.extend_from_slice(payload);
    frame
}

/// Validate the fixed-width `[opcode echo, status]` acknowledge pair.
fn check_reply(op: u8, reply: [u8; 2]) -> Result<()> {
    if reply[0] != op {
        return Err(ToolError::bug(format!(
            "response opcode mismatch: sent {op:#04x}, got {:#04x}",
            reply[0]
        )));
    }
    match reply[1] {
        0 => Ok(()),
        code => Err(ToolError::operational(ack_message(code))),
    }
}

/// Human-readable text for a device-reported status code.
fn ack_message(code: u8) -> String {
    match code {
        1 => "device rejected the command".to_string(),
        2 => "no index pulse detected (no disk in drive?)".to_string(),
        3 => "track 0 not found".to_string(),
        4 => "disk is write protected".to_string(),
        5 => "cylinder out of range for this drive".to_string(),
        6 => "flux buffer overflow".to_string(),
        code => format!("device reported error {code}"),
    }
}

/// Decode a big-endian u16 from an exact 2-byte field.
pub fn be_u16(field: &[u8]) -> Result<u16> {
    let bytes: [u8; 2] = field.try_into().map_err(|_| {
        ToolError::bug(format!(
            "fixed-width decode: expected 2 bytes, got {}",
            field.len()
        ))
    })?;
    Ok(u16::from_be_bytes(bytes))
}

/// Decode a big-endian u32 from an exact 4-byte field.
pub fn be_u32(field: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = field.try_into().map_err(|_| {
        ToolError::bug(format!(
            "fixed-width decode: expected 4 bytes, got {}",
            field.len()
        ))
    })?;
    Ok(u32::from_be_bytes(bytes))
}

impl Device {
    /// Open the device on `path`, or auto-detect a port when `path` is None.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let name = match path {
            Some(path) => path.to_string(),
            None => detect_port()?,
        };
        let port = serialport::new(&name, BAUD)
            .timeout(TIMEOUT)
            .open()
            .map_err(|e| ToolError::operational_with(format!("cannot open device {name}"), e))?;
        debug!("opened device on {}", name);
        Ok(Self { port })
    }

    /// Send one framed request and validate its acknowledge pair.
    pub fn command(&mut self, op: u8, payload: &[u8]) -> Result<()> {
        self.port.write_all(&encode_frame(op, payload))?;
        self.port.flush()?;
        self.read_ack(op)
    }

    /// Read and validate an `[opcode echo, status]` pair for `op`. Long
    /// operations acknowledge twice: once on start, once on completion.
    pub fn read_ack(&mut self, op: u8) -> Result<()> {
        let mut reply = [0u8; 2];
        self.port.read_exact(&mut reply)?;
        check_reply(op, reply)
    }

    pub fn info(&mut self) -> Result<DeviceInfo> {
        self.command(cmd::GET_INFO, &[])?;
        let mut raw = [0u8; 8];
        self.port.read_exact(&mut raw)?;
        Ok(DeviceInfo {
            fw_major: raw[0],
            fw_minor: raw[1],
            model: raw[2],
            sample_freq_hz: be_u32(&raw[4..8])?,
        })
    }

    pub fn seek(&mut self, cylinder: u8) -> Result<()> {
        self.command(cmd::SEEK, &[cylinder])
    }

    pub fn select_head(&mut self, head: u8) -> Result<()> {
        self.command(cmd::HEAD, &[head])
    }

    pub fn motor(&mut self, on: bool) -> Result<()> {
        self.command(cmd::MOTOR, &[u8::from(on)])
    }

    pub fn get_delays(&mut self) -> Result<Delays> {
        self.command(cmd::GET_PARAMS, &[PARAMS_DELAYS])?;
        let mut raw = [0u8; 10];
        self.port.read_exact(&mut raw)?;
        Ok(Delays {
            select_us: be_u16(&raw[0..2])?,
            step_us: be_u16(&raw[2..4])?,
            settle_ms: be_u16(&raw[4..6])?,
            motor_ms: be_u16(&raw[6..8])?,
            auto_off_ms: be_u16(&raw[8..10])?,
        })
    }

    pub fn set_delays(&mut self, delays: &Delays) -> Result<()> {
        let mut payload = Vec::with_capacity(11);
        payload.push(PARAMS_DELAYS);
        for field in [
            delays.select_us,
            delays.step_us,
            delays.settle_ms,
            delays.motor_ms,
            delays.auto_off_ms,
        ] {
            payload.extend_from_slice(&field.to_be_bytes());
        }
        self.command(cmd::SET_PARAMS, &payload)
    }

    /// Capture one track of raw flux. The stream arrives as u16-be
    /// length-prefixed chunks; a zero length terminates it.
    pub fn read_flux(&mut self) -> Result<Vec<u8>> {
        self.command(cmd::READ_FLUX, &[])?;
        let mut data = Vec::new();
        loop {
            let mut prefix = [0u8; 2];
            self.port.read_exact(&mut prefix)?;
            let chunk = usize::from(u16::from_be_bytes(prefix));
            if chunk == 0 {
                break;
            }
            let start = data.len();
            data.resize(start + chunk, 0);
            self.port.read_exact(&mut data[start..])?;
        }
        Ok(data)
    }

    /// Replay one track of raw flux, chunked the same way as [`read_flux`].
    ///
    /// [`read_flux`]: Device::read_flux
    pub fn write_flux(&mut self, data: &[u8]) -> Result<()> {
        self.command(cmd::WRITE_FLUX, &[])?;
        for chunk in data.chunks(usize::from(u16::MAX)) {
            self.port.write_all(&(chunk.len() as u16).to_be_bytes())?;
            self.port.write_all(chunk)?;
        }
        self.port.write_all(&0u16.to_be_bytes())?;
        self.port.flush()?;
        self.read_ack(cmd::WRITE_FLUX)
    }

    /// Erase the current track for `ticks` sample-clock ticks.
    pub fn erase_flux(&mut self, ticks: u32) -> Result<()> {
        self.command(cmd::ERASE_FLUX, &ticks.to_be_bytes())?;
        self.read_ack(cmd::ERASE_FLUX)
    }

    /// Pull `buf.len()` throwaway bytes from the device.
    pub fn source_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.command(cmd::SOURCE_BYTES, &(buf.len() as u32).to_be_bytes())?;
        self.port.read_exact(buf).map_err(Into::into)
    }

    /// Push `buf` to the device's bit bucket.
    pub fn sink_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.command(cmd::SINK_BYTES, &(buf.len() as u32).to_be_bytes())?;
        self.port.write_all(buf)?;
        self.port.flush()?;
        self.read_ack(cmd::SINK_BYTES)
    }

    /// Measure the time of `revs` index-to-index revolutions, in sample
    /// clock ticks.
    pub fn index_times(&mut self, revs: u8) -> Result<Vec<u32>> {
        self.command(cmd::GET_INDEX_TIMES, &[revs])?;
        let mut raw = vec![0u8; usize::from(revs) * 4];
        self.port.read_exact(&mut raw)?;
        raw.chunks(4).map(be_u32).collect()
    }

    pub fn set_pin(&mut self, pin: u8, level: bool) -> Result<()> {
        self.command(cmd::SET_PIN, &[pin, u8::from(level)])
    }

    pub fn reset(&mut self) -> Result<()> {
        self.command(cmd::RESET, &[])
    }

    /// Stream a validated firmware image to the device.
    pub fn update_firmware(&mut self, image: &[u8]) -> Result<()> {
        self.command(cmd::UPDATE_FW, &(image.len() as u32).to_be_bytes())?;
        self.port.write_all(image)?;
        self.port.flush()?;
        self.read_ack(cmd::UPDATE_FW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_layout() {
        let frame = encode_frame(cmd::SEEK, &[40]);
        assert_eq!(frame, vec![cmd::SEEK, 3, 40]);
    }

    #[test]
    fn test_encode_frame_empty_payload() {
        assert_eq!(encode_frame(cmd::RESET, &[]), vec![cmd::RESET, 2]);
    }

    #[test]
    fn test_opcode_echo_mismatch_is_a_bug() {
        let err = check_reply(cmd::SEEK, [cmd::RESET, 0]).unwrap_err();
        assert!(matches!(err, ToolError::Bug { .. }));
    }

    #[test]
    fn test_nonzero_status_is_operational() {
        let err = check_reply(cmd::SEEK, [cmd::SEEK, 4]).unwrap_err();
        match err {
            ToolError::Operational { message, .. } => {
                assert!(message.contains("write protected"));
            }
            other => panic!("expected operational error, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_ack_passes() {
        assert!(check_reply(cmd::SEEK, [cmd::SEEK, 0]).is_ok());
    }

    #[test]
    fn test_be_decode() {
        assert_eq!(be_u16(&[0x01, 0x02]).unwrap(), 0x0102);
        assert_eq!(be_u32(&[0, 0, 0x10, 0]).unwrap(), 0x1000);
    }

    #[test]
    fn test_short_fixed_width_field_is_a_bug() {
        assert!(matches!(be_u32(&[1, 2]).unwrap_err(), ToolError::Bug { .. }));
        assert!(matches!(be_u16(&[1, 2, 3]).unwrap_err(), ToolError::Bug { .. }));
    }
}
