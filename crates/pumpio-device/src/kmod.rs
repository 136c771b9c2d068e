//! Kernel-module binding: one `read()` drives the whole multiplexed cycle.
//!
//! The dedicated `piuio` kernel module exposes a character device whose
//! read handler first copies the 8 output bytes the caller places at the
//! head of the buffer, then runs all four sub-polls in kernel space and
//! fills the full 32 bytes with the raw input packets. Keeping the select
//! walk inside the kernel avoids four round trips through userspace per
//! acquisition. The returned bytes are still active-low; decoding happens
//! here, not in the kernel.

use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use piuio_protocol::{self as piuio, InputBatch};
use pumpio_packet::PACKET_SIZE;

use crate::cycle::PollDriver;
use crate::error::{DeviceError, DeviceResult};

/// Device node registered by the kernel module.
pub const KMOD_DEVICE_PATH: &str = "/dev/piuio0";

/// The module's default per-transfer timeout. The real value is the
/// `timeout_ms` module parameter and is not visible from here.
const KMOD_DEFAULT_TIMEOUT_MS: u64 = 10;

/// Pad board access through the dedicated kernel module.
pub struct KmodPort {
    file: File,
    path: PathBuf,
}

impl KmodPort {
    /// True if the module is loaded and bound: the node exists and is a
    /// character device.
    pub fn available() -> bool {
        fs::metadata(KMOD_DEVICE_PATH)
            .map(|meta| meta.file_type().is_char_device())
            .unwrap_or(false)
    }

    /// Open the standard device node.
    pub fn open() -> DeviceResult<Self> {
        Self::open_path(KMOD_DEVICE_PATH)
    }

    /// Open a nonstandard node. A second board enumerates as
    /// `/dev/piuio1`, and udev rules sometimes rename the node.
    pub fn open_path(path: impl AsRef<Path>) -> DeviceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let device = path.display().to_string();
        let file = File::open(&path).map_err(|e| map_io_error(&device, &e))?;
        debug!("Opened kernel module port at {device}");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PollDriver for KmodPort {
    fn poll_batch(&mut self, output: &piuio::OutputPacket) -> DeviceResult<InputBatch> {
        let mut buffer = [0u8; InputBatch::WIRE_SIZE];
        if let Some(prefix) = buffer.first_chunk_mut::<PACKET_SIZE>() {
            *prefix = *output.as_bytes();
        }

        // One read per acquisition. The kernel consumes the output prefix
        // and overwrites the whole buffer with the four raw packets.
        let device = self.path.display().to_string();
        let moved = self.file.read(&mut buffer).map_err(|e| {
            warn!("Batch read from {device} failed: {e}");
            map_io_error(&device, &e)
        })?;
        if moved != buffer.len() {
            return Err(DeviceError::short_transfer(device, buffer.len(), moved));
        }

        Ok(InputBatch::from_wire_slice(&buffer)?)
    }
}

fn map_io_error(device: &str, error: &io::Error) -> DeviceError {
    // The module fails reads with ENODEV once the board is unplugged.
    if error.raw_os_error() == Some(libc::ENODEV) {
        return DeviceError::gone(device);
    }
    match error.kind() {
        io::ErrorKind::NotFound => DeviceError::not_found(device),
        io::ErrorKind::PermissionDenied => DeviceError::PermissionDenied(device.to_owned()),
        io::ErrorKind::ResourceBusy | io::ErrorKind::WouldBlock => DeviceError::busy(device),
        io::ErrorKind::TimedOut => DeviceError::timeout(device, KMOD_DEFAULT_TIMEOUT_MS),
        io::ErrorKind::OutOfMemory => DeviceError::ResourceExhausted(error.to_string()),
        io::ErrorKind::Unsupported => DeviceError::Unsupported(error.to_string()),
        _ => DeviceError::transfer(device, error.to_string()),
    }
}
