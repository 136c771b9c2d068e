//! USB binding: vendor control transfers on endpoint 0 via rusb.
//!
//! Both boards speak the same scheme: one vendor-class control request
//! (`0xAE`) moves a full 8-byte packet per transfer, host-to-device for
//! outputs and device-to-host for inputs. There are no other endpoints.

use std::time::Duration;

use rusb::{Direction, GlobalContext, Recipient, RequestType};
use tracing::{debug, warn};

use pumpio_packet::PACKET_SIZE;

use crate::error::{DeviceError, DeviceResult};
use crate::transport::Transport;

/// `wValue` of the control request, always zero.
pub const CONTROL_VALUE: u16 = 0x00;
/// `wIndex` of the control request, always zero.
pub const CONTROL_INDEX: u16 = 0x00;
/// Configuration the boards enumerate with.
pub const USB_CONFIGURATION: u8 = 0x01;
/// Interface claimed for the control traffic.
pub const USB_INTERFACE: u8 = 0x00;
/// Transfer timeout used by the stock tooling.
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_millis(10_000);

/// USB identity of a supported board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbBoardId {
    pub vendor_id: u16,
    pub product_id: u16,
    pub control_request: u8,
    pub label: &'static str,
}

impl UsbBoardId {
    pub const fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}

/// The multiplexed dance pad board.
pub const PIUIO_BOARD: UsbBoardId = UsbBoardId {
    vendor_id: piuio_protocol::VENDOR_ID,
    product_id: piuio_protocol::PRODUCT_ID,
    control_request: piuio_protocol::CONTROL_REQUEST,
    label: "piuio",
};

/// The auxiliary button board.
pub const PIUBTN_BOARD: UsbBoardId = UsbBoardId {
    vendor_id: piubtn_protocol::VENDOR_ID,
    product_id: piubtn_protocol::PRODUCT_ID,
    control_request: piubtn_protocol::CONTROL_REQUEST,
    label: "piubtn",
};

/// A supported board spotted on the bus.
#[derive(Debug, Clone, Copy)]
pub struct DiscoveredBoard {
    pub board: UsbBoardId,
    pub bus_number: u8,
    pub address: u8,
}

/// Every supported board currently visible on the bus.
pub fn discover_boards() -> DeviceResult<Vec<DiscoveredBoard>> {
    let devices =
        rusb::devices().map_err(|e| map_usb_error("usb", DEFAULT_TRANSFER_TIMEOUT, e))?;
    let mut found = Vec::new();
    for device in devices.iter() {
        let Ok(descriptor) = device.device_descriptor() else {
            continue;
        };
        for board in [PIUIO_BOARD, PIUBTN_BOARD] {
            if board.matches(descriptor.vendor_id(), descriptor.product_id()) {
                found.push(DiscoveredBoard {
                    board,
                    bus_number: device.bus_number(),
                    address: device.address(),
                });
            }
        }
    }
    Ok(found)
}

/// True if the board is visible on the bus. It may still be busy or
/// unreadable; only [`UsbTransport::open`] decides that.
pub fn available(board: &UsbBoardId) -> bool {
    discover_boards()
        .map(|boards| boards.iter().any(|found| found.board == *board))
        .unwrap_or(false)
}

/// An open control-transfer channel to one board.
pub struct UsbTransport {
    handle: rusb::DeviceHandle<GlobalContext>,
    board: UsbBoardId,
}

impl UsbTransport {
    /// Find the board on the bus, open it, select its configuration and
    /// claim its interface. The first matching device wins.
    pub fn open(board: UsbBoardId) -> DeviceResult<Self> {
        let devices =
            rusb::devices().map_err(|e| map_usb_error(board.label, DEFAULT_TRANSFER_TIMEOUT, e))?;
        for device in devices.iter() {
            let Ok(descriptor) = device.device_descriptor() else {
                continue;
            };
            if !board.matches(descriptor.vendor_id(), descriptor.product_id()) {
                continue;
            }
            let handle = device
                .open()
                .map_err(|e| map_usb_error(board.label, DEFAULT_TRANSFER_TIMEOUT, e))?;
            // The dedicated kernel module may hold interface 0; let libusb
            // push it off when we claim.
            if handle.set_auto_detach_kernel_driver(true).is_err() {
                debug!("Kernel driver auto-detach not supported on this platform");
            }
            handle
                .set_active_configuration(USB_CONFIGURATION)
                .map_err(|e| map_usb_error(board.label, DEFAULT_TRANSFER_TIMEOUT, e))?;
            handle
                .claim_interface(USB_INTERFACE)
                .map_err(|e| map_usb_error(board.label, DEFAULT_TRANSFER_TIMEOUT, e))?;
            debug!(
                "Opened {} at bus {} address {}",
                board.label,
                device.bus_number(),
                device.address()
            );
            return Ok(Self { handle, board });
        }
        Err(DeviceError::not_found(board.label))
    }

    pub fn board(&self) -> &UsbBoardId {
        &self.board
    }
}

impl Transport for UsbTransport {
    fn write_packet(&mut self, packet: &[u8; PACKET_SIZE], timeout: Duration) -> DeviceResult<()> {
        let request_type = rusb::request_type(Direction::Out, RequestType::Vendor, Recipient::Device);
        let moved = self
            .handle
            .write_control(
                request_type,
                self.board.control_request,
                CONTROL_VALUE,
                CONTROL_INDEX,
                packet,
                timeout,
            )
            .map_err(|e| {
                warn!("Control write to {} failed: {e}", self.board.label);
                map_usb_error(self.board.label, timeout, e)
            })?;
        if moved != packet.len() {
            return Err(DeviceError::short_transfer(
                self.board.label,
                packet.len(),
                moved,
            ));
        }
        Ok(())
    }

    fn read_packet(&mut self, buf: &mut [u8; PACKET_SIZE], timeout: Duration) -> DeviceResult<()> {
        let request_type = rusb::request_type(Direction::In, RequestType::Vendor, Recipient::Device);
        let moved = self
            .handle
            .read_control(
                request_type,
                self.board.control_request,
                CONTROL_VALUE,
                CONTROL_INDEX,
                buf,
                timeout,
            )
            .map_err(|e| {
                warn!("Control read from {} failed: {e}", self.board.label);
                map_usb_error(self.board.label, timeout, e)
            })?;
        if moved != buf.len() {
            return Err(DeviceError::short_transfer(
                self.board.label,
                buf.len(),
                moved,
            ));
        }
        Ok(())
    }
}

fn map_usb_error(device: &str, timeout: Duration, error: rusb::Error) -> DeviceError {
    match error {
        rusb::Error::NotFound => DeviceError::not_found(device),
        rusb::Error::NoDevice => DeviceError::gone(device),
        rusb::Error::Access => DeviceError::PermissionDenied(device.to_owned()),
        rusb::Error::Busy => DeviceError::busy(device),
        rusb::Error::Timeout => DeviceError::timeout(
            device,
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ),
        rusb::Error::NoMem => DeviceError::ResourceExhausted(error.to_string()),
        rusb::Error::NotSupported => DeviceError::Unsupported(error.to_string()),
        other => DeviceError::transfer(device, other.to_string()),
    }
}
