//! Transports, poll cycles and device sessions for PIUIO/PIUBTN boards.
//!
//! This crate moves the packets defined by [`piuio_protocol`] and
//! [`piubtn_protocol`] to and from real hardware:
//!
//! - [`Transport`]: one synchronous 8-byte packet channel with a bounded
//!   per-transfer timeout. Implemented by [`usb::UsbTransport`] (vendor
//!   control transfers on endpoint 0) and mocked in [`transport::mock`].
//! - [`PollDriver`]: one complete poll against an opened board. The USB
//!   drivers run the write+read cycles in userspace; the kernel-module
//!   port ([`kmod::KmodPort`], Linux only) hands the whole multiplexed
//!   cycle to the kernel in a single `read()`.
//! - [`DeviceSession`]: refcounted, mutex-serialized shared access with
//!   disconnect tracking. [`SessionRegistry`] keys sessions by device id
//!   so independent subsystems end up sharing one open board.
//!
//! Everything here is synchronous and blocking. There are no worker
//! threads, no retries and no cancellation; callers own pacing and retry
//! policy, with [`DeviceError::is_retryable`] as an advisory hint.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod cycle;
pub mod error;
#[cfg(target_os = "linux")]
pub mod kmod;
pub mod session;
pub mod transport;
pub mod usb;

pub use cycle::{
    MultiplexDriver, PollDriver, SimpleDriver, run_multiplexed_cycle, run_simple_cycle,
};
pub use error::{DeviceError, DeviceResult, ErrorSeverity};
pub use session::{DeviceSession, SessionHandle, SessionRegistry};
pub use transport::Transport;
pub use usb::{
    DEFAULT_TRANSFER_TIMEOUT, DiscoveredBoard, PIUBTN_BOARD, PIUIO_BOARD, UsbBoardId, UsbTransport,
};
