//! Shared wire primitives for PumpIO board packets.
//!
//! Both supported board families (the PIUIO pad board and the PIUBTN button
//! board) exchange fixed 8-byte packets. Input lines sit behind pull-up
//! resistors, so an *inactive* line reads as logic-1 on the wire; every
//! received packet is bitwise-inverted exactly once so the typed views in the
//! protocol crates are consistently active-high.
//!
//! This crate is intentionally small and I/O-free so the protocol crates can
//! share the packet framing rules without pulling runtime concerns.

#![deny(static_mut_refs)]

use thiserror::Error;

/// Wire size of every packet, both families, both directions.
pub const PACKET_SIZE: usize = 8;

/// Errors raised by packet framing checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// A buffer handed to a decoder was not exactly [`PACKET_SIZE`] bytes
    /// (or an exact multiple, for batched reads). This is an integration
    /// bug in the caller, not a runtime condition.
    #[error("packet length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Convenience result alias for packet operations.
pub type PacketResult<T> = Result<T, PacketError>;

/// Copy `buf` into an owned packet buffer, rejecting any length other than
/// exactly [`PACKET_SIZE`].
pub fn packet_from_slice(buf: &[u8]) -> PacketResult<[u8; PACKET_SIZE]> {
    <[u8; PACKET_SIZE]>::try_from(buf).map_err(|_| PacketError::LengthMismatch {
        expected: PACKET_SIZE,
        actual: buf.len(),
    })
}

/// Apply the pull-up inversion to a received packet.
///
/// Output packets are never inverted; they are written to the hardware
/// exactly as encoded.
pub fn invert(mut packet: [u8; PACKET_SIZE]) -> [u8; PACKET_SIZE] {
    invert_in_place(&mut packet);
    packet
}

/// Invert every byte of `buf` in place.
///
/// Used directly on multi-packet reads (the kernel-module backend returns
/// four packets in one buffer) where per-packet copies would be wasted work.
pub fn invert_in_place(buf: &mut [u8]) {
    for byte in buf {
        *byte = !*byte;
    }
}

/// True if any bit selected by `mask` is set in `byte`.
pub const fn masked_any(byte: u8, mask: u8) -> bool {
    byte & mask != 0
}

/// Set (`on = true`) or clear the bits selected by `mask` in `byte`.
pub fn set_masked(byte: &mut u8, mask: u8, on: bool) {
    if on {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}
