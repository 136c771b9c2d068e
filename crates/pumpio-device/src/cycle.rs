//! Poll cycles: the transfer sequences that turn a transport into input
//! snapshots.
//!
//! The multiplexed pad board needs four write+read pairs per acquisition,
//! one per sensor group; the button board needs exactly one. Both cycles
//! are plain synchronous loops over a [`Transport`]. The [`PollDriver`]
//! trait sits on top so sessions can hold either board family, or the
//! kernel-module port that runs the whole multiplexed cycle inside one
//! `read()`.

use std::time::Duration;

use piuio_protocol::{self as piuio, InputBatch, SensorGroup};
use piubtn_protocol as piubtn;
use pumpio_packet::PACKET_SIZE;

use crate::error::{DeviceError, DeviceResult};
use crate::transport::Transport;

/// One full poll against an opened board.
///
/// A driver answers for exactly one board family; the other family's
/// method fails with [`DeviceError::Unsupported`].
pub trait PollDriver: Send + Sync {
    /// One multiplexed acquisition: four sub-polls, one [`InputBatch`].
    fn poll_batch(&mut self, _output: &piuio::OutputPacket) -> DeviceResult<InputBatch> {
        Err(DeviceError::unsupported(
            "backend does not drive a multiplexed pad board",
        ))
    }

    /// One single-shot button board poll.
    fn poll_buttons(&mut self, _output: &piubtn::OutputPacket) -> DeviceResult<piubtn::InputPacket> {
        Err(DeviceError::unsupported(
            "backend does not drive a button board",
        ))
    }
}

/// Run the four-phase multiplexed acquisition over a packet transport.
///
/// Walks [`SensorGroup::ALL`] in select order. For each group the select
/// field of `output` is rewritten while every other caller bit rides along
/// unchanged, the packet is written, and one raw packet is read back and
/// decoded into that group's slot. Sub-poll `i` finishes before sub-poll
/// `i + 1` starts; the select field is shared hardware state, so the pairs
/// cannot be reordered or batched.
///
/// The first failing transfer aborts the whole acquisition. A partial
/// batch is never returned: stale sensor data that looks fresh is worse
/// than no data.
pub fn run_multiplexed_cycle(
    transport: &mut dyn Transport,
    output: &piuio::OutputPacket,
    timeout: Duration,
) -> DeviceResult<InputBatch> {
    let mut request = *output;
    let mut slots = [piuio::InputPacket::default(); SensorGroup::COUNT];
    for (group, slot) in SensorGroup::ALL.into_iter().zip(slots.iter_mut()) {
        request.set_sensor_group(group);
        transport.write_packet(request.as_bytes(), timeout)?;
        let mut wire = [0u8; PACKET_SIZE];
        transport.read_packet(&mut wire, timeout)?;
        *slot = piuio::InputPacket::from_wire(wire);
    }
    Ok(InputBatch::new(slots))
}

/// Run the single write+read pair of a button board poll.
pub fn run_simple_cycle(
    transport: &mut dyn Transport,
    output: &piubtn::OutputPacket,
    timeout: Duration,
) -> DeviceResult<piubtn::InputPacket> {
    transport.write_packet(output.as_bytes(), timeout)?;
    let mut wire = [0u8; PACKET_SIZE];
    transport.read_packet(&mut wire, timeout)?;
    Ok(piubtn::InputPacket::from_wire(wire))
}

/// [`PollDriver`] for the multiplexed pad board over any packet transport.
pub struct MultiplexDriver<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> MultiplexDriver<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }
}

impl<T: Transport> PollDriver for MultiplexDriver<T> {
    fn poll_batch(&mut self, output: &piuio::OutputPacket) -> DeviceResult<InputBatch> {
        run_multiplexed_cycle(&mut self.transport, output, self.timeout)
    }
}

/// [`PollDriver`] for the button board over any packet transport.
pub struct SimpleDriver<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> SimpleDriver<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }
}

impl<T: Transport> PollDriver for SimpleDriver<T> {
    fn poll_buttons(&mut self, output: &piubtn::OutputPacket) -> DeviceResult<piubtn::InputPacket> {
        run_simple_cycle(&mut self.transport, output, self.timeout)
    }
}
