//! Packet transport trait and its in-memory mock.

use std::time::Duration;

use pumpio_packet::PACKET_SIZE;

use crate::error::DeviceResult;

/// One synchronous packet channel to a board.
///
/// Both directions move exactly [`PACKET_SIZE`] bytes or fail; bindings
/// turn a partial transfer into [`DeviceError::ShortTransfer`] themselves,
/// so callers never see half a packet. A transport is owned by one poll
/// driver; serializing concurrent callers is the session's job, not the
/// transport's.
///
/// [`DeviceError::ShortTransfer`]: crate::error::DeviceError::ShortTransfer
pub trait Transport: Send + Sync {
    /// Move one output packet to the board, honoring `timeout`.
    fn write_packet(&mut self, packet: &[u8; PACKET_SIZE], timeout: Duration) -> DeviceResult<()>;

    /// Move one raw input packet from the board into `buf`, honoring
    /// `timeout`. The bytes are still active-low; decoding happens in the
    /// protocol crates.
    fn read_packet(&mut self, buf: &mut [u8; PACKET_SIZE], timeout: Duration) -> DeviceResult<()>;
}

pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::error::DeviceError;

    /// One recorded transfer attempt, in call order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockCall {
        Write([u8; PACKET_SIZE]),
        Read,
    }

    enum ReadMode {
        Scripted,
        ComplementEcho {
            last_write: Option<[u8; PACKET_SIZE]>,
        },
    }

    #[derive(Default)]
    struct FailurePlan {
        write: Option<(usize, DeviceError)>,
        read: Option<(usize, DeviceError)>,
        writes_seen: usize,
        reads_seen: usize,
    }

    /// Scriptable in-memory transport for cycle and session tests.
    ///
    /// Reads answer from an explicit queue, or, in complement-echo mode,
    /// with the bitwise complement of the last written packet (a quiet
    /// board whose only active lines are the ones the host itself raised).
    /// Failures can be planted at a specific write or read index.
    pub struct MockTransport {
        calls: Arc<Mutex<Vec<MockCall>>>,
        read_queue: Arc<Mutex<VecDeque<[u8; PACKET_SIZE]>>>,
        mode: Arc<Mutex<ReadMode>>,
        plan: Arc<Mutex<FailurePlan>>,
        releases: Arc<Mutex<usize>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                read_queue: Arc::new(Mutex::new(VecDeque::new())),
                mode: Arc::new(Mutex::new(ReadMode::Scripted)),
                plan: Arc::new(Mutex::new(FailurePlan::default())),
                releases: Arc::new(Mutex::new(0)),
            }
        }

        /// Observer handle that stays valid after the transport moves into
        /// a driver or session.
        pub fn probe(&self) -> MockProbe {
            MockProbe {
                calls: Arc::clone(&self.calls),
                read_queue: Arc::clone(&self.read_queue),
                mode: Arc::clone(&self.mode),
                plan: Arc::clone(&self.plan),
                releases: Arc::clone(&self.releases),
            }
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for MockTransport {
        fn write_packet(
            &mut self,
            packet: &[u8; PACKET_SIZE],
            _timeout: Duration,
        ) -> DeviceResult<()> {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            calls.push(MockCall::Write(*packet));
            drop(calls);

            let mut plan = self.plan.lock().unwrap_or_else(|e| e.into_inner());
            let index = plan.writes_seen;
            plan.writes_seen += 1;
            if plan.write.as_ref().is_some_and(|(at, _)| *at == index) {
                if let Some((_, error)) = plan.write.take() {
                    return Err(error);
                }
            }
            drop(plan);

            let mut mode = self.mode.lock().unwrap_or_else(|e| e.into_inner());
            if let ReadMode::ComplementEcho { last_write } = &mut *mode {
                *last_write = Some(*packet);
            }
            Ok(())
        }

        fn read_packet(
            &mut self,
            buf: &mut [u8; PACKET_SIZE],
            _timeout: Duration,
        ) -> DeviceResult<()> {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            calls.push(MockCall::Read);
            drop(calls);

            let mut plan = self.plan.lock().unwrap_or_else(|e| e.into_inner());
            let index = plan.reads_seen;
            plan.reads_seen += 1;
            if plan.read.as_ref().is_some_and(|(at, _)| *at == index) {
                if let Some((_, error)) = plan.read.take() {
                    return Err(error);
                }
            }
            drop(plan);

            let mode = self.mode.lock().unwrap_or_else(|e| e.into_inner());
            let packet = match &*mode {
                ReadMode::Scripted => {
                    let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
                    queue
                        .pop_front()
                        .ok_or_else(|| DeviceError::transfer("mock", "read queue empty"))?
                }
                ReadMode::ComplementEcho { last_write } => last_write
                    .map(pumpio_packet::invert)
                    .ok_or_else(|| DeviceError::transfer("mock", "no write to echo"))?,
            };
            *buf = packet;
            Ok(())
        }
    }

    impl Drop for MockTransport {
        fn drop(&mut self) {
            let mut releases = self.releases.lock().unwrap_or_else(|e| e.into_inner());
            *releases += 1;
        }
    }

    /// Shared view of a [`MockTransport`]: scripting before and
    /// observation after the transport has been moved into a session.
    #[derive(Clone)]
    pub struct MockProbe {
        calls: Arc<Mutex<Vec<MockCall>>>,
        read_queue: Arc<Mutex<VecDeque<[u8; PACKET_SIZE]>>>,
        mode: Arc<Mutex<ReadMode>>,
        plan: Arc<Mutex<FailurePlan>>,
        releases: Arc<Mutex<usize>>,
    }

    impl MockProbe {
        pub fn queue_read(&self, packet: [u8; PACKET_SIZE]) {
            let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
            queue.push_back(packet);
        }

        /// Switch reads to echoing the complement of the last write.
        pub fn enable_complement_echo(&self) {
            let mut mode = self.mode.lock().unwrap_or_else(|e| e.into_inner());
            *mode = ReadMode::ComplementEcho { last_write: None };
        }

        /// Plant a failure for the write with the given zero-based index.
        pub fn fail_write_at(&self, index: usize, error: DeviceError) {
            let mut plan = self.plan.lock().unwrap_or_else(|e| e.into_inner());
            plan.write = Some((index, error));
        }

        /// Plant a failure for the read with the given zero-based index.
        pub fn fail_read_at(&self, index: usize, error: DeviceError) {
            let mut plan = self.plan.lock().unwrap_or_else(|e| e.into_inner());
            plan.read = Some((index, error));
        }

        /// Every transfer attempt so far, in order.
        pub fn calls(&self) -> Vec<MockCall> {
            let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            calls.clone()
        }

        /// The written packets only, in order.
        pub fn writes(&self) -> Vec<[u8; PACKET_SIZE]> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    MockCall::Write(packet) => Some(packet),
                    MockCall::Read => None,
                })
                .collect()
        }

        /// How many times the transport has been dropped.
        pub fn release_count(&self) -> usize {
            *self.releases.lock().unwrap_or_else(|e| e.into_inner())
        }
    }
}
