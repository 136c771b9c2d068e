//! JSON packet capture for test fixture generation.
//!
//! Records accumulate in memory while the poll loop runs and land on disk
//! as one pretty-printed document when the loop ends. Every packet that
//! crosses the transport becomes one record, outputs included, so a capture
//! replays the whole conversation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use piuio_protocol::{InputBatch, OutputPacket};
use piubtn_protocol as piubtn;
use serde::{Deserialize, Serialize};

/// One packet crossing the transport.
#[derive(Debug, Serialize, Deserialize)]
pub struct PacketRecord {
    pub timestamp_us: u64,
    /// `"out"` for host-to-board, `"in"` for board-to-host.
    pub direction: String,
    /// Sensor slot of a multiplexed input packet. Absent for outputs and
    /// for the button board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub data: String,
}

/// On-disk shape of a finished capture.
#[derive(Debug, Serialize, Deserialize)]
pub struct CaptureFile {
    pub board: String,
    pub backend: String,
    pub records: Vec<PacketRecord>,
}

/// Accumulates packet records during a poll loop and writes them out once.
pub struct CaptureWriter {
    path: PathBuf,
    file: CaptureFile,
    started: Instant,
    epoch_us: u64,
}

impl CaptureWriter {
    pub fn new(path: &Path, board: &str, backend: &str) -> Self {
        let epoch_us = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64;
        Self {
            path: path.to_path_buf(),
            file: CaptureFile {
                board: board.to_owned(),
                backend: backend.to_owned(),
                records: Vec::new(),
            },
            started: Instant::now(),
            epoch_us,
        }
    }

    /// Record one multiplexed pad cycle: the output packet once, then the
    /// four input slots in acquisition order.
    pub fn record_pad_cycle(&mut self, output: &OutputPacket, batch: &InputBatch) {
        let timestamp_us = self.now_us();
        self.push(timestamp_us, "out", None, output.as_bytes());
        for (group, input) in batch.iter() {
            self.push(timestamp_us, "in", Some(group.label()), input.as_bytes());
        }
    }

    /// Record one button board cycle: output, then input.
    pub fn record_button_cycle(
        &mut self,
        output: &piubtn::OutputPacket,
        input: &piubtn::InputPacket,
    ) {
        let timestamp_us = self.now_us();
        self.push(timestamp_us, "out", None, output.as_bytes());
        self.push(timestamp_us, "in", None, input.as_bytes());
    }

    /// Serialize everything recorded so far and write the file.
    pub fn finish(self) -> Result<()> {
        let count = self.file.records.len();
        let json = serde_json::to_string_pretty(&self.file)
            .context("failed to serialize capture records")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write capture file '{}'", self.path.display()))?;
        println!("{count} record(s) saved to '{}'.", self.path.display());
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.epoch_us + self.started.elapsed().as_micros() as u64
    }

    fn push(&mut self, timestamp_us: u64, direction: &str, group: Option<&str>, bytes: &[u8]) {
        self.file.records.push(PacketRecord {
            timestamp_us,
            direction: direction.to_owned(),
            group: group.map(str::to_owned),
            data: hex_bytes(bytes),
        });
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
