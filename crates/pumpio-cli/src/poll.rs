//! The poll loop: open a session for the selected board and backend, then
//! acquire, render and optionally record cycles until the count runs out
//! or a transfer fails.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use piuio_protocol as piuio;
use piubtn_protocol as piubtn;
use pumpio_device::{
    DEFAULT_TRANSFER_TIMEOUT, DeviceError, DeviceSession, MultiplexDriver, PIUBTN_BOARD,
    PIUIO_BOARD, SessionHandle, SimpleDriver, UsbTransport,
};

use crate::capture::CaptureWriter;
use crate::render::{self, RenderState};
use crate::{Backend, Board, PollArgs};

pub fn execute(args: &PollArgs) -> Result<()> {
    let session = open_session(args)?;
    info!(
        "Polling {} over {} every {}ms",
        args.board.label(),
        args.backend.label(),
        args.delay_ms
    );

    let mut state = RenderState::new();
    let mut capture = args
        .capture
        .as_deref()
        .map(|path| CaptureWriter::new(path, args.board.label(), args.backend.label()));

    let outcome = match args.board {
        Board::Piuio => pad_loop(&session, args, &mut state, capture.as_mut()),
        Board::Piubtn => button_loop(&session, args, &mut state, capture.as_mut()),
    };

    // A failed loop still flushes what it recorded; the capture of a dying
    // conversation is usually the one worth keeping.
    if let Some(writer) = capture {
        writer.finish()?;
    }
    info!("Polled {} cycle(s)", state.frames());
    outcome
}

/// Pair the board with a backend. The kernel module speaks the multiplexed
/// protocol only, so it refuses the button board outright.
fn open_session(args: &PollArgs) -> Result<SessionHandle> {
    let handle = match (args.board, args.backend) {
        (Board::Piuio, Backend::Usb) => {
            let transport = UsbTransport::open(PIUIO_BOARD)?;
            DeviceSession::open(
                PIUIO_BOARD.label,
                Box::new(MultiplexDriver::new(transport, DEFAULT_TRANSFER_TIMEOUT)),
            )
        }
        (Board::Piubtn, Backend::Usb) => {
            let transport = UsbTransport::open(PIUBTN_BOARD)?;
            DeviceSession::open(
                PIUBTN_BOARD.label,
                Box::new(SimpleDriver::new(transport, DEFAULT_TRANSFER_TIMEOUT)),
            )
        }
        (Board::Piuio, Backend::Kmod) => open_kmod_session(args.device_path.as_deref())?,
        (Board::Piubtn, Backend::Kmod) => {
            return Err(DeviceError::unsupported(
                "the kernel module only drives the multiplexed pad board",
            )
            .into());
        }
    };
    Ok(handle)
}

#[cfg(target_os = "linux")]
fn open_kmod_session(device_path: Option<&Path>) -> Result<SessionHandle> {
    use pumpio_device::kmod::KmodPort;

    let port = match device_path {
        Some(path) => KmodPort::open_path(path)?,
        None => KmodPort::open()?,
    };
    let name = port.path().display().to_string();
    Ok(DeviceSession::open(name, Box::new(port)))
}

#[cfg(not(target_os = "linux"))]
fn open_kmod_session(_device_path: Option<&Path>) -> Result<SessionHandle> {
    Err(DeviceError::unsupported("the kernel module backend needs linux").into())
}

fn pad_loop(
    session: &SessionHandle,
    args: &PollArgs,
    state: &mut RenderState,
    mut capture: Option<&mut CaptureWriter>,
) -> Result<()> {
    // Lamp state is caller-owned and this loop keeps every lamp dark; the
    // renderers echo sensor activity for display only.
    let output = piuio::OutputPacket::new();
    let delay = Duration::from_millis(args.delay_ms);
    let mut cycles = 0u64;

    loop {
        let started = Instant::now();
        let batch = session
            .poll_batch(&output)
            .context("pad poll cycle failed")?;
        let io_time = started.elapsed();

        if let Some(writer) = capture.as_mut() {
            writer.record_pad_cycle(&output, &batch);
        }
        render::render_pad(args.mode, args.game, &output, &batch, io_time, state);

        cycles += 1;
        if args.count != 0 && cycles >= args.count {
            return Ok(());
        }
        thread::sleep(delay);
    }
}

fn button_loop(
    session: &SessionHandle,
    args: &PollArgs,
    state: &mut RenderState,
    mut capture: Option<&mut CaptureWriter>,
) -> Result<()> {
    let output = piubtn::OutputPacket::new();
    let delay = Duration::from_millis(args.delay_ms);
    let mut cycles = 0u64;

    loop {
        let started = Instant::now();
        let input = session
            .poll_buttons(&output)
            .context("button poll cycle failed")?;
        let io_time = started.elapsed();

        if let Some(writer) = capture.as_mut() {
            writer.record_button_cycle(&output, &input);
        }
        render::render_buttons(args.mode, &output, &input, io_time, state);

        cycles += 1;
        if args.count != 0 && cycles >= args.count {
            return Ok(());
        }
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use pumpio_device::transport::mock::MockTransport;

    use crate::{Game, Mode};

    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn poll_args(board: Board, backend: Backend, count: u64) -> PollArgs {
        PollArgs {
            board,
            backend,
            game: Game::Piu,
            mode: Mode::Raw,
            delay_ms: 0,
            count,
            capture: None,
            device_path: None,
        }
    }

    fn pad_session(transport: MockTransport) -> SessionHandle {
        DeviceSession::open(
            "mock-pad",
            Box::new(MultiplexDriver::new(transport, DEFAULT_TRANSFER_TIMEOUT)),
        )
    }

    #[test]
    fn pad_loop_runs_exactly_count_cycles() {
        let transport = MockTransport::new();
        let probe = transport.probe();
        probe.enable_complement_echo();
        let session = pad_session(transport);

        let args = poll_args(Board::Piuio, Backend::Usb, 3);
        let mut state = RenderState::new();
        pad_loop(&session, &args, &mut state, None).expect("loop should finish");

        assert_eq!(state.frames(), 3);
        // Four sub-polls per cycle, each one write plus one read.
        assert_eq!(probe.calls().len(), 3 * 8);
    }

    #[test]
    fn pad_loop_surfaces_transfer_failures() {
        let transport = MockTransport::new();
        let probe = transport.probe();
        probe.enable_complement_echo();
        probe.fail_read_at(5, DeviceError::timeout("mock-pad", 10));
        let session = pad_session(transport);

        let args = poll_args(Board::Piuio, Backend::Usb, 0);
        let mut state = RenderState::new();
        let error = pad_loop(&session, &args, &mut state, None).expect_err("loop should fail");

        assert!(matches!(
            error.downcast_ref::<DeviceError>(),
            Some(DeviceError::Timeout { .. })
        ));
        // The second cycle dies on its second sub-poll; only the first
        // cycle ever rendered.
        assert_eq!(state.frames(), 1);
    }

    #[test]
    fn button_loop_is_one_write_one_read_per_cycle() {
        let transport = MockTransport::new();
        let probe = transport.probe();
        probe.enable_complement_echo();
        let session = DeviceSession::open(
            "mock-buttons",
            Box::new(SimpleDriver::new(transport, DEFAULT_TRANSFER_TIMEOUT)),
        );

        let args = poll_args(Board::Piubtn, Backend::Usb, 2);
        let mut state = RenderState::new();
        button_loop(&session, &args, &mut state, None).expect("loop should finish");

        assert_eq!(state.frames(), 2);
        assert_eq!(probe.calls().len(), 4);
    }

    #[test]
    fn kmod_backend_refuses_the_button_board() {
        let args = poll_args(Board::Piubtn, Backend::Kmod, 1);
        let error = open_session(&args).expect_err("combination must be refused");
        assert!(matches!(
            error.downcast_ref::<DeviceError>(),
            Some(DeviceError::Unsupported(_))
        ));
    }

    #[test]
    fn pad_loop_capture_records_every_packet() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pad.json");

        let transport = MockTransport::new();
        let probe = transport.probe();
        probe.enable_complement_echo();
        let session = pad_session(transport);

        let args = poll_args(Board::Piuio, Backend::Usb, 2);
        let mut state = RenderState::new();
        let mut writer = CaptureWriter::new(&path, "piuio", "usb");
        pad_loop(&session, &args, &mut state, Some(&mut writer))?;
        writer.finish()?;

        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        let records = parsed["records"].as_array().expect("records array");
        assert_eq!(records.len(), 10);
        assert_eq!(records[0]["direction"], "out");
        assert_eq!(records[1]["group"], "up");
        Ok(())
    }
}
