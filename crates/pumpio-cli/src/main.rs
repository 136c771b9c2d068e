//! pumpio - PIUIO / PIUBTN board polling tool
//!
//! A command-line interface for exercising Andamiro arcade I/O boards: the
//! multiplexed PIUIO dance pad board and the PIUBTN auxiliary button board.
//! Lists boards visible on the bus and runs a timed poll loop with raw,
//! text, TUI and benchmark render modes.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod capture;
mod poll;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pumpio_device::DeviceError;

#[derive(Parser)]
#[command(name = "pumpio")]
#[command(about = "Poll and diagnose PIUIO/PIUBTN arcade I/O boards")]
#[command(version)]
#[command(long_about = "
pumpio drives the Andamiro PIUIO dance pad board and the PIUBTN button
board over USB vendor control transfers, or through the PIUIO kernel
module's device node where that module is loaded.

The poll loop renders every acquired cycle without interpreting it:
use --mode raw for hex dumps, text for per-signal lines, tui for an
in-place cabinet view, benchmark for I/O latency statistics.
")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported boards visible on the bus
    List,

    /// Open a board and run the poll loop
    Poll(PollArgs),
}

#[derive(clap::Args)]
struct PollArgs {
    /// Board to open
    #[arg(long, value_enum, default_value = "piuio")]
    board: Board,

    /// Transport backend (kmod drives the PIUIO board only)
    #[arg(long, value_enum, default_value = "usb")]
    backend: Backend,

    /// Cabinet view for the pad board's sensors and lamps
    #[arg(long, value_enum, default_value = "piu")]
    game: Game,

    /// How each polled cycle is rendered
    #[arg(long, value_enum, default_value = "text")]
    mode: Mode,

    /// Sleep between poll cycles, in milliseconds
    #[arg(long, default_value = "5")]
    delay_ms: u64,

    /// Number of cycles to run, 0 polls until an error
    #[arg(long, default_value = "0")]
    count: u64,

    /// Record every cycle's packets and write them to this file as JSON
    #[arg(long)]
    capture: Option<PathBuf>,

    /// Kernel module device node (a second board enumerates as /dev/piuio1)
    #[arg(long, env = "PUMPIO_KMOD_DEVICE", hide = true)]
    device_path: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Board {
    /// Multiplexed dance pad board
    Piuio,
    /// Auxiliary button board
    Piubtn,
}

impl Board {
    const fn label(self) -> &'static str {
        match self {
            Board::Piuio => "piuio",
            Board::Piubtn => "piubtn",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    /// Vendor control transfers on endpoint 0
    Usb,
    /// Kernel-module device node (Linux, PIUIO only)
    Kmod,
}

impl Backend {
    const fn label(self) -> &'static str {
        match self {
            Backend::Usb => "usb",
            Backend::Kmod => "kmod",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Game {
    /// Pump It Up: five panels per pad, two coin slots
    Piu,
    /// In The Groove: four arrows per pad plus menu buttons
    Itg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Hex dump of the output packet and every input packet
    Raw,
    /// One line per signal
    Text,
    /// In-place cabinet view with OR-merged lamp echo
    Tui,
    /// Per-cycle I/O latency statistics
    Benchmark,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pumpio={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(exit_code(&error))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List => list_boards(),
        Commands::Poll(args) => poll::execute(args),
    }
}

/// Exit codes beyond the generic 1: 2 board missing, 3 busy, 4 permission
/// refused, 5 unplugged mid-run, 6 unsupported board/backend combination.
fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<DeviceError>() {
        Some(DeviceError::NotFound(_)) => 2,
        Some(DeviceError::Busy(_)) => 3,
        Some(DeviceError::PermissionDenied(_)) => 4,
        Some(DeviceError::Gone(_)) => 5,
        Some(DeviceError::Unsupported(_)) => 6,
        _ => 1,
    }
}

fn list_boards() -> Result<()> {
    let found = pumpio_device::usb::discover_boards().context("scanning the USB bus failed")?;

    let mut any = false;

    if !found.is_empty() {
        println!("{:<8} {:<8} {:<8} {:<4} Addr", "Board", "VID", "PID", "Bus");
        println!("{}", "-".repeat(36));
        for entry in &found {
            println!(
                "{:<8} {:<8} {:<8} {:<4} {}",
                entry.board.label,
                format!("0x{:04X}", entry.board.vendor_id),
                format!("0x{:04X}", entry.board.product_id),
                entry.bus_number,
                entry.address,
            );
        }
        any = true;
    }

    #[cfg(target_os = "linux")]
    if pumpio_device::kmod::KmodPort::available() {
        println!(
            "Kernel module node present at {}",
            pumpio_device::kmod::KMOD_DEVICE_PATH
        );
        any = true;
    }

    if !any {
        println!("No supported boards found.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    // --- Subcommand parsing ---

    #[test]
    fn parse_list() -> TestResult {
        let cli = Cli::try_parse_from(["pumpio", "list"])?;
        assert_eq!(cli.verbose, 0);
        assert!(matches!(cli.command, Commands::List));
        Ok(())
    }

    #[test]
    fn parse_poll_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["pumpio", "poll"])?;
        let Commands::Poll(args) = cli.command else {
            return Err("expected poll subcommand".into());
        };
        assert_eq!(args.board, Board::Piuio);
        assert_eq!(args.backend, Backend::Usb);
        assert_eq!(args.game, Game::Piu);
        assert_eq!(args.mode, Mode::Text);
        assert_eq!(args.delay_ms, 5);
        assert_eq!(args.count, 0);
        assert!(args.capture.is_none());
        assert!(args.device_path.is_none());
        Ok(())
    }

    #[test]
    fn parse_poll_full_flag_set() -> TestResult {
        let cli = Cli::try_parse_from([
            "pumpio",
            "poll",
            "--board",
            "piubtn",
            "--backend",
            "usb",
            "--mode",
            "benchmark",
            "--delay-ms",
            "0",
            "--count",
            "1000",
            "--capture",
            "dump.json",
        ])?;
        let Commands::Poll(args) = cli.command else {
            return Err("expected poll subcommand".into());
        };
        assert_eq!(args.board, Board::Piubtn);
        assert_eq!(args.mode, Mode::Benchmark);
        assert_eq!(args.delay_ms, 0);
        assert_eq!(args.count, 1000);
        assert_eq!(args.capture.as_deref(), Some(std::path::Path::new("dump.json")));
        Ok(())
    }

    #[test]
    fn parse_poll_kmod_itg_tui() -> TestResult {
        let cli = Cli::try_parse_from([
            "pumpio",
            "poll",
            "--backend",
            "kmod",
            "--game",
            "itg",
            "--mode",
            "tui",
            "--device-path",
            "/dev/piuio1",
        ])?;
        let Commands::Poll(args) = cli.command else {
            return Err("expected poll subcommand".into());
        };
        assert_eq!(args.backend, Backend::Kmod);
        assert_eq!(args.game, Game::Itg);
        assert_eq!(args.mode, Mode::Tui);
        assert_eq!(
            args.device_path.as_deref(),
            Some(std::path::Path::new("/dev/piuio1"))
        );
        Ok(())
    }

    #[test]
    fn parse_verbose_count_accumulates() -> TestResult {
        let cli = Cli::try_parse_from(["pumpio", "-vvv", "list"])?;
        assert_eq!(cli.verbose, 3);
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["pumpio", "poll", "--mode", "curses"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_unknown_subcommand() {
        let result = Cli::try_parse_from(["pumpio", "reset"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_negative_count() {
        let result = Cli::try_parse_from(["pumpio", "poll", "--count", "-1"]);
        assert!(result.is_err());
    }

    // --- Exit code mapping ---

    #[test]
    fn exit_code_distinguishes_device_errors() {
        let cases = [
            (DeviceError::not_found("piuio"), 2),
            (DeviceError::busy("piuio"), 3),
            (DeviceError::PermissionDenied("piuio".into()), 4),
            (DeviceError::gone("piuio"), 5),
            (DeviceError::unsupported("kmod drives the piuio board only"), 6),
            (DeviceError::timeout("piuio", 10), 1),
        ];
        for (error, expected) in cases {
            assert_eq!(exit_code(&anyhow::Error::new(error)), expected);
        }
    }

    #[test]
    fn exit_code_survives_added_context() {
        let error = anyhow::Error::new(DeviceError::not_found("piubtn"))
            .context("opening the button board failed");
        assert_eq!(exit_code(&error), 2);
    }

    #[test]
    fn exit_code_defaults_to_one_for_foreign_errors() {
        let error = anyhow::anyhow!("capture file unwritable");
        assert_eq!(exit_code(&error), 1);
    }
}
