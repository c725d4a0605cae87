//! `slots` CLI — list open appointment times, re-check bookings, and validate
//! provider schedules from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Open 60-minute slots on a date (schedule and reservations as served by the backend)
//! slots available --schedule schedule.json --reservations reservations.json \
//!     --date 2026-03-16 --duration 60
//!
//! # Same, as JSON, with a 30-minute stride
//! slots available --schedule schedule.json --date 2026-03-16 --duration 60 --stride 30 --json
//!
//! # Re-check a booking request body before submitting it
//! slots check --schedule schedule.json --reservations reservations.json \
//!     --booking booking.json --duration 60
//!
//! # Validate a schedule map (stdin)
//! cat schedule.json | slots validate-schedule
//!
//! # Times offered by the schedule editor between store opening and closing
//! slots options --open 09:00 --close 18:00
//! ```
//!
//! Logging goes to stderr; `-v` / `-vv` or `SLOTS_LOG=debug` turn it up.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Read};

use slot_engine::reservation::parse_records;
use slot_engine::time::parse_date;
use slot_engine::{
    blocking_reservations, editor_time_options, AvailabilityConfig, AvailabilityService, BookingRequest,
    Reservation, ScheduleMap, Stride, TimeOfDay,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Appointment availability CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration file (JSON)
    #[arg(long, global = true, env = "SLOTS_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available start times for a date
    Available {
        /// Schedule map file (`-` for stdin)
        #[arg(long)]
        schedule: String,
        /// Reservation list file; omit when the provider has no bookings
        #[arg(long)]
        reservations: Option<String>,
        /// Calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Service duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
        /// Minutes between candidate start times (overrides the config file)
        #[arg(long, env = "SLOTS_STRIDE")]
        stride: Option<i64>,
        /// Print slots as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Check that a booking request still targets an available slot
    Check {
        /// Schedule map file (`-` for stdin)
        #[arg(long)]
        schedule: String,
        /// Reservation list file; omit when the provider has no bookings
        #[arg(long)]
        reservations: Option<String>,
        /// Booking request body file (`-` for stdin)
        #[arg(long)]
        booking: String,
        /// Service duration in minutes
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
        /// Minutes between candidate start times (overrides the config file)
        #[arg(long, env = "SLOTS_STRIDE")]
        stride: Option<i64>,
    },
    /// Validate a schedule map the way the schedule editor does before saving
    ValidateSchedule {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List the times offered by the schedule editor's pickers
    Options {
        /// Store opening time (HH:MM)
        #[arg(long)]
        open: String,
        /// Store closing time (HH:MM)
        #[arg(long)]
        close: String,
        /// Minutes between options
        #[arg(long, default_value_t = 30)]
        step: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Available {
            schedule,
            reservations,
            date,
            duration,
            stride,
            json,
        } => {
            let config = load_config(cli.config.as_deref(), stride)?;
            let service = AvailabilityService::from_config(&config)?;
            let schedule = read_schedule(&schedule)?;
            let reservations = read_reservations(reservations.as_deref(), &config)?;
            let date = parse_date(&date)?;

            let slots = service
                .compute_available_slots(date, duration, &schedule, &reservations)
                .context("Failed to compute availability")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else if slots.is_empty() {
                println!("No times available on {}", date);
            } else {
                for slot in &slots {
                    println!("{}", slot.time());
                }
            }
        }
        Commands::Check {
            schedule,
            reservations,
            booking,
            duration,
            stride,
        } => {
            let config = load_config(cli.config.as_deref(), stride)?;
            let service = AvailabilityService::from_config(&config)?;
            let schedule = read_schedule(&schedule)?;
            let reservations = read_reservations(reservations.as_deref(), &config)?;
            let request = BookingRequest::from_json_str(&read_input(input_path(&booking))?)
                .context("Failed to parse booking request")?;

            let slot = service.check_booking(&request, duration, &schedule, &reservations)?;
            println!(
                "available: {} {}-{}",
                slot.start.date(),
                slot.time(),
                slot.end.format("%H:%M")
            );
        }
        Commands::ValidateSchedule { input } => {
            let schedule = ScheduleMap::from_json_str(&read_input(input.as_deref())?)
                .context("Failed to parse schedule")?;
            schedule.validate()?;
            println!("Schedule OK ({} days)", schedule.len());
        }
        Commands::Options { open, close, step } => {
            let open: TimeOfDay = open.parse()?;
            let close: TimeOfDay = close.parse()?;
            for time in editor_time_options(Some(open), Some(close), Stride::new(step)?) {
                println!("{}", time);
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `-v` flags win over `SLOTS_LOG`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("SLOTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then `--stride` / `SLOTS_STRIDE`.
fn load_config(path: Option<&str>, stride: Option<i64>) -> Result<AvailabilityConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path))?;
            AvailabilityConfig::from_json_str(&json).with_context(|| format!("Invalid config: {}", path))?
        }
        None => AvailabilityConfig::default(),
    };
    if let Some(stride) = stride {
        config.stride_minutes = stride;
    }
    config.validate()?;
    tracing::debug!(stride = config.stride_minutes, blocking = ?config.blocking, "loaded configuration");
    Ok(config)
}

fn read_schedule(path: &str) -> Result<ScheduleMap> {
    let json = read_input(input_path(path))?;
    ScheduleMap::from_json_str(&json).with_context(|| format!("Failed to parse schedule: {}", path))
}

fn read_reservations(path: Option<&str>, config: &AvailabilityConfig) -> Result<Vec<Reservation>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let json = read_input(input_path(path))?;
    let records = parse_records(&json).with_context(|| format!("Failed to parse reservations: {}", path))?;
    Ok(blocking_reservations(&records, &config.blocking)?)
}

/// `-` selects stdin.
fn input_path(path: &str) -> Option<&str> {
    (path != "-").then_some(path)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
