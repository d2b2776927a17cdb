//! Command-line definition.
//!
//! Ballots and statements are given as `Seat=value` pairs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use parliament_types::{ExpiryCondition, LawKind, LawStatus, SessionType};

/// Parliament - a decision journal voted on by your future selves
#[derive(Debug, Parser)]
#[command(name = "parliament", version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a fresh parliament
    Init {
        /// Constitution JSON; defaults to `[constitution] path` in the config
        constitution: Option<PathBuf>,
    },

    /// Show the reigning identity, seats and recent sessions
    Status,

    /// List every identity in reign order
    Timeline,

    /// List recent decisions, newest first
    Decisions {
        #[arg(default_value_t = 10)]
        limit: usize,
    },

    /// Begin a new reign, archiving the current identity
    Reign {
        name: String,
        #[arg(default_value = "")]
        reason: String,
    },

    /// End the current reign
    End {
        /// Exit report
        #[arg(default_value = "")]
        report: String,
    },

    /// End the current reign and begin the next
    Rebirth {
        name: String,
        /// Exit report for the current identity
        #[arg(long, default_value = "")]
        report: String,
        /// Why the new identity begins
        #[arg(long, default_value = "")]
        reason: String,
    },

    /// Cast and record a vote
    Vote {
        topic: String,
        /// Seat=yes|no|abstain
        #[arg(required = true, value_parser = seat_pair)]
        ballot: Vec<(String, String)>,
        /// Options on the table; defaults to yes/no
        #[arg(long = "option")]
        options: Vec<String>,
    },

    /// Tally a ballot without recording it
    Preview {
        /// Seat=yes|no|abstain
        #[arg(required = true, value_parser = seat_pair)]
        ballot: Vec<(String, String)>,
    },

    /// Record a daily or weekly session
    Session {
        session_type: SessionType,
        /// Final policy text
        policy: String,
        /// Seat=statement
        #[arg(value_parser = seat_pair)]
        statements: Vec<(String, String)>,
        /// Decision id this session refers to (repeatable)
        #[arg(long = "decision")]
        decisions: Vec<u64>,
    },

    /// Arm emergency mode, or scan text for emergency keywords
    Emergency {
        /// Text to scan; without it emergency mode is armed directly
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Print the emergency audit log
    EmergencyLog,

    /// Activate or deactivate a permanent seat
    Seat {
        #[command(subcommand)]
        command: SeatCommand,
    },

    /// Manage custom seats
    Custom {
        #[command(subcommand)]
        command: CustomCommand,
    },

    /// Speaking and voting balance over a window
    Analytics {
        /// Window in days; defaults to the configured window
        days: Option<u32>,
    },

    /// Manage the law register
    Law {
        #[command(subcommand)]
        command: LawCommand,
    },

    /// Write state and the emergency log as one JSON bundle
    Export {
        /// Output file; stdout when omitted
        path: Option<PathBuf>,
    },

    /// Restore a bundle into an empty data directory
    Import { path: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum SeatCommand {
    Activate { seat: String },
    Deactivate { seat: String },
}

#[derive(Debug, Subcommand)]
pub enum CustomCommand {
    /// Admit a temporary seat
    Admit(AdmitArgs),

    /// List active custom seats
    List {
        /// Include retired seats
        #[arg(long)]
        all: bool,
    },

    /// Retire a seat by id or name
    Dismiss {
        seat: String,
        #[arg(default_value = "")]
        reason: String,
    },

    /// Replace a seat's expiry value
    Extend { seat: String, value: String },

    /// Retire time-based seats whose day count has elapsed
    Expire,
}

#[derive(Debug, Args)]
pub struct AdmitArgs {
    pub name: String,
    pub weight: u32,
    /// manual, time-based or event-based
    #[arg(long, default_value = "manual")]
    pub expiry: ExpiryCondition,
    /// Day count for time-based seats, event description for event-based
    #[arg(long, default_value = "")]
    pub value: String,
    #[arg(long, default_value = "")]
    pub function: String,
    #[arg(long, default_value = "")]
    pub problem: String,
    #[arg(long, default_value = "")]
    pub values: String,
    #[arg(long, default_value = "")]
    pub ignore: String,
    #[arg(long, default_value = "")]
    pub tone: String,
    #[arg(long, default_value = "")]
    pub emotional_range: String,
    #[arg(long, default_value = "")]
    pub bias: String,
}

#[derive(Debug, Subcommand)]
pub enum LawCommand {
    /// Propose a law; it stays pending until a passed decision enacts it
    Propose {
        name: String,
        #[arg(long, default_value = "standing")]
        kind: LawKind,
        #[arg(long, default_value = "User")]
        proposer: String,
        /// Days until an active law expires
        #[arg(long)]
        expires_in_days: Option<u32>,
    },

    /// Enact a pending law with a passed decision
    Pass { law: u64, decision: u64 },

    /// Amend an active law with a passed decision
    Amend {
        law: u64,
        decision: u64,
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Repeal a law
    Repeal {
        law: u64,
        #[arg(default_value = "")]
        reason: String,
    },

    /// Expire a law now
    Expire { law: u64 },

    /// Expire every active law past its expiry date
    Check,

    /// List laws, optionally by status
    List {
        #[arg(value_parser = law_status)]
        status: Option<LawStatus>,
    },
}

fn seat_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(seat, value)| (seat.trim().to_string(), value.to_string()))
        .filter(|(seat, _)| !seat.is_empty())
        .ok_or_else(|| format!("expected Seat=value, got {raw:?}"))
}

fn law_status(raw: &str) -> Result<LawStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending" => Ok(LawStatus::Pending),
        "active" => Ok(LawStatus::Active),
        "repealed" => Ok(LawStatus::Repealed),
        "expired" => Ok(LawStatus::Expired),
        other => Err(format!(
            "unknown law status {other:?} (expected pending, active, repealed or expired)"
        )),
    }
}
