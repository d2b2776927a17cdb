//! Parliament CLI - binary entry point.
//!
//! Loads `~/.parliament/config.toml`, opens the JSON file store in the
//! configured data directory, and runs one command against it. Logs go to
//! `~/.parliament/logs/parliament.log`; stdout carries only command output.

mod args;
mod render;

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use parliament_config::ParliamentConfig;
use parliament_core::{Admission, Parliament, ParliamentOptions};
use parliament_store::JsonFileStore;
use parliament_types::{CustomSeatProfile, DecisionId, ExportBundle, LawId};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::args::{Cli, Command, CustomCommand, LawCommand, SeatCommand};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than mixing logs into command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.parliament/logs/parliament.log
    if let Some(config_path) = ParliamentConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("parliament.log"));
    }

    // Fallback: ./.parliament/logs/parliament.log
    candidates.push(PathBuf::from(".parliament").join("logs").join("parliament.log"));

    candidates
}

fn print_lines<T>(items: &[T], empty: &str, render: impl Fn(&T) -> String) {
    if items.is_empty() {
        println!("{empty}");
    }
    for item in items {
        println!("{}", render(item));
    }
}

fn run(command: Command, config: &ParliamentConfig) -> Result<()> {
    let store = JsonFileStore::new(config.data_dir());
    let parliament = Parliament::new(store, ParliamentOptions {
        extra_keywords: config.extra_keywords().to_vec(),
        window_days: config.window_days(),
    });

    match command {
        Command::Init { constitution } => {
            let constitution = match constitution {
                Some(path) => Some(parliament_config::load_constitution(&path)?),
                None => config.load_constitution()?,
            };
            parliament.init(constitution)?;
            println!(
                "Parliament initialized in {}",
                parliament.store().dir().display()
            );
        }
        Command::Status => println!("{}", render::status(&parliament.status()?)),
        Command::Timeline => print_lines(
            &parliament.timeline()?,
            "No identities yet.",
            render::identity,
        ),
        Command::Decisions { limit } => print_lines(
            &parliament.recent_decisions(limit)?,
            "No decisions yet.",
            render::decision,
        ),
        Command::Reign { name, reason } => {
            let identity = parliament.create_identity(&name, &reason)?;
            println!("Now reigning: {}", render::identity(&identity));
        }
        Command::End { report } => {
            let ended = parliament.end_identity(&report)?;
            println!("Reign ended: {}", render::identity(&ended));
        }
        Command::Rebirth {
            name,
            report,
            reason,
        } => {
            let (previous, next) = parliament.rebirth(&report, &name, &reason)?;
            println!("Reign ended: {}", render::identity(&previous));
            println!("Now reigning: {}", render::identity(&next));
        }
        Command::Vote {
            topic,
            ballot,
            options,
        } => {
            let decision = parliament.cast_vote(&topic, options, ballot)?;
            for line in decision.breakdown() {
                tracing::debug!(seat = %line.seat, weight = line.weight, "Ballot counted");
            }
            println!("{}", render::decision(&decision));
        }
        Command::Preview { ballot } => {
            println!("{}", render::outcome(&parliament.preview_vote(ballot)?));
        }
        Command::Session {
            session_type,
            policy,
            statements,
            decisions,
        } => {
            let decisions = decisions.into_iter().map(DecisionId::new).collect();
            let record = parliament.record_session(
                session_type.as_str(),
                statements,
                &policy,
                decisions,
            )?;
            println!("{}", render::session(&record.session));
            if let Some(entry) = record.emergency {
                println!("EMERGENCY: {}", render::emergency(&entry));
                println!("The next vote runs in emergency mode.");
            }
        }
        Command::Emergency { text } if text.is_empty() => {
            let entry = parliament.trigger_emergency()?;
            println!("{}", render::emergency(&entry));
            println!("The next vote runs in emergency mode.");
        }
        Command::Emergency { text } => {
            if parliament.scan_emergency(&text.join(" ")) {
                println!("Emergency keywords detected.");
            } else {
                println!("No emergency keywords detected.");
            }
        }
        Command::EmergencyLog => print_lines(
            &parliament.emergency_log()?,
            "Emergency log is empty.",
            render::emergency,
        ),
        Command::Seat { command } => {
            let (seat, active) = match command {
                SeatCommand::Activate { seat } => (seat, true),
                SeatCommand::Deactivate { seat } => (seat, false),
            };
            let kind = parliament.set_seat_active(&seat, active)?;
            let state = if active { "active" } else { "inactive" };
            println!("{kind} is now {state}");
        }
        Command::Custom { command } => run_custom(&parliament, command)?,
        Command::Analytics { days } => {
            println!("{}", render::summary(&parliament.analytics_summary(days)?));
        }
        Command::Law { command } => run_law(&parliament, command)?,
        Command::Export { path } => {
            let bundle = parliament.export()?;
            let json = serde_json::to_string_pretty(&bundle)?;
            match path {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    writeln!(stdout, "{json}")?;
                }
            }
        }
        Command::Import { path } => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let bundle: ExportBundle = serde_json::from_str(&content)
                .with_context(|| format!("{} is not an export bundle", path.display()))?;
            parliament.import(bundle)?;
            println!("Imported {}", path.display());
        }
    }
    Ok(())
}

fn run_custom(parliament: &Parliament<JsonFileStore>, command: CustomCommand) -> Result<()> {
    match command {
        CustomCommand::Admit(admit) => {
            let seat = parliament.admit_custom_seat(Admission {
                name: admit.name,
                weight: admit.weight,
                expiry: admit.expiry.as_str().to_string(),
                expiry_value: admit.value,
                profile: CustomSeatProfile {
                    primary_function: admit.function,
                    problem_statement: admit.problem,
                    values: admit.values,
                    deliberately_ignore: admit.ignore,
                    tone_of_voice: admit.tone,
                    allowed_emotional_range: admit.emotional_range,
                    decision_bias: admit.bias,
                },
            })?;
            println!("Admitted {}", render::custom_seat(&seat));
        }
        CustomCommand::List { all } => print_lines(
            &parliament.list_custom_seats(all)?,
            "No custom seats.",
            render::custom_seat,
        ),
        CustomCommand::Dismiss { seat, reason } => {
            if parliament.dismiss_custom_seat(&seat, &reason)? {
                println!("Dismissed {seat}");
            } else {
                println!("No active custom seat matches {seat:?}");
            }
        }
        CustomCommand::Extend { seat, value } => {
            if parliament.extend_custom_seat(&seat, &value)? {
                println!("Extended {seat} to {value}");
            } else {
                println!("No active custom seat matches {seat:?}");
            }
        }
        CustomCommand::Expire => print_lines(
            &parliament.check_custom_expiries()?,
            "No custom seats expired.",
            |seat| format!("Expired {}", render::custom_seat(seat)),
        ),
    }
    Ok(())
}

fn run_law(parliament: &Parliament<JsonFileStore>, command: LawCommand) -> Result<()> {
    match command {
        LawCommand::Propose {
            name,
            kind,
            proposer,
            expires_in_days,
        } => {
            let expires_at = expires_in_days
                .and_then(|days| TimeDelta::try_days(i64::from(days)))
                .and_then(|span| Utc::now().checked_add_signed(span));
            let law = parliament.propose_law(&name, kind.as_str(), &proposer, expires_at)?;
            println!("Proposed {}", render::law(&law));
        }
        LawCommand::Pass { law, decision } => {
            let law = parliament.pass_law(LawId::new(law), DecisionId::new(decision))?;
            println!("{}", render::law(&law));
        }
        LawCommand::Amend {
            law,
            decision,
            text,
        } => {
            let law =
                parliament.amend_law(LawId::new(law), &text.join(" "), DecisionId::new(decision))?;
            println!("{}", render::law(&law));
        }
        LawCommand::Repeal { law, reason } => {
            println!("{}", render::law(&parliament.repeal_law(LawId::new(law), &reason)?));
        }
        LawCommand::Expire { law } => {
            println!("{}", render::law(&parliament.expire_law(LawId::new(law))?));
        }
        LawCommand::Check => print_lines(
            &parliament.check_law_expiries()?,
            "No laws expired.",
            |law| format!("Expired {}", render::law(law)),
        ),
        LawCommand::List { status } => {
            print_lines(&parliament.laws(status)?, "No laws.", render::law);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ParliamentConfig::load()?.unwrap_or_default();

    if let Err(err) = run(cli.command, &config) {
        tracing::error!("Command failed: {err:#}");
        return Err(err);
    }
    Ok(())
}
