// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `gasgauge shell` command implementation.
//!
//! Interactive REPL over one usage ledger with readline history. Short
//! commands (`g`, `s`, `h`) and a leading `/` are accepted. The session is
//! saved to the metrics file on `save` and on exit.

use chrono::Utc;
use colored::Colorize;
use gasgauge_config::model::GaugeConfig;
use gasgauge_core::{GaugeError, OperationKind, OperationParams};
use gasgauge_cost::{Checkpoint, UsageLedger};
use gasgauge_storage::MetricsStore;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info, warn};

use crate::status;

const HELP: &str = "\
Commands:
  reg <kind> [complexity] [size]        register an operation
  est <kind> [complexity] [size]        estimate without registering
  pre <task> <kind> [complexity] [size] pre-task assessment
  status | s                            status report
  gauge | g                             ASCII gauge
  warn                                  platform warning seen now
  stop                                  platform hard stop seen now
  check <checkpoint>                    checkpoint gate
  hop                                   hop preparation summary
  save                                  save this session and start a new one
  help | h                              this help
  quit | q                              save and exit
Kinds: context_load, code_generation, discussion, search, artifact_creation, planning
Sizes may be numeric for context (KB), discussion (words) and search (results).";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register(OperationArgs),
    Estimate(OperationArgs),
    Assess { task: String, op: OperationArgs },
    Status,
    Gauge,
    ObserveWarning,
    ObserveHardStop,
    Checkpoint(String),
    Hop,
    Save,
    Help,
    Quit,
}

/// Loose operation arguments as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationArgs {
    pub kind: String,
    pub complexity: Option<String>,
    pub size: Option<String>,
}

impl OperationArgs {
    fn from_words(words: &[&str]) -> Option<Self> {
        let (kind, rest) = words.split_first()?;
        Some(Self {
            kind: kind.to_string(),
            complexity: rest.first().map(|s| s.to_string()),
            size: rest.get(1).map(|s| s.to_string()),
        })
    }

    fn resolve(&self) -> Result<(OperationKind, OperationParams), GaugeError> {
        let kind = OperationKind::parse(&self.kind)?;
        let params =
            OperationParams::from_args(kind, self.complexity.as_deref(), self.size.as_deref())?;
        Ok((kind, params))
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };

    let op = |usage: &str| OperationArgs::from_words(args).ok_or_else(|| format!("usage: {usage}"));

    let command = match head.to_ascii_lowercase().as_str() {
        "reg" | "register" | "r" => Command::Register(op("reg <kind> [complexity] [size]")?),
        "est" | "estimate" | "e" => Command::Estimate(op("est <kind> [complexity] [size]")?),
        "pre" | "assess" | "p" => {
            let usage = "pre <task> <kind> [complexity] [size]";
            let (task, rest) = args.split_first().ok_or_else(|| format!("usage: {usage}"))?;
            let op = OperationArgs::from_words(rest).ok_or_else(|| format!("usage: {usage}"))?;
            Command::Assess {
                task: task.to_string(),
                op,
            }
        }
        "status" | "s" => Command::Status,
        "gauge" | "g" => Command::Gauge,
        "warn" | "w" => Command::ObserveWarning,
        "stop" => Command::ObserveHardStop,
        "check" | "c" => {
            let name = args.first().ok_or("usage: check <checkpoint>")?;
            Command::Checkpoint(name.to_string())
        }
        "hop" => Command::Hop,
        "save" => Command::Save,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (type `help`)")),
    };
    Ok(Some(command))
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    Quit(String),
}

/// One shell session: the live ledger plus the store it is saved to.
pub struct ShellSession {
    config: GaugeConfig,
    ledger: UsageLedger,
    store: MetricsStore,
    use_color: bool,
    dirty: bool,
}

impl ShellSession {
    /// Start a session from learned thresholds when the metrics file has them.
    pub fn new(config: GaugeConfig, use_color: bool) -> Self {
        let store = MetricsStore::new(&config.metrics);
        let ledger = fresh_ledger(&config, &store);
        Self {
            config,
            ledger,
            store,
            use_color,
            dirty: false,
        }
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    fn prompt(&self) -> String {
        let usage = format!("{:.1}%", self.ledger.usage());
        if self.use_color {
            format!("{} {}> ", "gauge".green(), usage)
        } else {
            format!("gauge {usage}> ")
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, GaugeError> {
        let color = self.use_color;
        let text = match command {
            Command::Register(op) => {
                let (kind, params) = op.resolve()?;
                let registration = self.ledger.record(kind, &params)?;
                self.dirty = true;
                let mut text = format!(
                    "{} ({}): +{:.1}% -> {}",
                    kind.label(),
                    params.describe(),
                    registration.cost,
                    status::render_gauge(
                        registration.usage,
                        &self.ledger.thresholds(),
                        self.ledger.check_status().status
                    )
                );
                if let Some(crossing) = registration.crossing {
                    text.push('\n');
                    text.push_str(&status::crossing_report(&crossing, color));
                }
                text
            }
            Command::Estimate(op) => {
                let (kind, params) = op.resolve()?;
                status::estimate_report(&self.ledger.estimate(kind, &params)?, color)
            }
            Command::Assess { task, op } => {
                let (kind, params) = op.resolve()?;
                let assessment = self.ledger.pre_task_assessment(&task, kind, &params)?;
                status::assessment_report(&assessment, &self.ledger.thresholds(), color)
            }
            Command::Status => status::status_report(&self.ledger.check_status(), color),
            Command::Gauge => {
                let snapshot = self.ledger.check_status();
                status::render_gauge(snapshot.usage, &snapshot.thresholds, snapshot.status)
            }
            Command::ObserveWarning => {
                let event = self.ledger.observe_warning()?;
                self.dirty = true;
                format!(
                    "warning observed at {:.1}%, warning threshold now {:.1}%",
                    event.usage_at_observation, event.updated_threshold
                )
            }
            Command::ObserveHardStop => {
                let event = self.ledger.observe_hard_stop()?;
                self.dirty = true;
                format!(
                    "hard stop observed at {:.1}%, hard-stop threshold now {:.1}%",
                    event.usage_at_observation, event.updated_threshold
                )
            }
            Command::Checkpoint(name) => {
                let checkpoint = Checkpoint::parse(&name)?;
                status::checkpoint_report(&self.ledger.check_checkpoint(checkpoint), color)
            }
            Command::Hop => status::hop_report(&self.ledger.prepare_hop(), color),
            Command::Save => {
                let text = self.save()?;
                self.ledger = fresh_ledger(&self.config, &self.store);
                format!("{text}\nnew session {}", self.ledger.session_id())
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit(self.finish())),
        };
        Ok(Reply::Continue(text))
    }

    /// Save if anything happened since the last save. Failures are reported, not fatal.
    pub fn finish(&mut self) -> String {
        if !self.dirty {
            return "nothing to save".to_string();
        }
        match self.save() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "session not saved");
                format!("session not saved: {e}")
            }
        }
    }

    fn save(&mut self) -> Result<String, GaugeError> {
        let outcome = self.store.save(&self.ledger.session_record(Utc::now()))?;
        self.dirty = false;
        let averages = match (outcome.avg_warning, outcome.avg_hard_stop) {
            (Some(w), Some(h)) => format!(", averages warning {w:.1}% / hard stop {h:.1}%"),
            _ => String::new(),
        };
        Ok(format!(
            "saved {} to {} ({} sessions kept{averages})",
            self.ledger.session_id(),
            outcome.path.display(),
            outcome.sessions_retained
        ))
    }
}

fn fresh_ledger(config: &GaugeConfig, store: &MetricsStore) -> UsageLedger {
    let ledger = UsageLedger::new(config);
    match store.recommended_thresholds() {
        Some(learned) => {
            debug!(
                warning = learned.warning,
                hard_stop = learned.hard_stop,
                "starting from learned thresholds"
            );
            ledger.with_thresholds(learned)
        }
        None => ledger,
    }
}

/// Runs the `gasgauge shell` interactive REPL.
pub fn run_shell(config: GaugeConfig, use_color: bool) -> Result<(), GaugeError> {
    let mut session = ShellSession::new(config, use_color);
    info!(session_id = %session.ledger().session_id(), "shell session started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| GaugeError::Internal(format!("failed to initialize readline: {e}")))?;

    if use_color {
        println!("{}", "gasgauge shell".bold().green());
        println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());
    } else {
        println!("gasgauge shell\nType help for commands, quit to exit.\n");
    }

    loop {
        match rl.readline(&session.prompt()) {
            Ok(line) => {
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(usage) => {
                        eprintln!("{usage}");
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.as_str());

                match session.execute(command) {
                    Ok(Reply::Continue(text)) => println!("{text}"),
                    Ok(Reply::Quit(text)) => {
                        println!("{text}");
                        return Ok(());
                    }
                    Err(e) if e.is_caller_error() => eprintln!("{e}"),
                    Err(e) => {
                        if use_color {
                            eprintln!("{}: {e}", "error".red());
                        } else {
                            eprintln!("error: {e}");
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("error: {e}");
                break;
            }
        }
    }

    println!("{}", session.finish());
    Ok(())
}
