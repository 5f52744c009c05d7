//! CLI subcommands: single requests, request streams, zone and file status.

mod config_cmd;
mod run;
mod session;
mod set;
mod status;
mod zones;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use lightd_lib::arbiter::SUPPORTED_ZONES;
pub(super) use lightd_lib::color;
pub(super) use lightd_lib::config::Config;
pub(super) use lightd_lib::error::Result;
pub(super) use lightd_lib::{FlashMode, LightRequest, Status, Zone};
pub(super) use session::Session;

/// Flags shared by every subcommand.
pub struct Options {
    pub json: bool,
    pub config_path: Option<PathBuf>,
    pub dry_run: bool,
}

/// Load config from `custom_path` if given, else from the platform default.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

/// Build a request from CLI-style fields: timed when either flash time is given.
pub(super) fn build_request(color: u32, on_ms: Option<u32>, off_ms: Option<u32>) -> LightRequest {
    if on_ms.is_none() && off_ms.is_none() {
        LightRequest::steady(color)
    } else {
        LightRequest::timed(color, on_ms.unwrap_or(0), off_ms.unwrap_or(0))
    }
}

const PADDING: usize = 2;

/// Column at which values start, shared by top-level and indented keys.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indented rows carry a two-space prefix.
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w.saturating_sub(2));
}

pub(super) fn print_json_pretty(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{text}");
    Ok(())
}

// ── JSON output structs ──

#[derive(Debug, Serialize)]
pub(super) struct DispatchOutput {
    pub zone: String,
    pub zone_id: u32,
    pub request: LightRequest,
    pub status: Status,
    /// Writes recorded by a dry run; absent when files were written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writes: Option<Vec<WriteJson>>,
}

#[derive(Debug, Serialize)]
pub(super) struct WriteJson {
    pub path: String,
    pub value: String,
}

fn print_writes(writes: &[WriteJson]) {
    for w in writes {
        println!("  {} = {}", w.path, w.value);
    }
}

impl DispatchOutput {
    /// Print one line of JSON, or the human-readable form.
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            let text = serde_json::to_string(self).map_err(std::io::Error::from)?;
            println!("{text}");
            return Ok(());
        }
        println!("{}: {}", self.zone, self.status);
        if let Some(writes) = &self.writes {
            print_writes(writes);
        }
        Ok(())
    }
}

/// Writes a dry run recorded while switching the LED off at end of input.
#[derive(Debug, Serialize)]
pub(super) struct TurnOffOutput {
    pub turned_off: bool,
    pub writes: Vec<WriteJson>,
}

impl TurnOffOutput {
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            let text = serde_json::to_string(self).map_err(std::io::Error::from)?;
            println!("{text}");
            return Ok(());
        }
        println!("off:");
        print_writes(&self.writes);
        Ok(())
    }
}

#[derive(Serialize)]
pub(super) struct ZonesOutput {
    pub count: usize,
    pub zones: Vec<ZoneJson>,
}

#[derive(Serialize)]
pub(super) struct ZoneJson {
    pub name: String,
    pub id: u32,
}

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub leds_root: String,
    /// `None` when `max_brightness` is unreadable; the arbiter then uses 255.
    pub panel_max_brightness: Option<u32>,
    pub files: Vec<FileStatusJson>,
}

#[derive(Serialize)]
pub(super) struct FileStatusJson {
    pub path: String,
    pub present: bool,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub validation_errors: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send one light request
    Set {
        /// Zone name (backlight, battery, notifications, attention, ...) or numeric id
        zone: Zone,
        /// Color as #RRGGBB, #AARRGGBB or a name (default: config `default_color`)
        color: Option<String>,
        /// Flash on time in milliseconds
        #[arg(long)]
        on_ms: Option<u32>,
        /// Flash off time in milliseconds
        #[arg(long)]
        off_ms: Option<u32>,
    },

    /// Read newline-delimited JSON requests from stdin and dispatch each one
    Run,

    /// List zones that have a handler
    Zones,

    /// Show LED root, panel capability and control-file presence
    Status,

    /// Show current configuration and file path
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Warn if `--dry-run` was passed to a command that never writes control files.
fn warn_dry_run_unused(cmd_name: &str) {
    log::warn!("--dry-run has no effect on `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, opts: &Options) -> Result<()> {
    match cmd {
        Command::Set {
            zone,
            color,
            on_ms,
            off_ms,
        } => set::cmd_set(zone, color.as_deref(), on_ms, off_ms, opts),
        Command::Run => run::cmd_run(opts),
        Command::Zones => {
            if opts.dry_run {
                warn_dry_run_unused("zones");
            }
            zones::cmd_zones(opts.json)
        }
        Command::Status => {
            if opts.dry_run {
                warn_dry_run_unused("status");
            }
            status::cmd_status(opts.json, opts.config_path.as_deref())
        }
        Command::Config { init } => {
            if opts.dry_run {
                warn_dry_run_unused("config");
            }
            config_cmd::cmd_config(opts.json, opts.config_path.as_deref(), init)
        }
    }
}
