//! `run` subcommand: dispatch newline-delimited JSON requests from stdin.
//!
//! Each line is one request:
//!
//! ```text
//! {"zone": "notifications", "color": "#80FF0000", "on_ms": 400, "off_ms": 600}
//! {"zone": 3, "color": "green"}
//! ```
//!
//! `zone` is a name or numeric id; `color` defaults to off. A request is
//! timed when either flash time is present, unless `flash_mode` (`none`,
//! `timed` or `hardware`) says otherwise. All requests go through one
//! arbiter, so zone states persist across lines.

use std::io::BufRead;

use serde::Deserialize;

use super::{
    FlashMode, LightRequest, Options, Result, Session, TurnOffOutput, Zone, build_request, color,
    load_config,
};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZoneField {
    Id(u32),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestLine {
    zone: ZoneField,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    on_ms: Option<u32>,
    #[serde(default)]
    off_ms: Option<u32>,
    #[serde(default)]
    flash_mode: Option<FlashMode>,
}

fn parse_line(line: &str) -> std::result::Result<(Zone, LightRequest), String> {
    let parsed: RequestLine = serde_json::from_str(line).map_err(|e| e.to_string())?;
    let zone = match parsed.zone {
        ZoneField::Id(id) => Zone::from(id),
        ZoneField::Name(name) => name.parse::<Zone>().map_err(|e| e.to_string())?,
    };
    let color = match parsed.color.as_deref() {
        Some(text) => color::parse_color(text).map_err(|e| e.to_string())?,
        None => 0,
    };
    let mut request = build_request(color, parsed.on_ms, parsed.off_ms);
    if let Some(mode) = parsed.flash_mode {
        request.flash_mode = mode;
    }
    Ok((zone, request))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    dispatched: usize,
    rejected: usize,
    failed: usize,
}

fn dispatch_lines(session: &Session, input: impl BufRead, json: bool) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let (zone, request) = match parse_line(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("line {line_no}: {e}");
                summary.rejected += 1;
                continue;
            }
        };
        match session.dispatch(zone, &request) {
            Ok(out) => {
                out.print(json)?;
                summary.dispatched += 1;
            }
            Err(e) => {
                eprintln!("line {line_no}: {e}");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

pub(super) fn cmd_run(opts: &Options) -> Result<()> {
    let config = load_config(opts.config_path.as_deref());
    let session = Session::open(config.control_paths(), opts.dry_run);

    let summary = dispatch_lines(&session, std::io::stdin().lock(), opts.json)?;
    log::info!(
        "end of input: {} dispatched, {} rejected, {} failed",
        summary.dispatched,
        summary.rejected,
        summary.failed
    );

    if config.turn_off_on_exit {
        match session.turn_off() {
            Ok(Some(writes)) => TurnOffOutput {
                turned_off: true,
                writes,
            }
            .print(opts.json)?,
            Ok(None) => {}
            Err(e) => log::warn!("could not switch LED off: {e}"),
        }
    }
    Ok(())
}
