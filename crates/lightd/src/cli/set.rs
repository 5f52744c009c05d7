//! `set` subcommand: dispatch a single light request.

use super::{Options, Result, Session, Zone, build_request, color, load_config};

pub(super) fn cmd_set(
    zone: Zone,
    color_arg: Option<&str>,
    on_ms: Option<u32>,
    off_ms: Option<u32>,
    opts: &Options,
) -> Result<()> {
    let config = load_config(opts.config_path.as_deref());
    let color = match color_arg {
        Some(text) => color::parse_color(text)?,
        None => config.default_color()?,
    };
    let request = build_request(color, on_ms, off_ms);
    log::debug!(
        "{zone}: {} {:?} on={} off={}",
        color::format_color(request.color),
        request.flash_mode,
        request.flash_on_ms,
        request.flash_off_ms
    );

    let session = Session::open(config.control_paths(), opts.dry_run);
    session.dispatch(zone, &request)?.print(opts.json)
}
