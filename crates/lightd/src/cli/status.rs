//! `status` subcommand: show LED root, panel capability and control files.

use std::path::Path;

use lightd_lib::arbiter::DEFAULT_MAX_BRIGHTNESS;
use lightd_lib::sink::{HardwareSink, SysfsSink};

use super::{
    FileStatusJson, Result, StatusOutput, kv, kv_indent, kv_width, load_config, print_json_pretty,
};

pub(super) fn cmd_status(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = load_config(custom_path);
    let paths = config.control_paths();
    let panel_max = SysfsSink::new()
        .read_int(&paths.backlight_max_brightness)
        .ok();

    let files: Vec<FileStatusJson> = paths
        .all()
        .into_iter()
        .map(|p| FileStatusJson {
            path: p.display().to_string(),
            present: p.exists(),
        })
        .collect();

    if json {
        let output = StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            leds_root: paths.root.display().to_string(),
            panel_max_brightness: panel_max,
            files,
        };
        return print_json_pretty(&output);
    }

    let present = files.iter().filter(|f| f.present).count();
    let w = kv_width(&["Version:", "LED root:", "Panel max:", "Files:"], &[]);
    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    kv("LED root:", paths.root.display(), w);
    match panel_max {
        Some(max) => kv("Panel max:", max, w),
        None => kv(
            "Panel max:",
            format_args!("unreadable (using {DEFAULT_MAX_BRIGHTNESS})"),
            w,
        ),
    }
    kv("Files:", format_args!("{present}/{} present", files.len()), w);

    let missing: Vec<_> = files.iter().filter(|f| !f.present).collect();
    if !missing.is_empty() {
        let iw = kv_width(&[], &["missing"]);
        for f in missing {
            kv_indent("missing", &f.path, iw);
        }
    }
    Ok(())
}
