//! `config` subcommand: show current configuration and file path.

use std::path::Path;

use super::{Config, ConfigOutput, Result, color, kv, kv_indent, kv_width, print_json_pretty};

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>, init: bool) -> Result<()> {
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);

    if init {
        let Some(path) = &config_path else {
            return Err(lightd_lib::LightdError::Config(
                "no config directory on this platform; pass --config".into(),
            ));
        };
        if path.exists() {
            log::info!("{} already exists, leaving it untouched", path.display());
        } else {
            Config::default().save_to(path)?;
            if !json {
                println!("Wrote {}", path.display());
            }
        }
    }

    let config = super::load_config(custom_path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let validation_errors: Vec<String> = config
        .validate()
        .err()
        .unwrap_or_default()
        .iter()
        .map(|e| e.to_string())
        .collect();

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            validation_errors,
        };
        return print_json_pretty(&output);
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &["leds_root:", "turn_off_on_exit:", "default_color:"],
    );

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("leds_root:", &config.leds_root, w);
    kv_indent("turn_off_on_exit:", config.turn_off_on_exit, w);
    let color_display = match config.default_color() {
        Ok(val) => format!("{} -> {}", config.default_color, color::format_color(val)),
        Err(_) => format!("{} (invalid)", config.default_color),
    };
    kv_indent("default_color:", &color_display, w);

    if !validation_errors.is_empty() {
        println!();
        println!("Problems:");
        for e in &validation_errors {
            println!("  {e}");
        }
    }
    Ok(())
}
