//! Integration tests for the `lightd` binary.
//!
//! Commands that touch control files run against a scratch LED tree in a
//! temp directory, selected through a temp config file.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("lightd")
}

const CHANNEL_FILES: [&str; 7] = [
    "brightness",
    "duty_pcts",
    "start_idx",
    "pause_lo",
    "pause_hi",
    "ramp_step_ms",
    "blink",
];

/// Scratch LED tree plus a config file pointing at it.
struct Fixture {
    dir: tempfile::TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config("")
    }

    fn with_config(extra: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("leds");
        for channel in ["red", "green", "blue"] {
            fs::create_dir_all(root.join(channel)).unwrap();
            for file in CHANNEL_FILES {
                fs::write(root.join(channel).join(file), "0").unwrap();
            }
        }
        fs::create_dir_all(root.join("rgb")).unwrap();
        fs::write(root.join("rgb/rgb_blink"), "0").unwrap();
        fs::create_dir_all(root.join("lcd-backlight")).unwrap();
        fs::write(root.join("lcd-backlight/brightness"), "0").unwrap();
        fs::write(root.join("lcd-backlight/max_brightness"), "255\n").unwrap();

        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!("leds_root = {:?}\n{extra}", root.display().to_string()),
        )
        .unwrap();
        Fixture { dir, config }
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("leds")
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).unwrap()
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cli();
        cmd.arg("--config").arg(&self.config);
        cmd
    }
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect()
}

// ── Basics ──

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lightd"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_verbose_flag_accepted() {
    cli().args(["-v", "zones"]).assert().success();
    cli().args(["--verbose", "zones"]).assert().success();
}

#[test]
fn cli_unknown_subcommand_fails() {
    cli().arg("blink-everything").assert().failure();
}

// ── zones ──

#[test]
fn zones_lists_supported_zones() {
    cli()
        .arg("zones")
        .assert()
        .success()
        .stdout(predicate::str::contains("backlight"))
        .stdout(predicate::str::contains("attention"))
        .stdout(predicate::str::contains("wifi").not());
}

#[test]
fn zones_json_has_ids() {
    let output = cli().args(["--json", "zones"]).assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["count"], 4);
    let ids: Vec<u64> = json["zones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![0, 3, 4, 5]);
}

// ── set ──

#[test]
fn set_battery_writes_steady_color() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["set", "battery", "#00FF80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("battery: SUCCESS"));
    assert_eq!(fx.read("red/brightness"), "0");
    assert_eq!(fx.read("green/brightness"), "255");
    assert_eq!(fx.read("blue/brightness"), "128");
    assert_eq!(fx.read("rgb/rgb_blink"), "0");
}

#[test]
fn set_with_flash_times_programs_blink() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["set", "notifications", "#80FF0000", "--on-ms", "400", "--off-ms", "600"])
        .assert()
        .success();
    assert_eq!(fx.read("red/duty_pcts"), "0,6,12,18,25,36,42,50");
    assert_eq!(fx.read("red/ramp_step_ms"), "25");
    assert_eq!(fx.read("red/pause_lo"), "600");
    assert_eq!(fx.read("blue/start_idx"), "16");
    assert_eq!(fx.read("rgb/rgb_blink"), "1");
}

#[test]
fn set_without_color_uses_config_default() {
    let fx = Fixture::with_config("default_color = \"blue\"\n");
    fx.cmd().args(["set", "attention"]).assert().success();
    assert_eq!(fx.read("blue/brightness"), "255");
    assert_eq!(fx.read("red/brightness"), "0");
}

#[test]
fn set_backlight_uses_luma() {
    let fx = Fixture::new();
    fx.cmd().args(["set", "backlight", "#C8C8C8"]).assert().success();
    assert_eq!(fx.read("lcd-backlight/brightness"), "200");
}

#[test]
fn set_unsupported_zone_reports_status_and_succeeds() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--json", "set", "wifi", "red"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LIGHT_NOT_SUPPORTED"));
    assert_eq!(fx.read("red/brightness"), "0");
}

#[test]
fn set_rejects_unknown_zone_name() {
    cli()
        .args(["set", "disco", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid zone"));
}

#[test]
fn set_rejects_bad_color() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["set", "battery", "mauve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn set_fails_when_control_files_are_missing() {
    let fx = Fixture::new();
    fs::remove_file(fx.root().join("rgb/rgb_blink")).unwrap();
    fx.cmd()
        .args(["set", "battery", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rgb_blink"));
}

#[test]
fn dry_run_prints_writes_and_touches_nothing() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["--dry-run", "set", "battery", "red"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rgb_blink = 0"))
        .stdout(predicate::str::contains("brightness = 255"));
    assert_eq!(fx.read("red/brightness"), "0");
}

// ── run ──

#[test]
fn run_dispatches_each_line_and_turns_off_at_end() {
    let fx = Fixture::new();
    let input = concat!(
        "{\"zone\":\"battery\",\"color\":\"green\"}\n",
        "not json\n",
        "{\"zone\":\"attention\",\"color\":\"red\"}\n",
        "{\"zone\":7,\"color\":\"red\"}\n",
    );
    let output = fx
        .cmd()
        .args(["--json", "run"])
        .write_stdin(input)
        .assert()
        .success()
        .stderr(predicate::str::contains("line 2:"))
        .get_output()
        .stdout
        .clone();

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["status"], "SUCCESS");
    assert_eq!(lines[1]["zone"], "attention");
    assert_eq!(lines[2]["status"], "LIGHT_NOT_SUPPORTED");

    // turn_off_on_exit defaults to true.
    for channel in ["red", "green", "blue"] {
        assert_eq!(fx.read(&format!("{channel}/brightness")), "0");
        assert_eq!(fx.read(&format!("{channel}/blink")), "0");
    }
}

#[test]
fn run_keeps_led_on_when_configured() {
    let fx = Fixture::with_config("turn_off_on_exit = false\n");
    fx.cmd()
        .arg("run")
        .write_stdin("{\"zone\":\"battery\",\"color\":\"green\"}\n{\"zone\":\"attention\",\"color\":\"red\"}\n{\"zone\":\"attention\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("attention: SUCCESS"));
    // Attention cleared, battery shows through.
    assert_eq!(fx.read("green/brightness"), "255");
    assert_eq!(fx.read("red/brightness"), "0");
}

#[test]
fn dry_run_json_run_reports_turn_off_writes() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["--dry-run", "--json", "run"])
        .write_stdin("{\"zone\":\"battery\",\"color\":\"green\"}\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["writes"].as_array().unwrap().len(), 4);
    assert_eq!(lines[0]["request"]["color"], 0xFF00_FF00u32);
    assert_eq!(lines[1]["turned_off"], true);
    let off_writes = lines[1]["writes"].as_array().unwrap();
    assert_eq!(off_writes.len(), 6);
    assert!(off_writes.iter().all(|w| w["value"] == "0"));

    // Nothing reached the tree.
    assert_eq!(fx.read("green/brightness"), "0");
}

#[test]
fn run_with_empty_input_succeeds() {
    let fx = Fixture::new();
    fx.cmd().arg("run").write_stdin("").assert().success();
}

// ── status ──

#[test]
fn status_json_reports_tree() {
    let fx = Fixture::new();
    fs::write(fx.root().join("lcd-backlight/max_brightness"), "4095\n").unwrap();
    let output = fx
        .cmd()
        .args(["--json", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["panel_max_brightness"], 4095);
    assert_eq!(json["files"].as_array().unwrap().len(), 24);
    assert!(
        json["files"]
            .as_array()
            .unwrap()
            .iter()
            .all(|f| f["present"] == true)
    );
}

#[test]
fn status_lists_missing_files() {
    let fx = Fixture::new();
    fs::remove_file(fx.root().join("green/pause_hi")).unwrap();
    fx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("23/24 present"))
        .stdout(predicate::str::contains("green/pause_hi"));
}

// ── config ──

#[test]
fn config_json_produces_valid_json() {
    let fx = Fixture::new();
    let output = fx
        .cmd()
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(json["settings"].is_object());
    assert_eq!(json["config_file_exists"], true);
    assert_eq!(json["settings"]["turn_off_on_exit"], true);
    assert!(json["validation_errors"].as_array().unwrap().is_empty());
}

#[test]
fn config_init_writes_defaults_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    cli()
        .arg("--config")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("leds_root"));

    // A second run leaves the file alone.
    fs::write(&path, "default_color = \"red\"\n").unwrap();
    cli()
        .arg("--config")
        .arg(&path)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("red -> #FFFF0000"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "default_color = \"red\"\n");
}

#[test]
fn config_reports_validation_problems() {
    let dir = tempfile::tempdir().unwrap();
    let path: &Path = &dir.path().join("config.toml");
    fs::write(path, "leds_root = \"relative\"\n").unwrap();
    cli()
        .arg("--config")
        .arg(path)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid leds_root"));
}
