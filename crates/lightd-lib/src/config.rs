//! Application configuration: TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths::{ControlPaths, DEFAULT_LEDS_ROOT};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# lightd configuration. Run `lightd config` to see the effective values.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the LED class tree. Default: "/sys/class/leds".
    #[serde(default = "default_leds_root")]
    pub leds_root: String,

    /// Switch the indicator LED off when `lightd run` reaches end of input.
    #[serde(default = "default_true")]
    pub turn_off_on_exit: bool,

    /// Color used by `lightd set` when none is given (hex or name). Default: "#FFFFFFFF".
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_leds_root() -> String {
    DEFAULT_LEDS_ROOT.into()
}
fn default_color() -> String {
    "#FFFFFFFF".into()
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            leds_root: default_leds_root(),
            turn_off_on_exit: true,
            default_color: default_color(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// `leds_root` is empty or not an absolute path.
    InvalidLedsRoot(String),
    /// `default_color` could not be parsed.
    InvalidColor(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidLedsRoot(e) => write!(f, "Invalid leds_root: {e}"),
            ValidationError::InvalidColor(e) => write!(f, "Invalid default_color: {e}"),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lightd"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from disk, or return defaults if not found.
    pub fn load() -> Self {
        let (config, warnings) = Self::load_with_warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        config
    }

    /// Read `path`, falling back to defaults.
    ///
    /// A missing file is not an error and yields no warning. A file that
    /// fails to parse yields defaults plus one warning naming the file.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return (Self::default(), vec![]);
        };
        match toml::from_str(&contents) {
            Ok(config) => (config, vec![]),
            Err(e) => (
                Self::default(),
                vec![format!("ignoring {} (parse error): {e}", path.display())],
            ),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Write the config with its header comment to `path`.
    ///
    /// Staged as `*.toml.tmp` next to the target, then renamed into place.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let body = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{body}");
        let staged = path.with_extension("toml.tmp");
        std::fs::write(&staged, &contents)?;
        if std::fs::rename(&staged, path).is_ok() {
            return Ok(());
        }
        // Rename refused: write in place and drop the staged copy.
        let written = std::fs::write(path, &contents);
        let _ = std::fs::remove_file(&staged);
        written
    }

    /// Control-file layout rooted at `leds_root`.
    pub fn control_paths(&self) -> ControlPaths {
        ControlPaths::new(self.leds_root.trim())
    }

    /// Parsed `default_color`.
    pub fn default_color(&self) -> crate::error::Result<u32> {
        crate::color::parse_color(&self.default_color)
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let root = self.leds_root.trim();
        if root.is_empty() {
            errors.push(ValidationError::InvalidLedsRoot("path is empty".into()));
        } else if !Path::new(root).is_absolute() {
            errors.push(ValidationError::InvalidLedsRoot(format!(
                "{root} is not an absolute path"
            )));
        }

        if let Err(e) = self.default_color() {
            errors.push(ValidationError::InvalidColor(e.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
