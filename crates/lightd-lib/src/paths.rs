//! Control-file layout of the LED class tree.
//!
//! The layout is fixed: one backlight device, one red/green/blue triplet with
//! ramp-generator attributes, and one shared `rgb` device whose `rgb_blink`
//! attribute starts all three ramp programs together. Only the root directory
//! varies (real sysfs, or a scratch tree in tests).

use std::path::{Path, PathBuf};

/// Default LED class root.
pub const DEFAULT_LEDS_ROOT: &str = "/sys/class/leds";

// ── Device directory names ──

pub const BACKLIGHT_DIR: &str = "lcd-backlight";
pub const RED_DIR: &str = "red";
pub const GREEN_DIR: &str = "green";
pub const BLUE_DIR: &str = "blue";
pub const RGB_DIR: &str = "rgb";

// ── Attribute file names ──

pub const BRIGHTNESS: &str = "brightness";
/// Read-only; read once at startup.
pub const MAX_BRIGHTNESS: &str = "max_brightness";
/// Comma-separated duty-cycle percentages for one ramp.
pub const DUTY_PCTS: &str = "duty_pcts";
/// First slot of this channel's segment in the shared ramp table.
pub const START_IDX: &str = "start_idx";
/// Hold time at the bottom of the ramp, in ms.
pub const PAUSE_LO: &str = "pause_lo";
/// Hold time at the top of the ramp, in ms.
pub const PAUSE_HI: &str = "pause_hi";
pub const RAMP_STEP_MS: &str = "ramp_step_ms";
/// Per-channel blink enable.
pub const BLINK: &str = "blink";
/// Tri-channel blink enable on the `rgb` device.
pub const RGB_BLINK: &str = "rgb_blink";

/// One color channel of the indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Render order used for every multi-channel write sequence.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn dir_name(self) -> &'static str {
        match self {
            Channel::Red => RED_DIR,
            Channel::Green => GREEN_DIR,
            Channel::Blue => BLUE_DIR,
        }
    }

    /// Position of the channel in [`Channel::ALL`].
    pub fn ordinal(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Control files of one color channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPaths {
    pub brightness: PathBuf,
    pub duty_pcts: PathBuf,
    pub start_idx: PathBuf,
    pub pause_lo: PathBuf,
    pub pause_hi: PathBuf,
    pub ramp_step_ms: PathBuf,
    pub blink: PathBuf,
}

impl ChannelPaths {
    fn new(dir: &Path) -> Self {
        ChannelPaths {
            brightness: dir.join(BRIGHTNESS),
            duty_pcts: dir.join(DUTY_PCTS),
            start_idx: dir.join(START_IDX),
            pause_lo: dir.join(PAUSE_LO),
            pause_hi: dir.join(PAUSE_HI),
            ramp_step_ms: dir.join(RAMP_STEP_MS),
            blink: dir.join(BLINK),
        }
    }

    /// Every file of the channel, in declaration order.
    pub fn all(&self) -> [&Path; 7] {
        [
            self.brightness.as_path(),
            self.duty_pcts.as_path(),
            self.start_idx.as_path(),
            self.pause_lo.as_path(),
            self.pause_hi.as_path(),
            self.ramp_step_ms.as_path(),
            self.blink.as_path(),
        ]
    }
}

/// Every control file the arbiter touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPaths {
    pub root: PathBuf,
    pub backlight_brightness: PathBuf,
    pub backlight_max_brightness: PathBuf,
    pub red: ChannelPaths,
    pub green: ChannelPaths,
    pub blue: ChannelPaths,
    pub rgb_blink: PathBuf,
}

impl ControlPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let backlight = root.join(BACKLIGHT_DIR);
        ControlPaths {
            root: root.to_path_buf(),
            backlight_brightness: backlight.join(BRIGHTNESS),
            backlight_max_brightness: backlight.join(MAX_BRIGHTNESS),
            red: ChannelPaths::new(&root.join(RED_DIR)),
            green: ChannelPaths::new(&root.join(GREEN_DIR)),
            blue: ChannelPaths::new(&root.join(BLUE_DIR)),
            rgb_blink: root.join(RGB_DIR).join(RGB_BLINK),
        }
    }

    pub fn channel(&self, channel: Channel) -> &ChannelPaths {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Every control file, backlight first, then red/green/blue, then `rgb_blink`.
    pub fn all(&self) -> Vec<&Path> {
        let mut files = vec![
            self.backlight_max_brightness.as_path(),
            self.backlight_brightness.as_path(),
        ];
        for ch in Channel::ALL {
            files.extend(self.channel(ch).all());
        }
        files.push(&self.rgb_blink);
        files
    }
}

impl Default for ControlPaths {
    fn default() -> Self {
        Self::new(DEFAULT_LEDS_ROOT)
    }
}
