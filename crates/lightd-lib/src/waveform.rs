//! Waveform encoder: turns a winning request into LED control-file writes.
//!
//! A steady request is three brightness writes. A blinking request becomes a
//! ramp program: each channel gets an 8-step duty-cycle ramp in its own slice
//! of the shared ramp table, plus pause and step timings, and the shared
//! `rgb_blink` switch starts all three channels together.

use rgb::RGB8;

use crate::color;
use crate::paths::{Channel, ControlPaths};
use crate::sink::{HardwareSink, Result};
use crate::zone::{FlashMode, LightRequest};

/// Steps per ramp, and slots each channel owns in the ramp table.
pub const RAMP_SIZE: usize = 8;

/// Nominal duration of one ramp step, in ms.
pub const RAMP_STEP_DURATION_MS: u32 = 50;

/// Perceptual brightness ramp, in percent.
pub const BRIGHTNESS_RAMP: [u32; RAMP_SIZE] = [0, 12, 25, 37, 50, 72, 85, 100];

/// Time for one ramp up plus one ramp down at the nominal step duration.
const FULL_RAMP_MS: u32 = RAMP_STEP_DURATION_MS * RAMP_SIZE as u32 * 2;

/// Duty-cycle ramp for one channel, scaled to the channel's brightness byte.
pub fn scaled_duty_pcts(level: u8) -> [u32; RAMP_SIZE] {
    BRIGHTNESS_RAMP.map(|pct| pct * u32::from(level) / color::MAX_CHANNEL)
}

/// First ramp-table slot owned by `channel` (red 0, green 8, blue 16).
pub fn start_index(channel: Channel) -> u32 {
    (channel.ordinal() * RAMP_SIZE) as u32
}

fn channel_level(rgb: RGB8, channel: Channel) -> u8 {
    match channel {
        Channel::Red => rgb.r,
        Channel::Green => rgb.g,
        Channel::Blue => rgb.b,
    }
}

/// Timing shared by all three channels of a blink program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkTiming {
    pub step_ms: u32,
    pub pause_hi_ms: u32,
    pub pause_lo_ms: u32,
}

impl BlinkTiming {
    /// Fit a ramp up and down into `on_ms`.
    ///
    /// Returns `None` unless both times are non-zero. With at least 800 ms on,
    /// steps stay at 50 ms and the remainder becomes the high pause; shorter on
    /// times shrink the step to `on_ms / 16` with no high pause.
    pub fn for_flash(on_ms: u32, off_ms: u32) -> Option<Self> {
        if on_ms == 0 || off_ms == 0 {
            return None;
        }
        let (step_ms, pause_hi_ms) = if on_ms < FULL_RAMP_MS {
            (on_ms / (RAMP_SIZE as u32 * 2), 0)
        } else {
            (RAMP_STEP_DURATION_MS, on_ms - FULL_RAMP_MS)
        };
        Some(BlinkTiming {
            step_ms,
            pause_hi_ms,
            pause_lo_ms: off_ms,
        })
    }
}

/// What the indicator LED should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedProgram {
    Steady(RGB8),
    Blink { color: RGB8, timing: BlinkTiming },
}

impl LedProgram {
    pub fn from_request(request: &LightRequest) -> Self {
        let rgb = color::rgb_of(request.color);
        let timing = match request.flash_mode {
            FlashMode::Timed => BlinkTiming::for_flash(request.flash_on_ms, request.flash_off_ms),
            FlashMode::None | FlashMode::Hardware => None,
        };
        match timing {
            Some(timing) => LedProgram::Blink { color: rgb, timing },
            None => LedProgram::Steady(rgb),
        }
    }
}

/// Write `program` to the LED.
///
/// The shared blink switch is always cleared first so a stale ramp program
/// never keeps running under new parameters. Stops at the first failed write.
pub fn render_program(
    sink: &impl HardwareSink,
    paths: &ControlPaths,
    program: &LedProgram,
) -> Result<()> {
    sink.write_int(&paths.rgb_blink, 0)?;

    match *program {
        LedProgram::Steady(rgb) => {
            for ch in Channel::ALL {
                sink.write_int(&paths.channel(ch).brightness, u32::from(channel_level(rgb, ch)))?;
            }
        }
        LedProgram::Blink { color, timing } => {
            for ch in Channel::ALL {
                let files = paths.channel(ch);
                sink.write_int(&files.start_idx, start_index(ch))?;
                sink.write_sequence(&files.duty_pcts, &scaled_duty_pcts(channel_level(color, ch)))?;
                sink.write_int(&files.pause_lo, timing.pause_lo_ms)?;
                sink.write_int(&files.pause_hi, timing.pause_hi_ms)?;
                sink.write_int(&files.ramp_step_ms, timing.step_ms)?;
            }
            sink.write_int(&paths.rgb_blink, 1)?;
        }
    }
    Ok(())
}

/// Switch the LED off: zero brightness, then per-channel blink disabled.
pub fn render_off(sink: &impl HardwareSink, paths: &ControlPaths) -> Result<()> {
    for ch in Channel::ALL {
        sink.write_int(&paths.channel(ch).brightness, 0)?;
    }
    for ch in Channel::ALL {
        sink.write_int(&paths.channel(ch).blink, 0)?;
    }
    Ok(())
}
