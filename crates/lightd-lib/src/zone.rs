//! Light zones and the request type delivered for each of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color;

/// Logical light zone, as numbered by the platform's light service.
///
/// Only [`Zone::Backlight`], [`Zone::Battery`], [`Zone::Notifications`] and
/// [`Zone::Attention`] have handlers; every other zone is reported as not
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Backlight,
    Keyboard,
    Buttons,
    Battery,
    Notifications,
    Attention,
    Bluetooth,
    Wifi,
    /// Raw id outside the platform's known range.
    Unknown(u32),
}

impl Zone {
    /// Platform id of the zone.
    pub fn id(self) -> u32 {
        match self {
            Zone::Backlight => 0,
            Zone::Keyboard => 1,
            Zone::Buttons => 2,
            Zone::Battery => 3,
            Zone::Notifications => 4,
            Zone::Attention => 5,
            Zone::Bluetooth => 6,
            Zone::Wifi => 7,
            Zone::Unknown(id) => id,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Zone::Backlight => "backlight",
            Zone::Keyboard => "keyboard",
            Zone::Buttons => "buttons",
            Zone::Battery => "battery",
            Zone::Notifications => "notifications",
            Zone::Attention => "attention",
            Zone::Bluetooth => "bluetooth",
            Zone::Wifi => "wifi",
            Zone::Unknown(_) => "unknown",
        }
    }
}

impl From<u32> for Zone {
    fn from(id: u32) -> Self {
        match id {
            0 => Zone::Backlight,
            1 => Zone::Keyboard,
            2 => Zone::Buttons,
            3 => Zone::Battery,
            4 => Zone::Notifications,
            5 => Zone::Attention,
            6 => Zone::Bluetooth,
            7 => Zone::Wifi,
            other => Zone::Unknown(other),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Unknown(id) => write!(f, "unknown({id})"),
            zone => f.write_str(zone.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = crate::LightdError;

    /// Accepts a zone name (case-insensitive, `notification` also allowed) or a numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Ok(Zone::from(id));
        }
        match s.to_lowercase().as_str() {
            "backlight" => Ok(Zone::Backlight),
            "keyboard" => Ok(Zone::Keyboard),
            "buttons" => Ok(Zone::Buttons),
            "battery" => Ok(Zone::Battery),
            "notifications" | "notification" => Ok(Zone::Notifications),
            "attention" => Ok(Zone::Attention),
            "bluetooth" => Ok(Zone::Bluetooth),
            "wifi" => Ok(Zone::Wifi),
            _ => Err(crate::LightdError::Zone(format!(
                "Invalid zone: {s} (use a zone name or numeric id)"
            ))),
        }
    }
}

/// How a request wants the light to flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Steady light.
    #[default]
    None,
    /// Blink with the request's on/off times.
    Timed,
    /// Hardware-defined flashing; rendered as steady.
    Hardware,
}

/// One light request for one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LightRequest {
    /// `0xAARRGGBB`. Alpha is a brightness scale for the notification zone only.
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: u32,
    pub flash_off_ms: u32,
}

impl LightRequest {
    /// The "off" request every zone starts with.
    pub const OFF: LightRequest = LightRequest {
        color: 0,
        flash_mode: FlashMode::None,
        flash_on_ms: 0,
        flash_off_ms: 0,
    };

    pub fn steady(color: u32) -> Self {
        LightRequest {
            color,
            ..Self::OFF
        }
    }

    pub fn timed(color: u32, on_ms: u32, off_ms: u32) -> Self {
        LightRequest {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
        }
    }

    /// Whether the request lights the LED at all (non-zero RGB, alpha ignored).
    pub fn is_lit(&self) -> bool {
        color::is_lit(self.color)
    }
}
