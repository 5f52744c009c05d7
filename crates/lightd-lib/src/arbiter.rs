//! Light arbiter: routes requests by zone and decides who owns the RGB LED.
//!
//! Battery, notification and attention requests share one physical LED. Each
//! of those zones keeps its last request; after every update the arbiter picks
//! the highest-priority lit zone (notifications, then attention, then battery)
//! and rewrites the LED from scratch. The backlight is a separate channel that
//! never takes part in arbitration.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::color;
use crate::paths::ControlPaths;
use crate::sink::{self, HardwareSink};
use crate::waveform::{self, LedProgram};
use crate::zone::{LightRequest, Zone};

/// Panel maximum assumed when `max_brightness` cannot be read.
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;

/// Zones this arbiter has handlers for.
pub const SUPPORTED_ZONES: [Zone; 4] = [
    Zone::Backlight,
    Zone::Battery,
    Zone::Notifications,
    Zone::Attention,
];

/// Result of dispatching one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    LightNotSupported,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Success => write!(f, "SUCCESS"),
            Status::LightNotSupported => write!(f, "LIGHT_NOT_SUPPORTED"),
        }
    }
}

/// Last request seen by each zone that competes for the RGB LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneStates {
    pub notifications: LightRequest,
    pub attention: LightRequest,
    pub battery: LightRequest,
}

impl ZoneStates {
    /// The zone that currently drives the LED, if any is lit.
    pub fn winner(&self) -> Option<(Zone, &LightRequest)> {
        [
            (Zone::Notifications, &self.notifications),
            (Zone::Attention, &self.attention),
            (Zone::Battery, &self.battery),
        ]
        .into_iter()
        .find(|(_, req)| req.is_lit())
    }
}

/// Owns the zone states, the hardware sink and the locks around them.
///
/// Construct once per process and share by reference (or `Arc`).
pub struct LightArbiter<S: HardwareSink> {
    sink: S,
    paths: ControlPaths,
    panel_max_brightness: u32,
    zones: Mutex<ZoneStates>,
    backlight: Mutex<()>,
}

impl<S: HardwareSink> LightArbiter<S> {
    /// Create an arbiter and read the panel's `max_brightness` once.
    ///
    /// An unreadable or unparseable capability falls back to
    /// [`DEFAULT_MAX_BRIGHTNESS`]. No control file is written here.
    pub fn new(sink: S, paths: ControlPaths) -> Self {
        let panel_max_brightness = match sink.read_int(&paths.backlight_max_brightness) {
            Ok(max) => max,
            Err(e) => {
                log::warn!("{e}; assuming max brightness {DEFAULT_MAX_BRIGHTNESS}");
                DEFAULT_MAX_BRIGHTNESS
            }
        };
        LightArbiter {
            sink,
            paths,
            panel_max_brightness,
            zones: Mutex::new(ZoneStates::default()),
            backlight: Mutex::new(()),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn paths(&self) -> &ControlPaths {
        &self.paths
    }

    pub fn panel_max_brightness(&self) -> u32 {
        self.panel_max_brightness
    }

    pub fn supported_zones(&self) -> &'static [Zone] {
        &SUPPORTED_ZONES
    }

    /// Copy of the stored zone states.
    pub fn zone_states(&self) -> ZoneStates {
        *self.lock_zones()
    }

    /// Dispatch a request.
    ///
    /// Write failures are logged and otherwise ignored: the zone state is
    /// still updated and the status is [`Status::Success`]. Use [`apply`]
    /// to observe them.
    ///
    /// [`apply`]: LightArbiter::apply
    pub fn set_light(&self, zone: Zone, request: &LightRequest) -> Status {
        match self.apply(zone, request) {
            Ok(status) => status,
            Err(e) => {
                log::warn!("{zone} light update incomplete: {e}");
                Status::Success
            }
        }
    }

    /// Dispatch a request, surfacing the first control-file failure.
    ///
    /// Unsupported zones return `Ok(Status::LightNotSupported)` without
    /// touching any state or file.
    pub fn apply(&self, zone: Zone, request: &LightRequest) -> sink::Result<Status> {
        match zone {
            Zone::Backlight => self.set_backlight(request)?,
            Zone::Battery => self.set_battery(request)?,
            Zone::Notifications => self.set_notification(request)?,
            Zone::Attention => self.set_attention(request)?,
            Zone::Keyboard
            | Zone::Buttons
            | Zone::Bluetooth
            | Zone::Wifi
            | Zone::Unknown(_) => return Ok(Status::LightNotSupported),
        }
        Ok(Status::Success)
    }

    // ── Handlers ──

    /// Write the luma of `request.color`, rescaled to the panel range.
    pub fn set_backlight(&self, request: &LightRequest) -> sink::Result<()> {
        let _guard = self.backlight.lock().unwrap_or_else(PoisonError::into_inner);

        let brightness = color::luma(request.color);
        let scaled = color::scale_to_panel(brightness, self.panel_max_brightness);
        if scaled != brightness {
            log::trace!("scaling brightness {brightness} => {scaled}");
        }
        self.sink.write_int(&self.paths.backlight_brightness, scaled)
    }

    pub fn set_battery(&self, request: &LightRequest) -> sink::Result<()> {
        self.update_zone(|zones| zones.battery = *request)
    }

    pub fn set_attention(&self, request: &LightRequest) -> sink::Result<()> {
        self.update_zone(|zones| zones.attention = *request)
    }

    /// Store the request with its alpha applied as a brightness scale.
    pub fn set_notification(&self, request: &LightRequest) -> sink::Result<()> {
        let scaled = LightRequest {
            color: color::apply_alpha_brightness(request.color),
            ..*request
        };
        self.update_zone(|zones| zones.notifications = scaled)
    }

    /// Reset every RGB zone to off and switch the LED off.
    pub fn turn_off(&self) -> sink::Result<()> {
        self.update_zone(|zones| *zones = ZoneStates::default())
    }

    // ── Arbitration ──

    fn lock_zones(&self) -> MutexGuard<'_, ZoneStates> {
        // Every render rewrites the whole LED, so state behind a poisoned lock is still usable.
        self.zones.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the zone states and re-render, all under the zone lock.
    fn update_zone(&self, mutate: impl FnOnce(&mut ZoneStates)) -> sink::Result<()> {
        let mut zones = self.lock_zones();
        mutate(&mut zones);
        self.render_locked(&zones)
    }

    fn render_locked(&self, zones: &ZoneStates) -> sink::Result<()> {
        match zones.winner() {
            Some((zone, request)) => {
                let program = LedProgram::from_request(request);
                log::debug!("{zone} drives the LED: {program:?}");
                waveform::render_program(&self.sink, &self.paths, &program)
            }
            None => {
                log::debug!("no zone lit, LED off");
                waveform::render_off(&self.sink, &self.paths)
            }
        }
    }
}
