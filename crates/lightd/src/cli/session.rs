//! Arbiter over the real LED tree, or over a recording sink for `--dry-run`.

use std::sync::Arc;

use lightd_lib::LightArbiter;
use lightd_lib::paths::ControlPaths;
use lightd_lib::sink::{HardwareSink, RecordingSink, SysfsSink};

use super::{DispatchOutput, LightRequest, Result, WriteJson, Zone};

pub(crate) struct Session {
    arbiter: LightArbiter<Arc<dyn HardwareSink>>,
    recorder: Option<Arc<RecordingSink>>,
}

impl Session {
    pub fn open(paths: ControlPaths, dry_run: bool) -> Self {
        if !dry_run {
            let sink: Arc<dyn HardwareSink> = Arc::new(SysfsSink::new());
            return Session {
                arbiter: LightArbiter::new(sink, paths),
                recorder: None,
            };
        }

        // The capability read still comes from the real tree when it exists.
        let mut recorder = RecordingSink::new();
        if let Ok(max) = SysfsSink::new().read_text(&paths.backlight_max_brightness) {
            recorder = recorder.with_value(paths.backlight_max_brightness.clone(), max);
        }
        let recorder = Arc::new(recorder);
        let sink: Arc<dyn HardwareSink> = recorder.clone();
        Session {
            arbiter: LightArbiter::new(sink, paths),
            recorder: Some(recorder),
        }
    }

    #[cfg(test)]
    pub fn arbiter(&self) -> &LightArbiter<Arc<dyn HardwareSink>> {
        &self.arbiter
    }

    /// Dispatch one request, collecting the writes a dry run recorded for it.
    pub fn dispatch(&self, zone: Zone, request: &LightRequest) -> Result<DispatchOutput> {
        let status = self.arbiter.apply(zone, request);
        // Drain even on failure so the next request starts clean.
        let writes = self.take_writes();
        Ok(DispatchOutput {
            zone: zone.to_string(),
            zone_id: zone.id(),
            request: *request,
            status: status?,
            writes,
        })
    }

    /// Switch the RGB LED off, returning any writes a dry run recorded.
    pub fn turn_off(&self) -> Result<Option<Vec<WriteJson>>> {
        let result = self.arbiter.turn_off();
        let writes = self.take_writes();
        result?;
        Ok(writes)
    }

    fn take_writes(&self) -> Option<Vec<WriteJson>> {
        self.recorder.as_ref().map(|r| {
            r.take_writes()
                .into_iter()
                .map(|(path, value)| WriteJson {
                    path: path.display().to_string(),
                    value,
                })
                .collect()
        })
    }
}
