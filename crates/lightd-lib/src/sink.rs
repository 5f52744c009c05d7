//! Control-file I/O: the `HardwareSink` trait with its sysfs and recording backends.

use std::collections::HashMap;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

// ── Error type ──

/// Control-file access errors.
///
/// `reason` carries the underlying OS error text; `path` is the control file
/// that was being accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    WriteFailed { path: PathBuf, reason: String },
    ReadFailed { path: PathBuf, reason: String },
    Parse { path: PathBuf, value: String },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::WriteFailed { path, reason } => {
                write!(f, "write {}: {reason}", path.display())
            }
            SinkError::ReadFailed { path, reason } => {
                write!(f, "read {}: {reason}", path.display())
            }
            SinkError::Parse { path, value } => {
                write!(f, "parse {}: not an integer: {value:?}", path.display())
            }
        }
    }
}

impl std::error::Error for SinkError {}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Render an integer sequence the way ramp control files expect it: `0,12,25`.
pub fn format_sequence(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

// ── Sink trait ──

/// Write-mostly access to named control files.
///
/// Implementors provide raw text I/O; integer and sequence helpers are built
/// on top. Each `write_*` call must reach the file as a single write so that
/// concurrent callers never interleave bytes within one control file.
pub trait HardwareSink: Send + Sync {
    /// Write `text` to the control file at `path`.
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;

    /// Read the full contents of the control file at `path`.
    fn read_text(&self, path: &Path) -> Result<String>;

    fn write_int(&self, path: &Path, value: u32) -> Result<()> {
        self.write_text(path, &value.to_string())
    }

    fn write_sequence(&self, path: &Path, values: &[u32]) -> Result<()> {
        self.write_text(path, &format_sequence(values))
    }

    fn read_int(&self, path: &Path) -> Result<u32> {
        let text = self.read_text(path)?;
        let trimmed = text.trim();
        trimmed.parse().map_err(|_| SinkError::Parse {
            path: path.to_path_buf(),
            value: trimmed.to_string(),
        })
    }
}

impl<S: HardwareSink + ?Sized> HardwareSink for Arc<S> {
    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        (**self).write_text(path, text)
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        (**self).read_text(path)
    }
}

// ── sysfs backend ──

/// Sink backed by real files, normally under `/sys/class/leds`.
///
/// Files are opened for writing without `create`: a missing control file is
/// reported as [`SinkError::WriteFailed`] instead of silently appearing as a
/// regular file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysfsSink;

impl SysfsSink {
    pub fn new() -> Self {
        SysfsSink
    }
}

impl HardwareSink for SysfsSink {
    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        let write_failed = |e: std::io::Error| SinkError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(write_failed)?;
        file.write_all(text.as_bytes()).map_err(write_failed)
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| SinkError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

// ── Recording backend ──

/// In-memory sink that records every write in order.
///
/// Reads are answered from values registered with [`RecordingSink::with_value`].
/// Used by tests and by dry runs that print what would be written.
#[derive(Debug, Default)]
pub struct RecordingSink {
    writes: Mutex<Vec<(PathBuf, String)>>,
    readable: Mutex<HashMap<PathBuf, String>>,
    fail_writes: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a value returned by `read_text` for `path`.
    pub fn with_value(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.readable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), text.into());
        self
    }

    /// All writes so far, oldest first.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last text written to `path`, i.e. the current "hardware" value.
    pub fn last_value(&self, path: &Path) -> Option<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v.clone())
    }

    /// Final value of every path written so far.
    pub fn final_state(&self) -> HashMap<PathBuf, String> {
        let mut state = HashMap::new();
        for (path, value) in self.writes() {
            state.insert(path, value);
        }
        state
    }

    /// Drain the recorded writes, oldest first.
    pub fn take_writes(&self) -> Vec<(PathBuf, String)> {
        std::mem::take(&mut *self.writes.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn clear(&self) {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// When set, every write fails with [`SinkError::WriteFailed`] and is not recorded.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl HardwareSink for RecordingSink {
    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SinkError::WriteFailed {
                path: path.to_path_buf(),
                reason: "recording sink: write failure injected".into(),
            });
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_path_buf(), text.to_string()));
        Ok(())
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        self.readable
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| SinkError::ReadFailed {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            })
    }
}
