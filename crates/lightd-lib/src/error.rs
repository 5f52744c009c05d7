//! Unified error type for the lightd-lib crate.
//!
//! [`LightdError`] wraps hardware sink failures ([`SinkError`]) and I/O errors,
//! plus string-carrying kinds for configuration, color and zone parsing.
//! `From` impls let `?` propagate across module boundaries.

use std::fmt;

use crate::sink::SinkError;

/// Unified error type for lightd-lib operations.
#[derive(Debug)]
pub enum LightdError {
    /// Control file read or write failed.
    Sink(SinkError),
    /// Standard I/O error (config persistence).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// Zone name or id could not be parsed.
    Zone(String),
}

impl fmt::Display for LightdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightdError::Sink(e) => write!(f, "{e}"),
            LightdError::Io(e) => write!(f, "I/O error: {e}"),
            LightdError::Config(e) => write!(f, "Config error: {e}"),
            LightdError::Color(e) => write!(f, "Color error: {e}"),
            LightdError::Zone(e) => write!(f, "Zone error: {e}"),
        }
    }
}

impl std::error::Error for LightdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LightdError::Sink(e) => Some(e),
            LightdError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SinkError> for LightdError {
    fn from(e: SinkError) -> Self {
        LightdError::Sink(e)
    }
}

impl From<std::io::Error> for LightdError {
    fn from(e: std::io::Error) -> Self {
        LightdError::Io(e)
    }
}

/// Crate-level Result alias using [`LightdError`].
pub type Result<T> = std::result::Result<T, LightdError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_failed() -> SinkError {
        SinkError::WriteFailed {
            path: PathBuf::from("/sys/class/leds/red/brightness"),
            reason: "Permission denied".into(),
        }
    }

    #[test]
    fn from_sink_error() {
        let e: LightdError = write_failed().into();
        assert!(matches!(e, LightdError::Sink(SinkError::WriteFailed { .. })));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: LightdError = io_err.into();
        assert!(matches!(e, LightdError::Io(_)));
    }

    #[test]
    fn display_sink_error_passes_through() {
        let e = LightdError::Sink(write_failed());
        assert_eq!(
            e.to_string(),
            "write /sys/class/leds/red/brightness: Permission denied"
        );
    }

    #[test]
    fn display_string_variants() {
        assert_eq!(
            LightdError::Config("bad root".into()).to_string(),
            "Config error: bad root"
        );
        assert_eq!(
            LightdError::Color("bad hex".into()).to_string(),
            "Color error: bad hex"
        );
        assert_eq!(
            LightdError::Zone("lamp".into()).to_string(),
            "Zone error: lamp"
        );
    }

    #[test]
    fn source_chains_sink_error() {
        let e = LightdError::Sink(write_failed());
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("Permission denied"));
    }

    #[test]
    fn source_none_for_string_variants() {
        let e = LightdError::Color("test".into());
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_sink_to_lightd() {
        fn inner() -> crate::sink::Result<()> {
            Err(write_failed())
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        let err = outer().unwrap_err();
        assert!(matches!(err, LightdError::Sink(_)));
    }
}
