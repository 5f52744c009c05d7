//! lightd: priority arbitration and blink encoding for sysfs indicator LEDs.

pub mod arbiter;
pub mod color;
pub mod config;
pub mod error;
pub mod paths;
pub mod sink;
pub mod waveform;
pub mod zone;

pub use arbiter::{LightArbiter, Status};
pub use error::LightdError;
pub use zone::{FlashMode, LightRequest, Zone};
