pub mod float_ext;
pub mod log_setup;
pub mod plane2;

pub use float_ext::FloatExt;
pub use log_setup::{setup_logging, LogSettings, LogSetupError};
pub use plane2::Plane2;

pub const EPSILON: f64 = 1e-9;
