// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod goal;
pub mod laps;
pub mod logging;
pub mod persist;
pub mod runtime;
pub mod session;
pub mod stopwatch;
pub mod store;
pub mod timer;
pub mod util;

pub use error::{ConfigError, LapError, PersistError, StoreError};
pub use stopwatch::{EngineEvent, EngineOptions, StopwatchEngine};
