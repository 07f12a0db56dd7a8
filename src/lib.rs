pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod grid;
pub mod groups;
pub mod logging;
pub mod protocol;
pub mod rng;
pub mod types;

pub use config::GameConfig;
pub use engine::GameEngine;
pub use error::{ConfigError, EngineError};
pub use types::{Cell, ClickOutcome, SessionStatus, Snapshot};
