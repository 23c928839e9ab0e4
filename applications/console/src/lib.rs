//! Sona Console
//!
//! Runs the playback orchestrator against stdin/stdout. Commands typed at the
//! prompt are routed to a single community's session; voice playback is
//! simulated by draining each audio stream at a configurable speed.

pub mod config;
pub mod console;
pub mod error;
pub mod simulated;

pub use config::SonaConfig;
pub use error::{ConsoleError, Result};
