//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade.
//! The engine itself only emits through `log`; the backend is wired up here.

mod init;

pub use init::init_logging;
