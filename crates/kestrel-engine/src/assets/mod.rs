//! Asset loading helpers.
//!
//! File access in the engine is limited to text resources (shader sources).
//! Failures are logged and reported as absence; consumers decide whether a
//! missing resource is fatal.

mod loader;

pub use loader::load_text;
