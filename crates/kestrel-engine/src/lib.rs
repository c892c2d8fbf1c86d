//! Kestrel engine crate.
//!
//! A minimal real-time runtime for interactive graphics programs: one window
//! and GPU surface, double-buffered input, a frame clock, and a scene
//! lifecycle machine driven once per display refresh.

pub mod assets;
pub mod device;
pub mod input;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;

pub mod logging;
