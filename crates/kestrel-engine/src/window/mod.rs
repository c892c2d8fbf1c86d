//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and
//! drives the scene machine once per display refresh. This is the root of
//! the engine: everything else is either fed by it (input, clock) or driven
//! by it (scenes).

mod config;
mod error;
mod runtime;

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use runtime::Runtime;
