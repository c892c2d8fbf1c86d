//! Render-resource capability.
//!
//! The loop itself issues no draw calls; it hands scenes a [`RenderCtx`]
//! (device/queue/format handles) and a [`RenderTarget`] (the frame being
//! recorded). Scenes own render resources: GPU programs compiled once and
//! drawn every frame, of which [`ShaderQuad`] is the concrete one shipped
//! here. Compilation failures surface as [`CompilationError`]; an
//! uncompiled resource draws as a no-op.

mod ctx;
mod error;
mod quad;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::{CompilationError, ShaderStage};
pub use quad::ShaderQuad;
