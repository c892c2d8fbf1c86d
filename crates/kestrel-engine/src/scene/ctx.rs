use crate::input::InputState;
use crate::render::RenderCtx;

use super::director::Director;

/// Snapshot of the display surface as seen by scene code.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInfo {
    /// Drawable width in physical pixels.
    pub width: u32,
    /// Drawable height in physical pixels.
    pub height: u32,
    /// Whether the surface is up. Lifecycle hooks only run once it is.
    pub ready: bool,
}

/// Context handed to every scene call.
///
/// Scenes read input, inspect the surface, and request runtime actions
/// through the director. `render` is present whenever the surface is ready;
/// it is `None` only for transitions driven outside a live surface (tests).
pub struct SceneCtx<'a> {
    pub input: &'a InputState,
    pub surface: SurfaceInfo,
    pub director: &'a mut Director,
    pub render: Option<RenderCtx<'a>>,
}
