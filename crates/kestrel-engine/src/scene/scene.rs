use std::any::TypeId;

use crate::render::RenderTarget;

use super::ctx::SceneCtx;

/// Identity of a registered scene: registry slot plus concrete type.
///
/// Handed to `on_enter` as the previous scene. Identity rather than a live
/// reference: the previous and incoming scene live in the same registry, and
/// two simultaneous borrows of it are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneInfo {
    pub index: usize,
    pub type_id: TypeId,
    pub name: &'static str,
}

/// A pluggable unit of application behavior.
///
/// Lifecycle: `init` runs exactly once, the first time the scene becomes
/// current; the manager enforces this, so re-entering a scene never
/// re-initializes it. While current, `update` runs at most once per frame
/// before `draw`; `draw` runs every frame, including frames whose delta was
/// unreliable and whose `update` was therefore skipped.
pub trait Scene: 'static {
    /// One-time setup, called before the first `on_enter` returns. GPU
    /// resources are compiled here; the surface is ready by the time this
    /// runs, so `ctx.render` is available.
    fn init(&mut self, ctx: &mut SceneCtx<'_>);

    /// Per-frame simulation step.
    fn update(&mut self, ctx: &mut SceneCtx<'_>, delta: f32);

    /// Per-frame render step. Must tolerate running without a fresh `update`.
    fn draw(&mut self, ctx: &mut SceneCtx<'_>, target: &mut RenderTarget<'_>, delta: f32);

    /// Called on every entry into this scene, after `init` on the first one.
    fn on_enter(&mut self, ctx: &mut SceneCtx<'_>, previous: Option<&SceneInfo>) {
        let _ = (ctx, previous);
    }

    /// Called when the manager transitions away from this scene.
    fn on_exit(&mut self, ctx: &mut SceneCtx<'_>) {
        let _ = ctx;
    }
}
