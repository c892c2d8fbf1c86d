//! Demo scenes: a shader quad and an idle scene, switchable with Space.

use kestrel_engine::input::{KeyCode, button, key_code};
use kestrel_engine::render::{RenderTarget, ShaderQuad};
use kestrel_engine::scene::{Scene, SceneCtx, SceneInfo};

const VERTEX_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/shaders/quad.vert.wgsl");
const FRAGMENT_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/shaders/quad.frag.wgsl");

/// Draws the classic colored quad.
pub struct QuadScene {
    quad: ShaderQuad,
}

impl QuadScene {
    pub fn new() -> Self {
        Self {
            quad: ShaderQuad::from_files(VERTEX_PATH, FRAGMENT_PATH),
        }
    }
}

impl Scene for QuadScene {
    fn init(&mut self, ctx: &mut SceneCtx<'_>) {
        let Some(render) = ctx.render.as_ref() else {
            return;
        };
        if let Err(err) = self.quad.compile(render) {
            // Degrade: the quad stays inert, the loop keeps running.
            log::error!("quad shader rejected: {err}");
        }
    }

    fn update(&mut self, ctx: &mut SceneCtx<'_>, _delta: f32) {
        if ctx.input.key_pressed(key_code(KeyCode::Space)) {
            ctx.director.switch_to::<IdleScene>();
        }
        if ctx.input.key_pressed(key_code(KeyCode::Escape)) {
            ctx.director.exit();
        }
    }

    fn draw(&mut self, _ctx: &mut SceneCtx<'_>, target: &mut RenderTarget<'_>, _delta: f32) {
        self.quad.draw(target);
    }
}

/// Blank scene that reports pointer activity; switch back with Space.
pub struct IdleScene {
    elapsed: f32,
}

impl IdleScene {
    pub fn new() -> Self {
        Self { elapsed: 0.0 }
    }
}

impl Scene for IdleScene {
    fn init(&mut self, _ctx: &mut SceneCtx<'_>) {}

    fn update(&mut self, ctx: &mut SceneCtx<'_>, delta: f32) {
        self.elapsed += delta;

        if ctx.input.button_pressed(button::LEFT) {
            let (x, y) = ctx.input.pointer();
            log::info!("click at ({x:.0}, {y:.0}) after {:.1}s", self.elapsed);
        }
        if ctx.input.dragging() {
            let (x, y) = ctx.input.pointer();
            log::debug!("dragging at ({x:.0}, {y:.0})");
        }

        if ctx.input.key_pressed(key_code(KeyCode::Space)) {
            ctx.director.switch_to::<QuadScene>();
        }
        if ctx.input.key_pressed(key_code(KeyCode::Escape)) {
            ctx.director.exit();
        }
    }

    fn draw(&mut self, _ctx: &mut SceneCtx<'_>, _target: &mut RenderTarget<'_>, _delta: f32) {
        // Clear-only frame.
    }

    fn on_enter(&mut self, _ctx: &mut SceneCtx<'_>, previous: Option<&SceneInfo>) {
        match previous {
            Some(info) => log::info!("idle scene entered from {}", info.name),
            None => log::info!("idle scene entered"),
        }
    }

    fn on_exit(&mut self, _ctx: &mut SceneCtx<'_>) {
        log::info!("idle scene left after {:.1}s", self.elapsed);
    }
}
