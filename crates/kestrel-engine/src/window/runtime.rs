use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputState, key_code};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Director, DirectorCmd, SceneCtx, SceneManager, SurfaceInfo};
use crate::time::FrameClock;

use super::config::RuntimeConfig;
use super::error::RuntimeError;

/// Entry point for the runtime loop.
pub struct Runtime;

impl Runtime {
    /// Runs the loop to completion: acquires the display surface, performs
    /// the deferred activation of the first registered scene, then drives
    /// input/clock/update/draw until the surface reports a close request.
    ///
    /// Fatal failures (surface acquisition, empty scene registry at the
    /// render step) are returned after the window and GPU context have been
    /// released; both are downcastable to [`RuntimeError`].
    pub fn run(config: RuntimeConfig, scenes: SceneManager) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = LoopState::new(config, scenes);
        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

/// Loop lifecycle, in order. `ShuttingDown` covers both the close request
/// and the fatal-error path; teardown itself happens in `exiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopPhase {
    Created,
    SurfaceInitializing,
    Running,
    ShuttingDown,
    Terminated,
}

#[self_referencing]
struct SurfaceEntry {
    input: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct LoopState {
    config: RuntimeConfig,
    scenes: SceneManager,
    director: Director,

    entry: Option<SurfaceEntry>,
    phase: LoopPhase,

    /// The clock's first sample covers window + GPU bring-up and is not a
    /// usable frame delta; the first update is skipped.
    updated_once: bool,

    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl LoopState {
    fn new(config: RuntimeConfig, scenes: SceneManager) -> Self {
        Self {
            config,
            scenes,
            director: Director::new(),
            entry: None,
            phase: LoopPhase::Created,
            updated_once: false,
            exit_requested: false,
            fatal: None,
        }
    }

    fn finish(mut self) -> Result<()> {
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn set_phase(&mut self, phase: LoopPhase) {
        if self.phase != phase {
            log::debug!("loop phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.set_phase(LoopPhase::ShuttingDown);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("fatal: {err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.request_exit(event_loop);
    }

    /// Runs `f` with the scene manager and a fully-formed scene context.
    /// No-op before the surface entry exists.
    fn with_scene_ctx<F>(&mut self, f: F)
    where
        F: FnOnce(&mut SceneManager, &mut SceneCtx<'_>),
    {
        // Split borrows so the ouroboros closure does not capture `self`.
        let (scenes, director) = (&mut self.scenes, &mut self.director);
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            let size = fields.gpu.size();
            let render = RenderCtx::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                fields.gpu.surface_format(),
                size.width,
                size.height,
            );
            let mut ctx = SceneCtx {
                input: fields.input,
                surface: SurfaceInfo {
                    width: size.width,
                    height: size.height,
                    ready: true,
                },
                director,
                render: Some(render),
            };
            f(scenes, &mut ctx);
        });
    }

    /// One iteration of the running loop: delta, scene update/draw, present,
    /// input frame boundary.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            return;
        }

        let (scenes, director) = (&mut self.scenes, &mut self.director);
        let updated_once = &mut self.updated_once;
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let mut fatal: Option<RuntimeError> = None;
        let mut surface_gone = false;

        entry.with_mut(|fields| {
            let delta = fields.clock.sample();

            // Nothing to render is a hard stop, not a recoverable state.
            if let Err(err) = ensure_scene_available(scenes) {
                fatal = Some(err);
                return;
            }

            let mut frame = match fields.gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    if fields.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                        log::error!("surface is out of memory; shutting down");
                        surface_gone = true;
                    }
                    return;
                }
            };

            // Clear pass — dropped before the encoder is handed to the scene.
            {
                let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("kestrel clear"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 1.0,
                                g: 1.0,
                                b: 1.0,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                });
            }

            {
                let size = fields.gpu.size();
                let render = RenderCtx::new(
                    fields.gpu.device(),
                    fields.gpu.queue(),
                    fields.gpu.surface_format(),
                    size.width,
                    size.height,
                );
                let mut ctx = SceneCtx {
                    input: fields.input,
                    surface: SurfaceInfo {
                        width: size.width,
                        height: size.height,
                        ready: true,
                    },
                    director,
                    render: Some(render),
                };

                let scene = match scenes.current_scene() {
                    Ok(scene) => scene,
                    Err(_) => {
                        fatal = Some(RuntimeError::NoSceneFound);
                        return;
                    }
                };

                if *updated_once {
                    // Negative delta means the platform clock misbehaved:
                    // skip the update, still draw.
                    if delta >= 0.0 {
                        scene.update(&mut ctx, delta);
                    }
                } else {
                    *updated_once = true;
                }

                {
                    let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                    scene.draw(&mut ctx, &mut target, delta);
                }
            }

            fields.window.pre_present_notify();
            fields.gpu.submit(frame);

            // Frame boundary: commit levels for the next frame's edge
            // queries, drop the per-frame scroll delta.
            fields.input.advance();
        });

        if let Some(err) = fatal {
            self.fail(event_loop, err.into());
            return;
        }
        if surface_gone {
            self.request_exit(event_loop);
            return;
        }

        self.apply_directives(event_loop);
    }

    /// Applies scene-queued commands after the frame's scene calls returned.
    /// Commands queued by the transitions run here wait for the next frame.
    fn apply_directives(&mut self, event_loop: &ActiveEventLoop) {
        for cmd in self.director.take_commands() {
            match cmd {
                DirectorCmd::ActivateIndex(index) => self.with_scene_ctx(|scenes, ctx| {
                    if let Err(err) = scenes.activate_by_index(index, ctx) {
                        log::error!("scene switch failed: {err}");
                    }
                }),
                DirectorCmd::ActivateType { id, name } => self.with_scene_ctx(|scenes, ctx| {
                    if let Err(err) = scenes.activate_by_type_id(id, name, ctx) {
                        log::error!("scene switch failed: {err}");
                    }
                }),
                DirectorCmd::Exit => self.request_exit(event_loop),
            }
        }
    }
}

impl ApplicationHandler for LoopState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Surface acquisition happens once; later resumes keep the entry.
        if self.entry.is_some() {
            return;
        }

        self.set_phase(LoopPhase::SurfaceInitializing);

        match create_surface_entry(event_loop, &self.config) {
            Ok(entry) => self.entry = Some(entry),
            Err(err) => {
                let reason = format!("{err:#}");
                self.fail(event_loop, RuntimeError::SurfaceInit { reason }.into());
                return;
            }
        }

        self.set_phase(LoopPhase::Running);

        // Deferred first activation: entry into a scene waited for the
        // surface; from here on activations enter immediately.
        self.scenes.set_surface_ready();
        if self.scenes.has_any_scene() {
            self.with_scene_ctx(|scenes, ctx| {
                if let Err(err) = scenes.activate_by_index(0, ctx) {
                    log::error!("initial scene activation failed: {err}");
                }
            });
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; vsync (when configured) paces the loop.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        {
            let Some(entry) = self.entry.as_ref() else {
                return;
            };
            if entry.with_window(|w| w.id()) != window_id {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.frame(event_loop),

            ref other => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_mut(|fields| {
                        record_window_event(fields.input, fields.window, other);
                    });
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Scope-bound teardown: dropping the entry releases the GPU context,
        // then the window, on the normal and the fatal path alike.
        self.entry = None;
        self.set_phase(LoopPhase::Terminated);
    }
}

/// The loop cannot render without a scene.
fn ensure_scene_available(scenes: &SceneManager) -> Result<(), RuntimeError> {
    if scenes.has_any_scene() {
        Ok(())
    } else {
        Err(RuntimeError::NoSceneFound)
    }
}

fn create_surface_entry(
    event_loop: &ActiveEventLoop,
    config: &RuntimeConfig,
) -> Result<SurfaceEntry> {
    let attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
        .with_resizable(config.resizable)
        .with_maximized(config.fullscreen)
        // Kept hidden until the GPU context is up.
        .with_visible(false);

    let window = event_loop
        .create_window(attrs)
        .context("failed to create window")?;

    let vsync = config.vsync;
    let entry = SurfaceEntryTryBuilder {
        input: InputState::new(),
        clock: FrameClock::new(),
        window,
        gpu_builder: |window| pollster::block_on(Gpu::new(window, vsync)),
    }
    .try_build()
    .context("failed to acquire a GPU context")?;

    entry.with_window(|window| {
        if config.center_on_start {
            center_window(window);
        }
        window.set_visible(true);
    });

    Ok(entry)
}

fn center_window(window: &Window) {
    let Some(monitor) = window.current_monitor() else {
        return;
    };

    let monitor_size = monitor.size();
    let monitor_pos = monitor.position();
    let outer = window.outer_size();

    let x = monitor_pos.x + (monitor_size.width.saturating_sub(outer.width) / 2) as i32;
    let y = monitor_pos.y + (monitor_size.height.saturating_sub(outer.height) / 2) as i32;
    window.set_outer_position(PhysicalPosition::new(x, y));
}

/// Translates platform window events into input records.
///
/// Pointer coordinates are flipped to a bottom-left origin, consistently for
/// the whole process. Unidentified keys carry no stable code and are dropped.
fn record_window_event(input: &mut InputState, window: &Window, event: &WindowEvent) {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if let PhysicalKey::Code(code) = event.physical_key {
                input.record_key_event(key_code(code), event.state.is_pressed());
            }
        }

        WindowEvent::CursorMoved { position, .. } => {
            let height = window.inner_size().height as f64;
            input.record_pointer_move(position.x as f32, (height - position.y) as f32);
        }

        WindowEvent::MouseInput { state, button, .. } => {
            input.record_button_event(button_code(*button), state.is_pressed());
        }

        WindowEvent::MouseWheel { delta, .. } => match delta {
            MouseScrollDelta::LineDelta(x, y) => input.record_scroll(*x, *y),
            MouseScrollDelta::PixelDelta(p) => input.record_scroll(p.x as f32, p.y as f32),
        },

        _ => {}
    }
}

fn button_code(button: WinitMouseButton) -> usize {
    match button {
        WinitMouseButton::Left => 0,
        WinitMouseButton::Right => 1,
        WinitMouseButton::Middle => 2,
        WinitMouseButton::Back => 3,
        WinitMouseButton::Forward => 4,
        // Out-of-range values are dropped by the bounds check downstream.
        WinitMouseButton::Other(v) => 5 + v as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::button;
    use crate::scene::{Scene, SceneInfo};

    struct Empty;

    impl Scene for Empty {
        fn init(&mut self, _ctx: &mut SceneCtx<'_>) {}
        fn update(&mut self, _ctx: &mut SceneCtx<'_>, _delta: f32) {}
        fn draw(&mut self, _ctx: &mut SceneCtx<'_>, _target: &mut RenderTarget<'_>, _delta: f32) {}
        fn on_enter(&mut self, _ctx: &mut SceneCtx<'_>, _previous: Option<&SceneInfo>) {}
    }

    #[test]
    fn empty_registry_is_a_fatal_render_error() {
        let scenes = SceneManager::new();
        assert_eq!(
            ensure_scene_available(&scenes),
            Err(RuntimeError::NoSceneFound)
        );
    }

    #[test]
    fn registered_scene_satisfies_the_render_step() {
        let mut scenes = SceneManager::new();
        scenes.register(Empty);
        assert_eq!(ensure_scene_available(&scenes), Ok(()));
    }

    #[test]
    fn button_codes_are_stable() {
        assert_eq!(button_code(WinitMouseButton::Left), button::LEFT);
        assert_eq!(button_code(WinitMouseButton::Right), button::RIGHT);
        assert_eq!(button_code(WinitMouseButton::Middle), button::MIDDLE);
        assert_eq!(button_code(WinitMouseButton::Back), button::BACK);
        assert_eq!(button_code(WinitMouseButton::Forward), button::FORWARD);
    }
}
