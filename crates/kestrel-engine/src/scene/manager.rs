use std::any::{TypeId, type_name};

use super::ctx::SceneCtx;
use super::error::SceneError;
use super::scene::{Scene, SceneInfo};

struct SceneEntry {
    scene: Box<dyn Scene>,
    type_id: TypeId,
    name: &'static str,
    initialized: bool,
}

impl SceneEntry {
    fn info(&self, index: usize) -> SceneInfo {
        SceneInfo {
            index,
            type_id: self.type_id,
            name: self.name,
        }
    }
}

/// Ordered scene registry and transition machine.
///
/// The registry is append-only; scenes are never removed. Duplicate types are
/// allowed; type-based lookup returns the first match. `current` and
/// `previous` are registry indices, so `current == registry[index]` holds by
/// construction whenever a scene is active.
///
/// Transitions run the outgoing scene's `on_exit` to completion before the
/// incoming scene's `on_enter` begins, and both complete before the next
/// `update`/`draw`. Entry into a scene is deferred while the surface is not
/// ready; the runtime performs the deferred first activation once it is.
pub struct SceneManager {
    entries: Vec<SceneEntry>,
    current: Option<usize>,
    previous: Option<usize>,
    surface_ready: bool,
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            previous: None,
            surface_ready: false,
        }
    }

    // ── registry ──────────────────────────────────────────────────────────

    /// Appends a scene to the registry. No duplicate validation.
    pub fn register<S: Scene>(&mut self, scene: S) {
        self.entries.push(SceneEntry {
            scene: Box::new(scene),
            type_id: TypeId::of::<S>(),
            name: type_name::<S>(),
            initialized: false,
        });
    }

    /// Appends a scene built by `build`. The construction closure keeps scene
    /// creation explicit per variant; there is no runtime type introspection.
    pub fn register_with<S, F>(&mut self, build: F)
    where
        S: Scene,
        F: FnOnce() -> S,
    {
        self.register(build());
    }

    pub fn has_any_scene(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── activation ────────────────────────────────────────────────────────

    /// Transitions to the scene at `index`. On an out-of-range index the
    /// registry state (current, previous, hooks) is left untouched.
    pub fn activate_by_index(
        &mut self,
        index: usize,
        ctx: &mut SceneCtx<'_>,
    ) -> Result<(), SceneError> {
        if index >= self.entries.len() {
            return Err(SceneError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        self.transition(index, ctx);
        Ok(())
    }

    /// Transitions to the first registered scene of type `S`. A miss falls
    /// back to the first registered scene; the loop stays alive on a bad
    /// lookup, at the cost of masking it (logged at `warn`).
    pub fn activate_by_type<S: Scene>(&mut self, ctx: &mut SceneCtx<'_>) -> Result<(), SceneError> {
        self.activate_by_type_id(TypeId::of::<S>(), type_name::<S>(), ctx)
    }

    pub(crate) fn activate_by_type_id(
        &mut self,
        id: TypeId,
        name: &str,
        ctx: &mut SceneCtx<'_>,
    ) -> Result<(), SceneError> {
        let index = match self.entries.iter().position(|e| e.type_id == id) {
            Some(index) => index,
            None => {
                log::warn!("no scene registered for {name}; falling back to the first scene");
                0
            }
        };
        self.activate_by_index(index, ctx)
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// The active scene, or `NoSceneActive` when the registry is empty or no
    /// activation has occurred yet.
    pub fn current_scene(&mut self) -> Result<&mut dyn Scene, SceneError> {
        match self.current {
            Some(index) => Ok(self.entries[index].scene.as_mut()),
            None => Err(SceneError::NoSceneActive),
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_info(&self) -> Option<SceneInfo> {
        self.current.map(|i| self.entries[i].info(i))
    }

    pub fn previous_info(&self) -> Option<SceneInfo> {
        self.previous.map(|i| self.entries[i].info(i))
    }

    // ── surface readiness ─────────────────────────────────────────────────

    /// Marks the surface as up. Called by the runtime once initialization
    /// completes; from then on activations enter scenes immediately.
    pub fn set_surface_ready(&mut self) {
        self.surface_ready = true;
    }

    pub fn surface_ready(&self) -> bool {
        self.surface_ready
    }

    // ── transition machine ────────────────────────────────────────────────

    fn transition(&mut self, next: usize, ctx: &mut SceneCtx<'_>) {
        let previous = self.current;
        self.previous = previous;

        if let Some(index) = previous {
            self.entries[index].scene.on_exit(ctx);
        }

        self.current = Some(next);

        if self.surface_ready {
            let previous_info = previous.map(|i| self.entries[i].info(i));
            let entry = &mut self.entries[next];
            if !entry.initialized {
                entry.scene.init(ctx);
                entry.initialized = true;
            }
            entry.scene.on_enter(ctx, previous_info.as_ref());
        }
        // Not ready: entry is deferred. The runtime activates the first
        // registered scene once the surface comes up.
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::render::RenderTarget;
    use crate::scene::{Director, SurfaceInfo};
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<String>>>;

    macro_rules! test_scene {
        ($name:ident, $tag:literal) => {
            struct $name {
                log: CallLog,
            }

            impl Scene for $name {
                fn init(&mut self, _ctx: &mut SceneCtx<'_>) {
                    self.log.borrow_mut().push(concat!($tag, ".init").into());
                }

                fn update(&mut self, _ctx: &mut SceneCtx<'_>, _delta: f32) {}

                fn draw(
                    &mut self,
                    _ctx: &mut SceneCtx<'_>,
                    _target: &mut RenderTarget<'_>,
                    _delta: f32,
                ) {
                }

                fn on_enter(&mut self, _ctx: &mut SceneCtx<'_>, previous: Option<&SceneInfo>) {
                    let from = previous.map(|p| p.index);
                    self.log
                        .borrow_mut()
                        .push(format!(concat!($tag, ".enter({:?})"), from));
                }

                fn on_exit(&mut self, _ctx: &mut SceneCtx<'_>) {
                    self.log.borrow_mut().push(concat!($tag, ".exit").into());
                }
            }
        };
    }

    test_scene!(SceneA, "A");
    test_scene!(SceneB, "B");
    test_scene!(SceneC, "C");

    // Never registered; used for lookup misses.
    test_scene!(SceneX, "X");

    fn manager_abc(log: &CallLog) -> SceneManager {
        let mut scenes = SceneManager::new();
        scenes.register(SceneA { log: log.clone() });
        scenes.register(SceneB { log: log.clone() });
        scenes.register(SceneC { log: log.clone() });
        scenes.set_surface_ready();
        scenes
    }

    fn with_ctx<F>(f: F) -> Vec<String>
    where
        F: FnOnce(&mut SceneCtx<'_>, &CallLog),
    {
        let input = InputState::new();
        let mut director = Director::new();
        let mut ctx = SceneCtx {
            input: &input,
            surface: SurfaceInfo {
                width: 800,
                height: 600,
                ready: true,
            },
            director: &mut director,
            render: None,
        };
        let log: CallLog = Rc::default();
        f(&mut ctx, &log);
        Rc::try_unwrap(log).unwrap().into_inner()
    }

    // ── activation ────────────────────────────────────────────────────────

    #[test]
    fn first_activation_has_no_previous() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_index(1, ctx).unwrap();

            assert_eq!(scenes.current_index(), Some(1));
            assert_eq!(scenes.previous_info(), None);
            assert_eq!(
                scenes.current_info().unwrap().type_id,
                TypeId::of::<SceneB>()
            );
        });
        assert_eq!(calls, ["B.init", "B.enter(None)"]);
    }

    #[test]
    fn reactivation_reenters_without_reinit() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_index(1, ctx).unwrap();
            scenes.activate_by_index(1, ctx).unwrap();

            assert_eq!(scenes.current_index(), Some(1));
            assert_eq!(scenes.previous_info().unwrap().index, 1);
        });
        assert_eq!(
            calls,
            ["B.init", "B.enter(None)", "B.exit", "B.enter(Some(1))"]
        );
    }

    #[test]
    fn exit_completes_before_enter_begins() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_index(0, ctx).unwrap();
            scenes.activate_by_index(2, ctx).unwrap();
        });
        assert_eq!(
            calls,
            ["A.init", "A.enter(None)", "A.exit", "C.init", "C.enter(Some(0))"]
        );
    }

    #[test]
    fn revisited_scene_is_not_reinitialized() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_index(0, ctx).unwrap();
            scenes.activate_by_index(1, ctx).unwrap();
            scenes.activate_by_index(0, ctx).unwrap();
        });
        assert_eq!(
            calls.iter().filter(|c| c.as_str() == "A.init").count(),
            1,
            "{calls:?}"
        );
        assert_eq!(*calls.last().unwrap(), "A.enter(Some(1))");
    }

    #[test]
    fn out_of_range_index_leaves_state_untouched() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_index(1, ctx).unwrap();

            let err = scenes.activate_by_index(5, ctx).unwrap_err();
            assert_eq!(err, SceneError::IndexOutOfRange { index: 5, len: 3 });
            assert_eq!(scenes.current_index(), Some(1));
            assert_eq!(scenes.previous_info(), None);
        });
        assert_eq!(calls, ["B.init", "B.enter(None)"]);
    }

    #[test]
    fn type_activation_finds_first_match() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_type::<SceneC>(ctx).unwrap();
            assert_eq!(scenes.current_index(), Some(2));
        });
        assert_eq!(calls, ["C.init", "C.enter(None)"]);
    }

    #[test]
    fn type_miss_falls_back_to_first_scene() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = manager_abc(log);
            scenes.activate_by_index(1, ctx).unwrap();

            scenes.activate_by_type::<SceneX>(ctx).unwrap();
            assert_eq!(scenes.current_index(), Some(0));
            assert_eq!(scenes.previous_info().unwrap().index, 1);
        });
        assert_eq!(
            calls,
            ["B.init", "B.enter(None)", "B.exit", "A.init", "A.enter(Some(1))"]
        );
    }

    #[test]
    fn type_miss_on_empty_registry_is_an_error() {
        with_ctx(|ctx, _log| {
            let mut scenes = SceneManager::new();
            scenes.set_surface_ready();
            assert_eq!(
                scenes.activate_by_type::<SceneX>(ctx),
                Err(SceneError::IndexOutOfRange { index: 0, len: 0 })
            );
        });
    }

    // ── deferral ──────────────────────────────────────────────────────────

    #[test]
    fn entry_is_deferred_until_surface_ready() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = SceneManager::new();
            scenes.register(SceneA { log: log.clone() });
            scenes.register(SceneB { log: log.clone() });

            scenes.activate_by_index(1, ctx).unwrap();
            assert_eq!(scenes.current_index(), Some(1));
            assert!(log.borrow().is_empty());

            // What the runtime does once the surface comes up.
            scenes.set_surface_ready();
            scenes.activate_by_index(0, ctx).unwrap();
            assert_eq!(scenes.current_index(), Some(0));
        });
        // The deferred activation exits the pending scene, then enters scene 0.
        assert_eq!(calls, ["B.exit", "A.init", "A.enter(Some(1))"]);
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[test]
    fn current_scene_requires_an_activation() {
        with_ctx(|ctx, log| {
            let mut scenes = SceneManager::new();
            assert_eq!(
                scenes.current_scene().err(),
                Some(SceneError::NoSceneActive)
            );
            assert!(!scenes.has_any_scene());

            scenes.register(SceneA { log: log.clone() });
            assert!(scenes.has_any_scene());
            assert_eq!(
                scenes.current_scene().err(),
                Some(SceneError::NoSceneActive)
            );

            scenes.set_surface_ready();
            scenes.activate_by_index(0, ctx).unwrap();
            assert!(scenes.current_scene().is_ok());
        });
    }

    #[test]
    fn duplicate_types_resolve_to_first_registration() {
        let calls = with_ctx(|ctx, log| {
            let mut scenes = SceneManager::new();
            scenes.register(SceneA { log: log.clone() });
            scenes.register(SceneA { log: log.clone() });
            scenes.set_surface_ready();

            scenes.activate_by_index(1, ctx).unwrap();
            scenes.activate_by_type::<SceneA>(ctx).unwrap();
            assert_eq!(scenes.current_index(), Some(0));
        });
        // Both entries are distinct instances; each initializes once.
        assert_eq!(
            calls,
            ["A.init", "A.enter(None)", "A.exit", "A.init", "A.enter(Some(1))"]
        );
    }
}
