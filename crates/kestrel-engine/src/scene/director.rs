use std::any::{TypeId, type_name};

use super::scene::Scene;

/// Runtime commands a scene may request during a frame.
///
/// Applied by the loop after the frame's scene calls return, so a transition
/// never tears down the scene whose method is still on the stack. Commands
/// queued from inside lifecycle hooks take effect on the next frame.
pub(crate) enum DirectorCmd {
    ActivateIndex(usize),
    ActivateType { id: TypeId, name: &'static str },
    Exit,
}

/// Deferred command buffer for scene-initiated runtime actions.
#[derive(Default)]
pub struct Director {
    commands: Vec<DirectorCmd>,
}

impl Director {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a transition to the first registered scene of type `S`.
    pub fn switch_to<S: Scene>(&mut self) {
        self.commands.push(DirectorCmd::ActivateType {
            id: TypeId::of::<S>(),
            name: type_name::<S>(),
        });
    }

    /// Requests a transition to the scene at `index` in registration order.
    pub fn switch_to_index(&mut self, index: usize) {
        self.commands.push(DirectorCmd::ActivateIndex(index));
    }

    /// Requests loop termination, equivalent to a surface close request.
    pub fn exit(&mut self) {
        self.commands.push(DirectorCmd::Exit);
    }

    pub(crate) fn take_commands(&mut self) -> Vec<DirectorCmd> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderTarget;
    use crate::scene::{SceneCtx, SceneInfo};

    struct Nop;

    impl Scene for Nop {
        fn init(&mut self, _ctx: &mut SceneCtx<'_>) {}
        fn update(&mut self, _ctx: &mut SceneCtx<'_>, _delta: f32) {}
        fn draw(&mut self, _ctx: &mut SceneCtx<'_>, _target: &mut RenderTarget<'_>, _delta: f32) {}
        fn on_enter(&mut self, _ctx: &mut SceneCtx<'_>, _previous: Option<&SceneInfo>) {}
    }

    #[test]
    fn commands_drain_in_order() {
        let mut director = Director::new();
        director.switch_to_index(2);
        director.switch_to::<Nop>();
        director.exit();

        let commands = director.take_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DirectorCmd::ActivateIndex(2)));
        assert!(matches!(
            commands[1],
            DirectorCmd::ActivateType { id, .. } if id == TypeId::of::<Nop>()
        ));
        assert!(matches!(commands[2], DirectorCmd::Exit));

        assert!(director.take_commands().is_empty());
    }
}
