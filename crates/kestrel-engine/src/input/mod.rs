//! Input subsystem.
//!
//! `InputState` tracks keyboard and pointer levels across two consecutive
//! frames so scenes can query edges ("pressed this frame") as well as levels
//! ("down right now"). All mutation happens on the loop thread: the runtime
//! records translated platform events, then calls `advance()` once per frame
//! to commit the current levels as the next frame's previous levels.
//!
//! Keys are addressed by the platform keyboard code (`KeyCode as usize`);
//! pointer buttons by a small stable code (see [`button`]).

mod state;

pub use state::{BUTTON_CODE_COUNT, InputState, KEY_CODE_COUNT, button};

// Key identity comes straight from the platform layer; scenes use the same
// codes the runtime records.
pub use winit::keyboard::KeyCode;

/// Stable array code for a physical key.
pub fn key_code(key: KeyCode) -> usize {
    key as usize
}
