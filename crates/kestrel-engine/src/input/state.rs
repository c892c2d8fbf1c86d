/// Size of the key level buffers. Covers the platform keyboard code space
/// (`winit::keyboard::KeyCode` discriminants) with headroom.
pub const KEY_CODE_COUNT: usize = 256;

/// Size of the pointer button level buffers.
pub const BUTTON_CODE_COUNT: usize = 8;

/// Pointer button codes as recorded by the runtime's event translation.
pub mod button {
    pub const LEFT: usize = 0;
    pub const RIGHT: usize = 1;
    pub const MIDDLE: usize = 2;
    pub const BACK: usize = 3;
    pub const FORWARD: usize = 4;
}

/// Double-buffered input levels for a single window.
///
/// Two fixed-size level buffers per input class: the live one, mutated by the
/// record calls, and the previous-frame copy written by `advance()`. Edge
/// queries compare the two. This is a level-triggered model: any number of
/// events may arrive between two `advance()` calls, and only the final level
/// matters.
///
/// Pointer coordinates use whatever origin the recorder chooses; the runtime
/// records them bottom-left-origin and keeps that consistent for the whole
/// process.
#[derive(Debug)]
pub struct InputState {
    keys: [bool; KEY_CODE_COUNT],
    keys_prev: [bool; KEY_CODE_COUNT],
    buttons: [bool; BUTTON_CODE_COUNT],
    buttons_prev: [bool; BUTTON_CODE_COUNT],

    pointer: (f32, f32),
    pointer_prev: (f32, f32),
    scroll: (f32, f32),
    dragging: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_CODE_COUNT],
            keys_prev: [false; KEY_CODE_COUNT],
            buttons: [false; BUTTON_CODE_COUNT],
            buttons_prev: [false; BUTTON_CODE_COUNT],
            pointer: (0.0, 0.0),
            pointer_prev: (0.0, 0.0),
            scroll: (0.0, 0.0),
            dragging: false,
        }
    }

    // ── recording (runtime event translation) ─────────────────────────────

    /// Sets the live level for a key. Out-of-range codes are dropped.
    pub fn record_key_event(&mut self, code: usize, is_down: bool) {
        if code >= KEY_CODE_COUNT {
            log::warn!("dropping key event with out-of-range code {code}");
            return;
        }
        self.keys[code] = is_down;
    }

    /// Sets the live level for a pointer button. Out-of-range codes are dropped.
    pub fn record_button_event(&mut self, code: usize, is_down: bool) {
        if code >= BUTTON_CODE_COUNT {
            log::warn!("dropping button event with out-of-range code {code}");
            return;
        }
        self.buttons[code] = is_down;
    }

    /// Moves the pointer, keeping the prior position for delta queries and
    /// recomputing the dragging flag.
    pub fn record_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer_prev = self.pointer;
        self.pointer = (x, y);
        self.dragging = self.any_button_down();
    }

    /// Stores the scroll delta for the current frame. Assignment, not
    /// accumulation; batched wheel events within one frame keep the last.
    pub fn record_scroll(&mut self, dx: f32, dy: f32) {
        self.scroll = (dx, dy);
    }

    /// Frame boundary: commits the live levels as the previous-frame levels
    /// and drops the per-frame scroll delta. Called exactly once per loop
    /// iteration, between one frame's queries and the next frame's events.
    pub fn advance(&mut self) {
        self.keys_prev = self.keys;
        self.buttons_prev = self.buttons;
        self.scroll = (0.0, 0.0);
    }

    // ── key queries ───────────────────────────────────────────────────────

    pub fn key_down(&self, code: usize) -> bool {
        code < KEY_CODE_COUNT && self.keys[code]
    }

    /// Down now and not down as of the previous frame.
    pub fn key_pressed(&self, code: usize) -> bool {
        code < KEY_CODE_COUNT && self.keys[code] && !self.keys_prev[code]
    }

    /// Not down now and down as of the previous frame.
    pub fn key_released(&self, code: usize) -> bool {
        code < KEY_CODE_COUNT && !self.keys[code] && self.keys_prev[code]
    }

    pub fn any_key_down(&self) -> bool {
        self.keys.iter().any(|&down| down)
    }

    // ── button queries ────────────────────────────────────────────────────

    pub fn button_down(&self, code: usize) -> bool {
        code < BUTTON_CODE_COUNT && self.buttons[code]
    }

    pub fn button_pressed(&self, code: usize) -> bool {
        code < BUTTON_CODE_COUNT && self.buttons[code] && !self.buttons_prev[code]
    }

    pub fn button_released(&self, code: usize) -> bool {
        code < BUTTON_CODE_COUNT && !self.buttons[code] && self.buttons_prev[code]
    }

    pub fn any_button_down(&self) -> bool {
        self.buttons.iter().any(|&down| down)
    }

    // ── pointer queries ───────────────────────────────────────────────────

    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    pub fn pointer_previous(&self) -> (f32, f32) {
        self.pointer_prev
    }

    pub fn scroll(&self) -> (f32, f32) {
        self.scroll
    }

    /// True while the pointer moves with any button held.
    pub fn dragging(&self) -> bool {
        self.dragging
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── edge detection ────────────────────────────────────────────────────

    #[test]
    fn press_then_release_across_frames() {
        for code in [0, 32, KEY_CODE_COUNT - 1] {
            let mut input = InputState::new();
            input.record_key_event(code, true);
            input.advance();
            input.record_key_event(code, false);

            assert!(input.key_released(code), "code {code}");
            assert!(!input.key_pressed(code), "code {code}");
            assert!(!input.key_down(code), "code {code}");
        }
    }

    #[test]
    fn double_record_is_idempotent() {
        let mut input = InputState::new();
        input.record_key_event(7, true);
        input.record_key_event(7, true);

        assert!(input.key_down(7));
        assert!(input.key_pressed(7));

        input.advance();

        // Still held, but the edge fired exactly once.
        assert!(input.key_down(7));
        assert!(!input.key_pressed(7));
    }

    #[test]
    fn queries_are_stable_without_events_or_advance() {
        let mut input = InputState::new();
        input.record_key_event(40, true);

        for _ in 0..3 {
            assert!(input.key_pressed(40));
            assert!(!input.key_released(40));
        }
    }

    #[test]
    fn release_without_press_in_same_frame_window() {
        // Press and release between two advances: final level wins.
        let mut input = InputState::new();
        input.record_key_event(9, true);
        input.record_key_event(9, false);

        assert!(!input.key_down(9));
        assert!(!input.key_pressed(9));
        assert!(!input.key_released(9));
    }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn out_of_range_codes_are_dropped() {
        let mut input = InputState::new();
        input.record_key_event(KEY_CODE_COUNT, true);
        input.record_key_event(usize::MAX, true);
        input.record_button_event(BUTTON_CODE_COUNT, true);

        assert!(!input.any_key_down());
        assert!(!input.any_button_down());
        assert!(!input.key_down(KEY_CODE_COUNT));
        assert!(!input.key_pressed(usize::MAX));
    }

    // ── scans ─────────────────────────────────────────────────────────────

    #[test]
    fn any_key_down_scans_full_range() {
        let mut input = InputState::new();
        assert!(!input.any_key_down());

        input.record_key_event(KEY_CODE_COUNT - 1, true);
        assert!(input.any_key_down());

        input.record_key_event(KEY_CODE_COUNT - 1, false);
        assert!(!input.any_key_down());
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_move_keeps_previous_position() {
        let mut input = InputState::new();
        input.record_pointer_move(10.0, 20.0);
        input.record_pointer_move(30.0, 40.0);

        assert_eq!(input.pointer(), (30.0, 40.0));
        assert_eq!(input.pointer_previous(), (10.0, 20.0));
    }

    #[test]
    fn dragging_requires_a_held_button() {
        let mut input = InputState::new();
        input.record_pointer_move(1.0, 1.0);
        assert!(!input.dragging());

        input.record_button_event(button::LEFT, true);
        input.record_pointer_move(2.0, 2.0);
        assert!(input.dragging());

        input.record_button_event(button::LEFT, false);
        input.record_pointer_move(3.0, 3.0);
        assert!(!input.dragging());
    }

    #[test]
    fn button_edges_mirror_key_edges() {
        let mut input = InputState::new();
        input.record_button_event(button::RIGHT, true);
        assert!(input.button_pressed(button::RIGHT));

        input.advance();
        assert!(input.button_down(button::RIGHT));
        assert!(!input.button_pressed(button::RIGHT));

        input.record_button_event(button::RIGHT, false);
        assert!(input.button_released(button::RIGHT));
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn scroll_is_per_frame() {
        let mut input = InputState::new();
        input.record_scroll(0.0, -1.0);
        input.record_scroll(0.0, 2.0);
        assert_eq!(input.scroll(), (0.0, 2.0));

        input.advance();
        assert_eq!(input.scroll(), (0.0, 0.0));
    }
}
