//! Time subsystem.
//!
//! One `FrameClock` per runtime loop; `sample()` is called once per frame and
//! yields the elapsed seconds since the previous sample. The clock does not
//! clamp or repair deltas; policy for bad deltas (negative, or the oversized
//! first sample) belongs to the loop, not the clock.

mod frame_clock;

pub use frame_clock::FrameClock;
