//! Time subsystem.
//!
//! One `FrameClock` per window; call `tick()` once per presented frame to obtain
//! a `FrameTime`. Animation in this crate advances by a fixed step per frame, so
//! `dt` is informational (frame-rate reporting) rather than a simulation input.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameRate, FrameTime};
