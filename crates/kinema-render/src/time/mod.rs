//! Frame timing.
//!
//! One [`FrameClock`] per render loop; `tick()` once per frame. The clock
//! never couples to the windowing runtime, so headless rendering and tests
//! drive it the same way the interactive loop does.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
