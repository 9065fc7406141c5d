//! Timeline module - Per-object clocks, playback modes and global clocks.

mod clock;
mod playback;

pub use clock::*;
pub use playback::*;
