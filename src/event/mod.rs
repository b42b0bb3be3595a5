//! Event model: the timed output of the pattern compiler.
//!
//! Time is measured in cycles: `cycle` counts whole repetitions and
//! [`CycleTime`] holds the exact position inside one.

pub mod time;
pub mod types;

pub use time::CycleTime;
pub use types::{Event, Trigger, DEFAULT_VELOCITY};
