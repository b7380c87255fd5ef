#![forbid(unsafe_code)]

pub mod model;
pub mod time;
pub mod timer;

pub use time::Clock;
pub use timer::{Countdown, CountdownTick, DEFAULT_TIME_LIMIT_SECS};
