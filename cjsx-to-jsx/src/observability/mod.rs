//! Logging setup and timing helpers.

mod subscriber;
mod timer;

pub use subscriber::{filter_directive, init_tracing, LogFormat};
pub use timer::SpanTimer;
