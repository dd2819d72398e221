//! Gesture pipeline: build a stroke, submit it, correlate its completion

pub mod builder;
pub mod dispatcher;
pub mod lifecycle;
pub mod token;

pub use builder::{clamp_duration, GestureBuilder};
pub use dispatcher::{GestureCallback, GestureDispatcher};
pub use lifecycle::{CommandLifecycle, CommandState};
pub use token::{command_token, CommandToken, TokenResolver};
