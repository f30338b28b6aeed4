#![warn(clippy::pedantic)]

mod context;
mod controller;
mod event;
pub mod log;
mod rest_timer;
mod state;
mod transition;

pub use context::*;
pub use controller::*;
pub use event::*;
pub use rest_timer::*;
pub use state::*;
pub use transition::*;
