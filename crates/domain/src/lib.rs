#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod configuration;
mod drop_set;
mod error;
mod execution;
mod mav;
mod myo_reps;
mod quantity;
mod settings;
mod strategy;
mod validation;

pub use configuration::*;
pub use drop_set::*;
pub use error::*;
pub use execution::*;
pub use mav::*;
pub use myo_reps::*;
pub use quantity::*;
pub use settings::*;
pub use strategy::*;
pub use validation::{Advisory, validate_set};
