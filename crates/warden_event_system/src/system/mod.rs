//! Event system module - broken down into manageable components
mod core;
mod emitters;
mod handlers;
mod stats;

pub use self::core::{EventSystem, HandlerId};
pub use stats::EventSystemStats;
