//! Foundation utilities
//!
//! Math types, logging, and time management shared by every other module.

pub mod logging;
pub mod math;
pub mod time;
