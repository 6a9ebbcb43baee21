//! Infrastructure: configuration loading and logging setup for the
//! embedding application master.

pub mod config;
pub mod logging;
