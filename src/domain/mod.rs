//! Domain layer: value types, events, and the contracts of the external
//! collaborators the container manager drives.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AmError, AmResult};
