//! Fixed demo dataset and the wipe/load/status operations around it.

pub mod data;
pub mod handlers;
