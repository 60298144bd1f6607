//! The per-request inputs: the configuration record and the working directories.

pub mod params;
pub mod workspace;
