//! Wrappers around the two external programs.
//!
//! Nothing here reimplements either tool; each module builds an argument list,
//! runs the program to completion and checks its exit status.

pub mod discover;
pub mod magick;
pub mod primitive;
pub mod process;
