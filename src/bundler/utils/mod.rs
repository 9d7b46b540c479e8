//! Shared filesystem and path helpers.

pub mod fs;
pub mod path;
