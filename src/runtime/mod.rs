//! Runtime-specific modules.

pub mod native;
