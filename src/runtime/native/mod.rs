//! Native runtime pieces: HTTP adapter, export sinks, logging and workers.

pub mod data;
pub mod export;
pub mod logging;
pub mod worker;
