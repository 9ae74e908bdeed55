//! Shared application core: state, input types, reducer, search workflow and export.

pub mod export;
pub mod input;
pub mod normalize;
pub mod reducer;
pub mod state;
pub mod workflow;
