//! Locating and vetting the runtime the worker is launched through.

pub mod deps;
pub mod probe;
pub mod resolver;
