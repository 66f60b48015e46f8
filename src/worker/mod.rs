//! The `chart-worker` side of the bridge: argument handling, the stdout line protocol, and the
//! one-shot and preloaded run loops.

pub mod cli;
pub mod protocol;
pub mod run;
