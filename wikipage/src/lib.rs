//! Expose wikipage's command internals for integration tests and the xtask
//! runner. Not meant as a stable library API.
pub mod cli;
pub mod commands;
