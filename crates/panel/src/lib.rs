//! `autolab-panel` library crate.
//!
//! Re-exports the panel modules for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod binder;
pub mod commands;
pub mod config;
pub mod display;
