//! Shared library surface for the tour server and its tests.

pub mod api;
pub mod config;
pub mod loops;
pub mod state;
