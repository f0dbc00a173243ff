//! Shared library surface for the profile server and its tests.

pub mod api;
pub mod config;
pub mod state;
