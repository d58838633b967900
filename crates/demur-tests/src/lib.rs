//! Shared helpers for Demur integration tests.

pub mod helpers;
