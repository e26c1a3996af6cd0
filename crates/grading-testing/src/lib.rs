//! Test utilities for the grading service.
//!
//! Provides `MockSession` (signed session cookies for test requests) and the
//! contract fixture loader. Import in `#[cfg(test)]` blocks and integration
//! tests only — never in production code.

pub mod auth;
pub mod fixture;
