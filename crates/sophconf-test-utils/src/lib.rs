//! Shared test utilities for the sophconf workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`seeds`]: seed tables for the reference configuration scenarios
//! - [`dir`]: [`dir::TestDir`] for tests that read and write config files

pub mod dir;
pub mod seeds;
