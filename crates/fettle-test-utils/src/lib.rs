//! Shared test utilities for the fettle workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`env`]: [`TestEnv`], a temporary project plus fettle and Claude homes
//! - [`backend`]: [`FakeBackend`], an in-memory plugin system

pub mod backend;
pub mod env;

pub use backend::{FakeBackend, FakeError};
pub use env::TestEnv;
