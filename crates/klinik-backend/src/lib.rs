//! Backend-as-a-service adapters for klinik-core.
//!
//! This crate parses the hosted auth and database payloads into core types
//! and provides an in-memory [`MockBackend`] implementing both collaborator
//! traits for tests and demos.

pub mod mock;
pub mod wire;

pub use mock::*;
pub use wire::*;
