//! In-process backends for the plugin-data transport.
//!
//! Provides an in-memory emulation of the remote service for tests and
//! offline use.

pub mod memory;

pub use memory::InMemoryTransport;
