//! Host configuration for the plugin-data client.
//!
//! Uses figment to merge an optional YAML file with the process
//! environment. The service host is mandatory: without it no client can be
//! built.

pub mod schema;

pub use schema::{Config, HOST_ENV_VAR, LogConfig};
