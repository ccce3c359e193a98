//! Storage infrastructure: the optional TOML configuration file.
//!
//! The shell never writes anything to disk.  The `config` sub-module only
//! reads the platform config file, falls back to defaults when it is absent,
//! applies the `PORT` environment override and converts the result into the
//! plain config structs the gateway and view crates expect.

pub mod config;
