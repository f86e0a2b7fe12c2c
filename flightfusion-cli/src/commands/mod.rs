//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (list, path, init)
//! - [`fetch`] - Live fetch cycle against the providers
//! - [`fuse`] - Offline fusion of saved provider payloads

pub mod common;
pub mod config;
pub mod fetch;
pub mod fuse;
