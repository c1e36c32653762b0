//! # Domain Models
//!
//! Plain data shared by the server, the clients and the shell: section keys and their
//! visibility flags, the content resources with their entity shapes, and configuration.
//! No I/O lives here.

pub mod config;
pub mod constants;
pub mod content;
pub mod registry;
pub mod sections;
