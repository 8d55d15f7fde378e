//! # swinglab
//!
//! Command-line front end for [`swinglab_core`].
//!
//! - [`capture`]: JSON pose captures on disk
//! - [`config`]: TOML analyzer settings and linear score models
//! - [`cli`]: argument parsing and command execution

pub mod capture;
pub mod cli;
pub mod config;
