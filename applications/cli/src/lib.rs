//! ExPlayer command-line front end
//!
//! Configuration loading, file intake and text rendering shared by the
//! `explayer` binary.

pub mod config;
pub mod display;
pub mod error;
pub mod files;

pub use config::PlayerSettings;
pub use error::{CliError, Result};
