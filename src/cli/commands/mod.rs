//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check_db;
pub mod init;
pub mod validate;
