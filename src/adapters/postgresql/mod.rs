//! PostgreSQL database integration
//!
//! This module provides the pooled client and the transaction type that
//! back phase-scoped transactions.

pub mod client;
pub mod transaction;

pub use client::PostgreSQLClient;
pub use transaction::PostgreSQLTransaction;
