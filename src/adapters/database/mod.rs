//! Database abstraction layer
//!
//! This module provides a trait-based abstraction over transactions so the
//! orchestrator can run against PostgreSQL or a test double.

pub mod factory;
pub mod traits;

pub use factory::create_transaction_beginner;
pub use traits::{IsolationLevel, Transaction, TransactionBeginner, TransactionOptions};
