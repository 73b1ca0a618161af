//! Database client factory
//!
//! This module provides the factory function that turns the `[database]`
//! configuration section into a transaction source.

use crate::adapters::database::traits::TransactionBeginner;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::DatabaseConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create a transaction source from the database configuration
///
/// # Errors
///
/// Returns an error if the database client cannot be created
pub fn create_transaction_beginner(config: &DatabaseConfig) -> Result<Arc<dyn TransactionBeginner>> {
    tracing::info!("Creating PostgreSQL client");
    let client = PostgreSQLClient::new(config.clone())?;
    tracing::debug!(target = %client.connection_string_safe(), "PostgreSQL pool created");

    Ok(Arc::new(client) as Arc<dyn TransactionBeginner>)
}
