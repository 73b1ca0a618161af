//! Check-db command implementation
//!
//! Opens a phase-style transaction against the configured database and
//! rolls it back, proving the pool, credentials and isolation level work.

use crate::adapters::database::{Transaction, TransactionBeginner, TransactionOptions};
use crate::adapters::postgresql::PostgreSQLClient;
use crate::config::load_config;
use crate::core::context::RunContext;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the check-db command
#[derive(Args, Debug)]
pub struct CheckDbArgs {}

impl CheckDbArgs {
    /// Execute the check-db command
    pub async fn execute(&self, config_path: &str, ctx: RunContext) -> anyhow::Result<i32> {
        tracing::info!("Checking database connectivity");

        println!("🔌 Database Check");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {}", e);
                return Ok(2); // Configuration error exit code
            }
        };

        let Some(database) = config.database else {
            println!("❌ No [database] section configured");
            return Ok(2);
        };
        let options = TransactionOptions::from(&database);

        let client = match PostgreSQLClient::new(database) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to create database client");
                println!("   Error: {}", e);
                return Ok(2);
            }
        };
        println!("   Target: {}", client.connection_string_safe());

        if let Err(e) = client.test_connection().await {
            log_error_with_context!(&e, "Database connectivity check failed");
            println!("❌ Failed to connect to database");
            println!("   Error: {}", e);
            return Ok(5);
        }
        println!("✅ Connection established");

        let mut tx = match client.begin(&ctx, options).await {
            Ok(tx) => tx,
            Err(e) => {
                log_error_with_context!(&e, "Check transaction could not be started");
                println!("❌ Failed to begin {} transaction", options.isolation);
                println!("   Error: {}", e);
                return Ok(5);
            }
        };

        if let Err(e) = tx.rollback().await {
            println!("❌ Rollback failed");
            println!("   Error: {}", e);
            return Ok(5);
        }

        println!("✅ {} transaction begun and rolled back", options.isolation);
        let status = client.pool_status();
        println!("   Pool: {} of {} connections open", status.size, status.max_size);
        println!();
        Ok(0)
    }
}
