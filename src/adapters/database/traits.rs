//! Database abstraction traits
//!
//! This module defines the transaction boundary the orchestrator runs its
//! phases against. Adapters implement [`TransactionBeginner`]; tests supply
//! recording mocks.

use crate::config::DatabaseConfig;
use crate::core::context::RunContext;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction isolation level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// SQL keyword form, as used in `START TRANSACTION ISOLATION LEVEL ...`
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsolationLevel::ReadCommitted => write!(f, "read_committed"),
            IsolationLevel::RepeatableRead => write!(f, "repeatable_read"),
            IsolationLevel::Serializable => write!(f, "serializable"),
        }
    }
}

impl FromStr for IsolationLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "read_committed" => Ok(IsolationLevel::ReadCommitted),
            "repeatable_read" => Ok(IsolationLevel::RepeatableRead),
            "serializable" => Ok(IsolationLevel::Serializable),
            _ => Err(format!(
                "Invalid isolation level: '{s}'. Must be 'read_committed', 'repeatable_read' or 'serializable'"
            )),
        }
    }
}

/// Options used when beginning a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionOptions {
    pub isolation: IsolationLevel,
    pub read_only: bool,
}

impl TransactionOptions {
    /// READ COMMITTED, read-write: what every phase transaction uses
    pub fn read_committed() -> Self {
        Self::read_write(IsolationLevel::ReadCommitted)
    }

    pub fn read_write(isolation: IsolationLevel) -> Self {
        Self {
            isolation,
            read_only: false,
        }
    }
}

impl From<&DatabaseConfig> for TransactionOptions {
    fn from(config: &DatabaseConfig) -> Self {
        Self::read_write(config.isolation_level)
    }
}

/// An open database transaction
///
/// Exactly one of `commit` or `rollback` is expected to be called; the
/// transaction manager may additionally attempt a rollback after a failed
/// commit.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the database rejects the commit.
    async fn commit(&mut self) -> Result<()>;

    /// Roll the transaction back
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback cannot be executed.
    async fn rollback(&mut self) -> Result<()>;
}

/// Source of new transactions
#[async_trait]
pub trait TransactionBeginner: Send + Sync {
    /// Begin a transaction with the given options
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the database
    /// refuses to start the transaction.
    async fn begin(
        &self,
        ctx: &RunContext,
        options: TransactionOptions,
    ) -> Result<Box<dyn Transaction>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolation_sql() {
        assert_eq!(IsolationLevel::ReadCommitted.as_sql(), "READ COMMITTED");
        assert_eq!(IsolationLevel::default(), IsolationLevel::ReadCommitted);
    }

    #[test]
    fn test_options_follow_database_config() {
        let mut config = DatabaseConfig::new(crate::config::secret_string(
            "postgresql://localhost/shiftsync".to_string(),
        ));
        assert_eq!(
            TransactionOptions::from(&config),
            TransactionOptions::read_committed()
        );

        config.isolation_level = IsolationLevel::RepeatableRead;
        let options = TransactionOptions::from(&config);
        assert_eq!(options.isolation, IsolationLevel::RepeatableRead);
        assert!(!options.read_only);
    }

    #[test]
    fn test_isolation_parse() {
        assert_eq!(
            "READ COMMITTED".parse::<IsolationLevel>().unwrap(),
            IsolationLevel::ReadCommitted
        );
        assert_eq!(
            "serializable".parse::<IsolationLevel>().unwrap(),
            IsolationLevel::Serializable
        );
        assert!("snapshot".parse::<IsolationLevel>().is_err());
    }

    #[test]
    fn test_read_committed_options() {
        let options = TransactionOptions::read_committed();
        assert_eq!(options.isolation, IsolationLevel::ReadCommitted);
        assert!(!options.read_only);
    }
}
