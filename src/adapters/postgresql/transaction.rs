//! PostgreSQL phase transaction

use crate::adapters::database::traits::Transaction;
use crate::domain::{Result, ShiftSyncError};
use async_trait::async_trait;
use deadpool_postgres::Object;

/// Terminal statement of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Commit,
    Rollback,
}

impl Finish {
    fn statement(self) -> &'static str {
        match self {
            Finish::Commit => "COMMIT",
            Finish::Rollback => "ROLLBACK",
        }
    }

    /// Whether the connection is still held after the statement fails
    ///
    /// A failed COMMIT leaves the transaction open so a ROLLBACK can follow.
    /// A failed ROLLBACK leaves the session in an unknown state.
    fn retains_connection_on_failure(self) -> bool {
        matches!(self, Finish::Commit)
    }
}

/// A transaction holding its pooled connection until it finishes
///
/// The connection returns to the pool only after a successful COMMIT or
/// ROLLBACK. Dropping an unfinished transaction, or a failed ROLLBACK,
/// detaches the connection from the pool and closes it, which makes the
/// server abort the open transaction.
pub struct PostgreSQLTransaction {
    conn: Option<Object>,
}

impl PostgreSQLTransaction {
    pub(crate) fn new(conn: Object) -> Self {
        Self { conn: Some(conn) }
    }

    async fn finish(&mut self, finish: Finish) -> Result<()> {
        let statement = finish.statement();
        let conn = self.conn.as_ref().ok_or_else(|| {
            ShiftSyncError::Database("transaction already finished".to_string())
        })?;

        let executed = conn.batch_execute(statement).await;
        match executed {
            Ok(()) => {
                // Back to the pool
                self.conn = None;
                Ok(())
            }
            Err(e) => {
                if !finish.retains_connection_on_failure() {
                    self.detach();
                }
                Err(ShiftSyncError::Database(format!(
                    "{} failed: {}",
                    statement, e
                )))
            }
        }
    }

    fn detach(&mut self) {
        if let Some(conn) = self.conn.take() {
            drop(Object::take(conn));
        }
    }
}

#[async_trait]
impl Transaction for PostgreSQLTransaction {
    async fn commit(&mut self) -> Result<()> {
        self.finish(Finish::Commit).await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.finish(Finish::Rollback).await
    }
}

impl Drop for PostgreSQLTransaction {
    fn drop(&mut self) {
        if self.conn.is_some() {
            tracing::warn!("Transaction dropped without commit or rollback, closing connection");
            self.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_commit_keeps_connection_for_rollback() {
        assert_eq!(Finish::Commit.statement(), "COMMIT");
        assert!(Finish::Commit.retains_connection_on_failure());
    }

    #[test]
    fn test_failed_rollback_detaches_connection() {
        assert_eq!(Finish::Rollback.statement(), "ROLLBACK");
        assert!(!Finish::Rollback.retains_connection_on_failure());
    }
}
