//! Pooled Postgres Executor
//!
//! The single place where composed statements meet the connection pool. Every
//! statement issued here is one parameterized read; acquisition and release
//! are scoped inside sqlx, so a failed query cannot leak a connection. No
//! writes, no multi-statement transactions.

use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};

use crate::config::Config;

/// A value destined for a `$n` placeholder.
///
/// Order within a parameter slice is placeholder order; callers must never
/// reorder it independently of the condition list that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Text(String),
}

/// Create the process-wide pool. Called once at startup.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.pool_max)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.database_url)
        .await
}

/// Run one parameterized statement and collect every row as `T`.
pub async fn fetch_all_as<T>(
    pool: &PgPool,
    sql: &str,
    params: &[SqlParam],
) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<_, T>(sql);
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::BigInt(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
        };
    }
    query.fetch_all(pool).await
}

/// Run one parameterized statement expecting at most one row.
pub async fn fetch_optional_as<T>(
    pool: &PgPool,
    sql: &str,
    params: &[SqlParam],
) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<_, T>(sql);
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::BigInt(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
        };
    }
    query.fetch_optional(pool).await
}
