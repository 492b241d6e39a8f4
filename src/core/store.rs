// exchange log - append-only table of (query, casual, formal) per user
// supports postgres, sqlite, and mysql

use crate::Error;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{AnyPool, Row, any::AnyPoolOptions};
use uuid::Uuid;

// user ids are unbounded and compared byte for byte on every backend
const SCHEMA: &str = r#"CREATE TABLE IF NOT EXISTS conversation_history (
    id VARCHAR(36) PRIMARY KEY,
    user_id TEXT NOT NULL,
    query TEXT NOT NULL,
    casual_response TEXT NOT NULL,
    formal_response TEXT NOT NULL,
    created_at BIGINT NOT NULL
)"#;

// mysql's default collation folds case, so pin the text columns to a binary one
const MYSQL_SCHEMA: &str = r#"CREATE TABLE IF NOT EXISTS conversation_history (
    id VARCHAR(36) PRIMARY KEY,
    user_id TEXT CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
    query TEXT CHARACTER SET utf8mb4 NOT NULL,
    casual_response TEXT CHARACTER SET utf8mb4 NOT NULL,
    formal_response TEXT CHARACTER SET utf8mb4 NOT NULL,
    created_at BIGINT NOT NULL
)"#;

/// One stored exchange. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: Uuid,
    pub user_id: String,
    pub query: String,
    pub casual_response: String,
    pub formal_response: String,
    pub created_at: DateTime<Utc>,
}

pub struct Store {
    pool: AnyPool,
    dialect: Dialect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Postgres,
    Sqlite,
    Mysql,
}

impl Store {
    /// Open a pool and create the table if it doesn't exist yet.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        sqlx::any::install_default_drivers();

        let dialect = detect_dialect(url);

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        sqlx::query(dialect.schema()).execute(&pool).await?;

        tracing::info!(dialect = dialect.name(), "exchange store ready");

        Ok(Self { pool, dialect })
    }

    /// Write one exchange; `created_at` is stamped here.
    pub async fn insert(
        &self,
        id: Uuid,
        user_id: &str,
        query: &str,
        casual_response: &str,
        formal_response: &str,
    ) -> Result<Exchange, Error> {
        // stored as microseconds
        let created_at = Utc::now().trunc_subsecs(6);

        // rolled back on drop unless committed
        let mut tx = self.pool.begin().await.map_err(Error::store("insert"))?;

        let sql = self.sql(
            "INSERT INTO conversation_history \
             (id, user_id, query, casual_response, formal_response, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        );
        sqlx::query(&sql)
            .bind(id.to_string())
            .bind(user_id)
            .bind(query)
            .bind(casual_response)
            .bind(formal_response)
            .bind(created_at.timestamp_micros())
            .execute(&mut *tx)
            .await
            .map_err(Error::store("insert"))?;

        tx.commit().await.map_err(Error::store("insert"))?;

        tracing::info!(user_id, %id, "inserted exchange");

        Ok(Exchange {
            id,
            user_id: user_id.to_string(),
            query: query.to_string(),
            casual_response: casual_response.to_string(),
            formal_response: formal_response.to_string(),
            created_at,
        })
    }

    /// Newest first, `limit` rows after skipping `offset`. Rows sharing a
    /// timestamp are ordered by id so pages never overlap.
    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Exchange>, Error> {
        let sql = self.sql(
            "SELECT id, user_id, query, casual_response, formal_response, created_at \
             FROM conversation_history \
             WHERE user_id = ? \
             ORDER BY created_at DESC, id DESC \
             LIMIT ? OFFSET ?",
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::store("read history"))?;

        let history = rows
            .iter()
            .map(exchange_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(user_id, count = history.len(), "retrieved history");
        Ok(history)
    }

    /// Every user id with at least one exchange, sorted.
    pub async fn list_user_ids(&self) -> Result<Vec<String>, Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT user_id FROM conversation_history ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::store("read user ids"))?;

        let user_ids: Vec<String> = rows.into_iter().map(|(id,)| id).collect();

        tracing::info!(count = user_ids.len(), "retrieved user ids");
        Ok(user_ids)
    }

    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    // queries are written with `?`; postgres wants `$1, $2, ...`
    fn sql(&self, query: &str) -> String {
        match self.dialect {
            Dialect::Postgres => numbered_placeholders(query),
            Dialect::Sqlite | Dialect::Mysql => query.to_string(),
        }
    }
}

impl Dialect {
    fn schema(self) -> &'static str {
        match self {
            Dialect::Mysql => MYSQL_SCHEMA,
            Dialect::Postgres | Dialect::Sqlite => SCHEMA,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
        }
    }
}

// figure out dialect from connection string
fn detect_dialect(url: &str) -> Dialect {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Dialect::Postgres
    } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        Dialect::Mysql
    } else {
        Dialect::Sqlite
    }
}

fn numbered_placeholders(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 8);
    let mut n = 0;
    for c in query.chars() {
        if c == '?' {
            n += 1;
            out.push_str(&format!("${n}"));
        } else {
            out.push(c);
        }
    }
    out
}

fn exchange_from_row(row: &sqlx::any::AnyRow) -> Result<Exchange, Error> {
    let id: String = column(row, "id")?;
    let created_at: i64 = column(row, "created_at")?;

    let id = Uuid::parse_str(&id).map_err(|e| Error::InvalidRecord(format!("id {id}: {e}")))?;
    let created_at = DateTime::from_timestamp_micros(created_at)
        .ok_or_else(|| Error::InvalidRecord(format!("created_at {created_at} out of range")))?;

    Ok(Exchange {
        id,
        user_id: column(row, "user_id")?,
        query: column(row, "query")?,
        casual_response: column(row, "casual_response")?,
        formal_response: column(row, "formal_response")?,
        created_at,
    })
}

fn column<'r, T>(row: &'r sqlx::any::AnyRow, name: &str) -> Result<T, Error>
where
    T: sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    row.try_get(name).map_err(Error::store("read history"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_placeholders_are_numbered() {
        assert_eq!(
            numbered_placeholders("WHERE user_id = ? LIMIT ? OFFSET ?"),
            "WHERE user_id = $1 LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn dialect_from_url() {
        assert_eq!(detect_dialect("postgresql://u:p@h/db"), Dialect::Postgres);
        assert_eq!(detect_dialect("mariadb://u:p@h/db"), Dialect::Mysql);
        assert_eq!(detect_dialect("sqlite://history.db"), Dialect::Sqlite);
    }

    #[test]
    fn user_id_column_is_unbounded_and_case_sensitive() {
        for dialect in [Dialect::Postgres, Dialect::Sqlite, Dialect::Mysql] {
            assert!(dialect.schema().contains("user_id TEXT"));
            assert!(!dialect.schema().contains("VARCHAR(255)"));
        }
        assert!(
            Dialect::Mysql
                .schema()
                .contains("user_id TEXT CHARACTER SET utf8mb4 COLLATE utf8mb4_bin")
        );
    }
}
