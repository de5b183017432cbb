//! Database module - MySQL `disaster_data` writer
//!
//! Every save opens its own connection, inserts one row inside a transaction,
//! commits and closes. There is no pool.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

use crate::config::DatabaseConfig;
use crate::models::DisasterRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("insert into disaster_data failed: {0}")]
    Insert(#[source] sqlx::Error),

    #[error("schema setup failed: {0}")]
    Schema(#[source] sqlx::Error),
}

/// Append-only sink for submissions
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn save(&self, record: &DisasterRecord) -> Result<(), StoreError>;
}

pub struct MySqlStore {
    options: MySqlConnectOptions,
}

impl MySqlStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        Self { options }
    }

    async fn connect(&self) -> Result<MySqlConnection, StoreError> {
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(StoreError::Connect)
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn save(&self, record: &DisasterRecord) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        let mut tx = conn.begin().await.map_err(StoreError::Insert)?;
        record.insert(&mut *tx).await.map_err(StoreError::Insert)?;
        tx.commit().await.map_err(StoreError::Insert)?;

        if let Err(e) = conn.close().await {
            tracing::warn!("Error closing database connection: {}", e);
        }

        tracing::info!(disaster_type = record.disaster_type.as_str(), "Submission saved");
        Ok(())
    }
}

/// Create `disaster_data` if it does not exist
pub async fn run_migrations(store: &MySqlStore) -> Result<(), StoreError> {
    let mut conn = store.connect().await?;

    sqlx::query(SCHEMA_SQL)
        .execute(&mut conn)
        .await
        .map_err(StoreError::Schema)?;

    conn.close().await.map_err(StoreError::Schema)?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS disaster_data (
    Rainfall_mm DOUBLE NULL,
    River_Level_m DOUBLE NULL,
    Soil_Moisture DOUBLE NULL,
    Temperature_C DOUBLE NULL,
    Earthquake_Magnitude DOUBLE NULL,
    Earthquake_Depth DOUBLE NULL,
    Phone_Number VARCHAR(15) NULL,
    Disaster_Type VARCHAR(20) NULL
)
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::COLUMNS;

    #[test]
    fn test_schema_has_exactly_the_stored_columns() {
        let body = SCHEMA_SQL.split_once('(').unwrap().1.rsplit_once(')').unwrap().0;
        let names: Vec<&str> = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(names, COLUMNS);
    }
}
