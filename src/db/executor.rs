use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row as _, TypeInfo};
use tracing::{debug, instrument, warn};

use super::query::Select;
use super::row::{Row, Value};
use super::sql::render_select;
use crate::shared::AppError;

/// Runs typed [`Select`] descriptions against a data store
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, AppError>;

    /// Returns at most one row
    async fn select_one(&self, query: &Select) -> Result<Option<Row>, AppError> {
        let mut query = query.clone();
        query.limit = Some(1);
        Ok(self.select(&query).await?.into_iter().next())
    }
}

/// PostgreSQL implementation of the query executor
pub struct PostgresExecutor {
    pool: PgPool,
}

impl PostgresExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    #[instrument(skip(self, query), fields(table = query.from.name))]
    async fn select(&self, query: &Select) -> Result<Vec<Row>, AppError> {
        let mut builder = render_select(query);
        debug!(sql = %builder.sql(), "Executing select against database");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to execute select against database");
                AppError::DatabaseError(e.to_string())
            })?;

        debug!(row_count = rows.len(), "Select returned rows");
        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &PgRow) -> Result<Row, AppError> {
    let mut decoded = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())
            .map_err(|e| AppError::DecodeError(format!("{}: {}", column.name(), e)))?;
        decoded.insert(column.name(), value);
    }
    Ok(decoded)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(|v| Value::Int(v as i64)),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(|v| Value::Int(v as i64)),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::Int),
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(index)?.map(Value::Text)
        }
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(Value::Timestamp),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|v| Value::Timestamp(v.and_utc())),
        other => {
            return Err(sqlx::Error::Decode(
                format!("unsupported column type {}", other).into(),
            ))
        }
    };
    Ok(value.unwrap_or(Value::Null))
}
