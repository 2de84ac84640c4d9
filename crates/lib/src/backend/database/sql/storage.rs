//! Document and record operations for the SQL backend

use serde_json::Value;
use sqlx::{Any, Row, Transaction};
use tracing::trace;

use super::{SqlxBackend, SqlxResultExt};
use crate::{
    Error, Result,
    backend::{
        BackendError, Fields, Record, RecordId, RecordQuery, database::unique_violation,
        validate_fields,
    },
};

fn to_json(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })
}

fn from_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| -> Error { BackendError::DeserializationFailed { source: e }.into() })
}

fn not_found(table: &str, id: RecordId) -> Error {
    BackendError::RecordNotFound {
        table: table.to_string(),
        id,
    }
    .into()
}

pub(crate) async fn read_document(backend: &SqlxBackend, key: &str) -> Result<Option<Value>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT body FROM documents WHERE doc_key = $1")
        .bind(key)
        .fetch_optional(backend.pool())
        .await
        .sql_context("Failed to read document")?;
    row.map(|(body,)| from_json(&body)).transpose()
}

pub(crate) async fn write_document(backend: &SqlxBackend, key: &str, document: &Value) -> Result<()> {
    let body = to_json(document)?;
    sqlx::query(
        "INSERT INTO documents (doc_key, body) VALUES ($1, $2)
         ON CONFLICT (doc_key) DO UPDATE SET body = excluded.body",
    )
    .bind(key)
    .bind(body)
    .execute(backend.pool())
    .await
    .sql_context("Failed to write document")?;
    trace!(key, "Wrote document");
    Ok(())
}

pub(crate) async fn read_all(
    backend: &SqlxBackend,
    table: &str,
    query: &RecordQuery,
) -> Result<Vec<Record>> {
    let rows = sqlx::query("SELECT id, fields_json FROM records WHERE table_name = $1")
        .bind(table)
        .fetch_all(backend.pool())
        .await
        .sql_context("Failed to read records")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i64 = row.try_get(0).sql_context("Failed to decode record id")?;
        let text: String = row.try_get(1).sql_context("Failed to decode record fields")?;
        records.push(Record::new(id, from_json(&text)?));
    }
    Ok(query.apply(records))
}

pub(crate) async fn insert(backend: &SqlxBackend, table: &str, fields: Fields) -> Result<RecordId> {
    validate_fields(table, &fields)?;
    let mut tx = backend.pool().begin().await.sql_context("Failed to begin")?;

    let row = sqlx::query("INSERT INTO records (table_name, fields_json) VALUES ($1, $2) RETURNING id")
        .bind(table)
        .bind(to_json(&fields)?)
        .fetch_one(&mut *tx)
        .await
        .sql_context("Failed to insert record")?;
    let id: i64 = row.try_get(0).sql_context("Failed to decode record id")?;

    claim_unique_values(&mut tx, backend.unique_fields(table), table, id, &fields).await?;

    tx.commit().await.sql_context("Failed to commit insert")?;
    trace!(table, id, "Inserted record");
    Ok(id)
}

pub(crate) async fn update(
    backend: &SqlxBackend,
    table: &str,
    id: RecordId,
    fields: Fields,
) -> Result<()> {
    validate_fields(table, &fields)?;
    let mut tx = backend.pool().begin().await.sql_context("Failed to begin")?;

    let current: Option<(String,)> =
        sqlx::query_as("SELECT fields_json FROM records WHERE table_name = $1 AND id = $2")
            .bind(table)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .sql_context("Failed to read record")?;
    let Some((text,)) = current else {
        return Err(not_found(table, id));
    };

    let mut merged: Fields = from_json(&text)?;
    let unique = backend.unique_fields(table);
    let touched: Vec<String> = unique
        .iter()
        .filter(|field| fields.contains_key(field.as_str()))
        .cloned()
        .collect();
    for field in &touched {
        sqlx::query("DELETE FROM unique_values WHERE table_name = $1 AND field = $2 AND record_id = $3")
            .bind(table)
            .bind(field.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .sql_context("Failed to release unique value")?;
    }
    claim_unique_values(&mut tx, &touched, table, id, &fields).await?;

    for (key, value) in fields {
        merged.insert(key, value);
    }
    sqlx::query("UPDATE records SET fields_json = $1 WHERE table_name = $2 AND id = $3")
        .bind(to_json(&merged)?)
        .bind(table)
        .bind(id)
        .execute(&mut *tx)
        .await
        .sql_context("Failed to update record")?;

    tx.commit().await.sql_context("Failed to commit update")?;
    trace!(table, id, "Updated record");
    Ok(())
}

pub(crate) async fn delete(backend: &SqlxBackend, table: &str, id: RecordId) -> Result<()> {
    let mut tx = backend.pool().begin().await.sql_context("Failed to begin")?;

    let result = sqlx::query("DELETE FROM records WHERE table_name = $1 AND id = $2")
        .bind(table)
        .bind(id)
        .execute(&mut *tx)
        .await
        .sql_context("Failed to delete record")?;
    if result.rows_affected() == 0 {
        return Err(not_found(table, id));
    }
    sqlx::query("DELETE FROM unique_values WHERE table_name = $1 AND record_id = $2")
        .bind(table)
        .bind(id)
        .execute(&mut *tx)
        .await
        .sql_context("Failed to release unique values")?;

    tx.commit().await.sql_context("Failed to commit delete")?;
    trace!(table, id, "Deleted record");
    Ok(())
}

/// Records `fields`' values for each unique field, failing on a value
/// another record already holds.
async fn claim_unique_values(
    tx: &mut Transaction<'_, Any>,
    unique: &[String],
    table: &str,
    id: RecordId,
    fields: &Fields,
) -> Result<()> {
    for field in unique {
        let Some(value) = fields.get(field).filter(|v| !v.is_null()) else {
            continue;
        };
        let value_json = to_json(value)?;
        let holder: Option<(i64,)> = sqlx::query_as(
            "SELECT record_id FROM unique_values
             WHERE table_name = $1 AND field = $2 AND value_json = $3",
        )
        .bind(table)
        .bind(field.as_str())
        .bind(value_json.as_str())
        .fetch_optional(&mut **tx)
        .await
        .sql_context("Failed to check unique value")?;
        if holder.is_some_and(|(holder,)| holder != id) {
            return Err(unique_violation(table, field, value));
        }

        sqlx::query(
            "INSERT INTO unique_values (table_name, field, value_json, record_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (table_name, field, value_json) DO NOTHING",
        )
        .bind(table)
        .bind(field.as_str())
        .bind(value_json.as_str())
        .bind(id)
        .execute(&mut **tx)
        .await
        .sql_context("Failed to claim unique value")?;
    }
    Ok(())
}
