//! Record operations for the InMemory store

use tracing::trace;

use super::InMemory;
use crate::{
    Result,
    backend::{
        BackendError, Fields, Record, RecordId, RecordQuery, database::check_unique,
        validate_fields,
    },
};

pub(crate) async fn read_all(
    backend: &InMemory,
    table: &str,
    query: &RecordQuery,
) -> Result<Vec<Record>> {
    let tables = backend.tables.read().await;
    let Some(data) = tables.get(table) else {
        return Ok(Vec::new());
    };
    let rows = data
        .rows
        .iter()
        .map(|(id, fields)| Record::new(*id, fields.clone()));
    Ok(query.apply(rows))
}

pub(crate) async fn insert(backend: &InMemory, table: &str, fields: Fields) -> Result<RecordId> {
    validate_fields(table, &fields)?;
    let unique = unique_fields(backend, table).await;

    let mut tables = backend.tables.write().await;
    let data = tables.entry(table.to_string()).or_default();
    check_unique(
        table,
        &unique,
        None,
        &fields,
        data.rows.iter().map(|(id, f)| (*id, f)),
    )?;

    data.last_id += 1;
    let id = data.last_id;
    data.rows.insert(id, fields);
    trace!(table, id, "Inserted record");
    Ok(id)
}

pub(crate) async fn update(
    backend: &InMemory,
    table: &str,
    id: RecordId,
    fields: Fields,
) -> Result<()> {
    validate_fields(table, &fields)?;
    let unique = unique_fields(backend, table).await;

    let mut tables = backend.tables.write().await;
    let data = tables
        .get_mut(table)
        .filter(|data| data.rows.contains_key(&id))
        .ok_or_else(|| not_found(table, id))?;
    check_unique(
        table,
        &unique,
        Some(id),
        &fields,
        data.rows.iter().map(|(id, f)| (*id, f)),
    )?;

    let row = data.rows.get_mut(&id).ok_or_else(|| not_found(table, id))?;
    for (key, value) in fields {
        row.insert(key, value);
    }
    trace!(table, id, "Updated record");
    Ok(())
}

pub(crate) async fn delete(backend: &InMemory, table: &str, id: RecordId) -> Result<()> {
    let mut tables = backend.tables.write().await;
    tables
        .get_mut(table)
        .and_then(|data| data.rows.remove(&id))
        .map(|_| trace!(table, id, "Deleted record"))
        .ok_or_else(|| not_found(table, id))
}

async fn unique_fields(backend: &InMemory, table: &str) -> Vec<String> {
    backend
        .unique
        .read()
        .await
        .get(table)
        .cloned()
        .unwrap_or_default()
}

fn not_found(table: &str, id: RecordId) -> crate::Error {
    BackendError::RecordNotFound {
        table: table.to_string(),
        id,
    }
    .into()
}
