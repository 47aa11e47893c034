//! Fluent query builders.
//!
//! `client.from(table)` yields a [`TableQuery`], which branches into
//! select, update and insert builders. Builders only record what was asked
//! for; planning and validation happen when the query executes, and every
//! failure comes back inside the `{data, error}` envelope.

mod insert;
mod select;
mod update;

pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::query::{to_document, Column, Document, QueryError, StoredDocument, Table};
use crate::ports::{DocumentStore, StoreError};

use super::client::CompatClient;

/// A query rooted at one table, before its verb is chosen.
#[derive(Debug, Clone)]
pub struct TableQuery {
    client: CompatClient,
    table: String,
}

impl TableQuery {
    pub(crate) fn new(client: CompatClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    /// Read with a column projection (`*` or `a,b,c`).
    pub fn select(self, columns: &str) -> SelectQuery {
        SelectQuery::new(self.client, self.table, columns)
    }

    /// Partial update of the row matched by the following filter.
    pub fn update<T: Serialize + ?Sized>(self, patch: &T) -> UpdateQuery {
        UpdateQuery::new(self.client, self.table, to_document(patch))
    }

    /// Full new row.
    pub fn insert<T: Serialize + ?Sized>(self, row: &T) -> InsertQuery {
        InsertQuery::new(self.client, self.table, to_document(row))
    }
}

/// Maps a store failure onto the relational error codes.
pub(crate) fn store_error(err: StoreError) -> QueryError {
    match err {
        StoreError::NotFound { collection, id } => {
            QueryError::not_found(format!("no row in '{collection}' with id '{id}'"))
        }
        StoreError::AlreadyExists { collection, id } => {
            QueryError::conflict(format!("duplicate key: '{collection}' already has id '{id}'"))
        }
        other => QueryError::backend(other.to_string()),
    }
}

/// First document whose secondary column equals `value`, in id order.
///
/// Uniqueness of secondary columns is not enforced by the store. A second
/// match is logged and ignored.
pub(crate) async fn find_owner(
    store: &dyn DocumentStore,
    table: Table,
    column: Column,
    value: &Value,
) -> Result<Option<StoredDocument>, QueryError> {
    let mut matches = store
        .find_by_field(table.collection(), column.name(), value, Some(2))
        .await
        .map_err(store_error)?;

    if matches.len() > 1 {
        warn!(
            table = %table,
            column = %column,
            value = %value,
            kept = %matches[0].id,
            ignored = %matches[1].id,
            "Multiple rows match a unique column; using the first by id"
        );
    }
    matches.truncate(1);
    Ok(matches.pop())
}

/// Validates a write payload against the table's typed fields.
pub(crate) fn validate_payload(table: Table, fields: &Document) -> Result<(), QueryError> {
    table.validate_fields(fields).map_err(QueryError::from)
}
