//! `from(t).insert(row).select(cols).single()` and `.execute()`.

use futures::future::BoxFuture;
use serde_json::Value;
use std::future::IntoFuture;
use tracing::debug;
use uuid::Uuid;

use crate::application::client::CompatClient;
use crate::domain::query::{
    resolve_table, scalar_text, Document, Projection, QueryError, QueryResponse, StoredDocument,
    CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};

use super::{store_error, validate_payload};

/// Creation of one row.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    client: CompatClient,
    table: String,
    row: Result<Document, QueryError>,
    returning: Option<Projection>,
}

impl InsertQuery {
    pub(crate) fn new(client: CompatClient, table: String, row: Result<Document, QueryError>) -> Self {
        Self {
            client,
            table,
            row,
            returning: None,
        }
    }

    /// Asks for the created row back.
    pub fn select(mut self, columns: &str) -> Self {
        self.returning = Some(Projection::parse(columns));
        self
    }

    /// Runs the insert and returns the created row.
    pub async fn single(mut self) -> QueryResponse<Document> {
        let projection = self.returning.take().unwrap_or_default();
        self.run()
            .await
            .map(|record| Some(projection.apply(record)))
            .into()
    }

    /// Runs the insert. The row is returned only when `select` was called.
    pub async fn execute(mut self) -> QueryResponse<Document> {
        let returning = self.returning.take();
        self.run()
            .await
            .map(|record| returning.map(|projection| projection.apply(record)))
            .into()
    }

    async fn run(self) -> Result<Document, QueryError> {
        let mut row = self.row?;
        let table = resolve_table(&self.table)?;

        let id = match row.remove(ID_FIELD) {
            None | Some(Value::Null) => Uuid::new_v4().to_string(),
            Some(value) => scalar_text(&value)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    QueryError::invalid_payload(format!("id must be a non-empty scalar, got {value}"))
                        .with_details(ID_FIELD)
                })?,
        };
        validate_payload(table, &row)?;

        let stamp = Value::String(self.client.now().to_rfc3339());
        row.insert(CREATED_AT_FIELD.to_string(), stamp.clone());
        row.insert(UPDATED_AT_FIELD.to_string(), stamp);

        debug!(table = %table, id = %id, "insert");
        self.client
            .store()
            .create(table.collection(), &id, row.clone())
            .await
            .map_err(store_error)?;

        Ok(StoredDocument::new(id, row).into_record())
    }
}

impl IntoFuture for InsertQuery {
    type Output = QueryResponse<Document>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}
