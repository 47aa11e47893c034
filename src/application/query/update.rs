//! `from(t).update(patch).eq(c, v)`.
//!
//! By primary key the patch is merged straight into the document and the
//! result is read back. By secondary column the owning document is found
//! first and the patch merged into it by id; the returned row is that read
//! snapshot with the patch applied, not a fresh read. Nothing ties the read
//! to the write, so a concurrent writer's change can be missing from the
//! returned row even though the store holds it.

use futures::future::BoxFuture;
use serde_json::Value;
use std::future::IntoFuture;
use tracing::debug;

use crate::application::client::CompatClient;
use crate::domain::query::{
    merge_fields, plan_lookup, Document, Filter, LookupPlan, Projection, QueryError,
    QueryResponse, StoredDocument, ID_FIELD, UPDATED_AT_FIELD,
};

use super::{find_owner, store_error, validate_payload};

/// Partial update of one row.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    client: CompatClient,
    table: String,
    patch: Result<Document, QueryError>,
    filters: Vec<Filter>,
    projection: Projection,
}

impl UpdateQuery {
    pub(crate) fn new(
        client: CompatClient,
        table: String,
        patch: Result<Document, QueryError>,
    ) -> Self {
        Self {
            client,
            table,
            patch,
            filters: Vec::new(),
            projection: Projection::All,
        }
    }

    /// Adds an equality filter.
    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Adds a prebuilt filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Projects the returned row.
    pub fn select(mut self, columns: &str) -> Self {
        self.projection = Projection::parse(columns);
        self
    }

    /// Runs the update and returns the updated row.
    pub async fn execute(self) -> QueryResponse<Document> {
        let projection = self.projection.clone();
        self.run()
            .await
            .map(|record| Some(projection.apply(record)))
            .into()
    }

    async fn run(self) -> Result<Document, QueryError> {
        let mut patch = self.patch?;
        let resolved = plan_lookup(&self.table, &self.filters)?;
        let table = resolved.table;
        let collection = table.collection();

        // The key is addressed by the filter, never rewritten by the patch.
        patch.remove(ID_FIELD);
        validate_payload(table, &patch)?;
        patch.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(self.client.now().to_rfc3339()),
        );

        let store = self.client.store();
        debug!(table = %table, plan = ?resolved.plan, fields = patch.len(), "update");

        match resolved.plan {
            LookupPlan::ByPrimaryKey { id } => {
                store
                    .merge(collection, &id, patch)
                    .await
                    .map_err(store_error)?;
                let data = store
                    .get(collection, &id)
                    .await
                    .map_err(store_error)?
                    .ok_or_else(|| {
                        QueryError::not_found(format!("row '{id}' vanished after update"))
                    })?;
                Ok(StoredDocument::new(id, data).into_record())
            }
            LookupPlan::BySecondaryField { column, value } => {
                let Some(found) = find_owner(store, table, column, &value).await? else {
                    return Err(QueryError::not_found(format!(
                        "no rows in '{table}' where {column} = {value}"
                    )));
                };
                store
                    .merge(collection, &found.id, patch.clone())
                    .await
                    .map_err(store_error)?;

                let mut snapshot = found.data;
                merge_fields(&mut snapshot, &patch);
                Ok(StoredDocument::new(found.id, snapshot).into_record())
            }
        }
    }
}

impl IntoFuture for UpdateQuery {
    type Output = QueryResponse<Document>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}
