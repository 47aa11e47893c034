//! `from(t).select(cols).eq(c, v).single()` and `.maybe_single()`.

use serde_json::Value;
use tracing::debug;

use crate::application::client::CompatClient;
use crate::domain::query::{
    plan_lookup, Document, Filter, LookupPlan, Projection, QueryError, QueryResponse,
    StoredDocument,
};

use super::{find_owner, store_error};

/// Read of at most one row.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    client: CompatClient,
    table: String,
    projection: Projection,
    filters: Vec<Filter>,
}

impl SelectQuery {
    pub(crate) fn new(client: CompatClient, table: String, columns: &str) -> Self {
        Self {
            client,
            table,
            projection: Projection::parse(columns),
            filters: Vec::new(),
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

    /// Exactly one row: no match is a `PGRST116` error.
    pub async fn single(self) -> QueryResponse<Document> {
        let description = self.describe();
        match self.fetch().await {
            Ok(Some(record)) => QueryResponse::ok(record),
            Ok(None) => QueryResponse::failed(QueryError::not_found(format!(
                "no rows returned for {description}"
            ))),
            Err(error) => QueryResponse::failed(error),
        }
    }

    /// Zero or one row: no match is `{data: null, error: null}`.
    pub async fn maybe_single(self) -> QueryResponse<Document> {
        self.fetch().await.into()
    }

    fn describe(&self) -> String {
        let filters: Vec<String> = self.filters.iter().map(ToString::to_string).collect();
        format!("{} where {}", self.table, filters.join(" and "))
    }

    async fn fetch(self) -> Result<Option<Document>, QueryError> {
        let resolved = plan_lookup(&self.table, &self.filters)?;
        let store = self.client.store();
        let collection = resolved.table.collection();
        debug!(table = %resolved.table, plan = ?resolved.plan, "select");

        let found = match resolved.plan {
            LookupPlan::ByPrimaryKey { id } => store
                .get(collection, &id)
                .await
                .map_err(store_error)?
                .map(|data| StoredDocument::new(id, data)),
            LookupPlan::BySecondaryField { column, value } => {
                find_owner(store, resolved.table, column, &value).await?
            }
        };

        Ok(found.map(|doc| self.projection.apply(doc.into_record())))
    }
}
