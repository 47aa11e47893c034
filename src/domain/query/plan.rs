//! Translation of relational query shapes into document-store access plans.
//!
//! Two lookup shapes exist: by primary key (direct document get) and by one
//! secondary field (field query, first match wins). Everything else resolves
//! to the not-implemented sentinel.

use serde_json::Value;

use super::{scalar_text, Column, Document, Filter, FilterOp, QueryError, Table};

/// How a filtered read or write reaches its document.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupPlan {
    ByPrimaryKey { id: String },
    BySecondaryField { column: Column, value: Value },
}

/// A table plus the plan for reaching one of its documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLookup {
    pub table: Table,
    pub plan: LookupPlan,
}

/// What a realtime listener attaches to.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerPlan {
    /// Every change in the table.
    Table,
    /// Changes to a single document.
    Document { id: String },
    /// Changes to documents whose field equals the value.
    Field { column: Column, value: Value },
}

/// Resolves a table name to a supported table.
pub fn resolve_table(table: &str) -> Result<Table, QueryError> {
    Table::parse(table).ok_or_else(|| QueryError::not_implemented(format!("table '{table}'")))
}

/// Plans a single-document lookup from the filters of a query.
///
/// # Errors
///
/// Not-implemented when the table is unknown, when there is not exactly one
/// filter, or when the filter column or value cannot be translated.
pub fn plan_lookup(table: &str, filters: &[Filter]) -> Result<ResolvedLookup, QueryError> {
    let table = resolve_table(table)?;
    let filter = match filters {
        [single] => single,
        [] => {
            return Err(QueryError::not_implemented(format!(
                "unfiltered query on '{table}'"
            )))
        }
        _ => {
            return Err(QueryError::not_implemented(format!(
                "{} filters on '{table}'",
                filters.len()
            )))
        }
    };

    let plan = match plan_filter(filter)? {
        (Column::Id, value) => LookupPlan::ByPrimaryKey {
            id: primary_key_text(&value)?,
        },
        (column, value) => LookupPlan::BySecondaryField { column, value },
    };
    Ok(ResolvedLookup { table, plan })
}

/// Plans a realtime listener from an optional filter.
pub fn plan_listener(table: &str, filter: Option<&Filter>) -> Result<(Table, ListenerPlan), QueryError> {
    let table = resolve_table(table)?;
    let plan = match filter {
        None => ListenerPlan::Table,
        Some(filter) => match plan_filter(filter)? {
            (Column::Id, value) => ListenerPlan::Document {
                id: primary_key_text(&value)?,
            },
            (column, value) => ListenerPlan::Field { column, value },
        },
    };
    Ok((table, plan))
}

impl ListenerPlan {
    /// Whether a changed record falls under this listener.
    pub fn matches(&self, id: &str, record: &Document) -> bool {
        match self {
            ListenerPlan::Table => true,
            ListenerPlan::Document { id: wanted } => wanted == id,
            ListenerPlan::Field { column, value } => {
                Filter::eq(column.name(), value.clone()).matches(record)
            }
        }
    }
}

fn plan_filter(filter: &Filter) -> Result<(Column, Value), QueryError> {
    let FilterOp::Eq = filter.op;
    let column = Column::parse(&filter.column)
        .ok_or_else(|| QueryError::not_implemented(format!("column '{}'", filter.column)))?;
    Ok((column, filter.value.clone()))
}

fn primary_key_text(value: &Value) -> Result<String, QueryError> {
    scalar_text(value)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| QueryError::not_implemented(format!("primary key value {value}")))
}

/// Column projection requested by `select(cols)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<String>),
}

impl Projection {
    /// Parses `*` or a comma separated column list.
    pub fn parse(columns: &str) -> Self {
        let columns: Vec<String> = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        if columns.is_empty() || columns.iter().any(|c| c == "*") {
            Projection::All
        } else {
            Projection::Columns(columns)
        }
    }

    /// Keeps only the projected columns of a record.
    pub fn apply(&self, record: Document) -> Document {
        match self {
            Projection::All => record,
            Projection::Columns(columns) => record
                .into_iter()
                .filter(|(key, _)| columns.iter().any(|c| c == key))
                .collect(),
        }
    }
}
