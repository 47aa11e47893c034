//! Query vocabulary - tables, filters, plans and the `{data, error}` shape.
//!
//! Pure types with no I/O. The application layer's client turns these plans
//! into document-store calls.

mod document;
mod filter;
mod plan;
mod response;
mod table;

pub use document::{
    merge_fields, scalar_text, to_document, Document, StoredDocument, CREATED_AT_FIELD, ID_FIELD,
    UPDATED_AT_FIELD,
};
pub use filter::{Filter, FilterOp};
pub use plan::{
    plan_listener, plan_lookup, resolve_table, ListenerPlan, LookupPlan, Projection,
    ResolvedLookup,
};
pub use response::{QueryError, QueryErrorCode, QueryResponse};
pub use table::{Column, Table};
