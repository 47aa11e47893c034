//! Typed equality filters.
//!
//! Callers build filters directly with [`Filter::eq`]. The legacy
//! `column=eq.value` text grammar is still accepted through
//! [`Filter::parse`] for realtime subscriptions written against it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{scalar_text, Document, QueryError};

/// Comparison operator. Only equality is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
        }
    }
}

/// A single `column op value` clause.
///
/// The column stays a plain string so that an unsupported column surfaces as
/// a not-implemented response at execution time rather than at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    /// Parses `column=op.value`.
    ///
    /// # Errors
    ///
    /// Any operator other than `eq`, an empty column or an empty value yields
    /// a not-implemented error.
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        let unsupported = || QueryError::not_implemented(format!("filter expression '{expr}'"));

        let (column, rest) = expr.split_once('=').ok_or_else(unsupported)?;
        let (op, value) = rest.split_once('.').ok_or_else(unsupported)?;
        let column = column.trim();

        if column.is_empty() || value.is_empty() {
            return Err(unsupported());
        }
        match op {
            "eq" => Ok(Filter::eq(column, value)),
            _ => Err(unsupported()),
        }
    }

    /// Whether a returned record satisfies the clause.
    ///
    /// Text filter values also match numbers and booleans with the same text
    /// form, since parsed filters always carry text.
    pub fn matches(&self, record: &Document) -> bool {
        let Some(actual) = record.get(&self.column) else {
            return false;
        };
        if actual == &self.value {
            return true;
        }
        match (&self.value, scalar_text(actual)) {
            (Value::String(expected), Some(actual)) => expected == &actual,
            _ => false,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = scalar_text(&self.value).unwrap_or_else(|| self.value.to_string());
        write!(f, "{}={}.{}", self.column, self.op.as_str(), value)
    }
}
