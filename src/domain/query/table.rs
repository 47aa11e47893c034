//! Tables and columns recognized by the query adapter.

use std::fmt;

use crate::domain::foundation::ValidationError;
use crate::domain::profile;

use super::Document;

/// Relational table names the adapter knows how to translate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Profiles,
}

impl Table {
    /// Resolves a table name; `None` for anything outside the supported set.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "profiles" => Some(Table::Profiles),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
        }
    }

    /// Backing collection holding this table's documents.
    pub fn collection(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
        }
    }

    /// Typed validation of a write payload before it reaches storage.
    pub fn validate_fields(&self, fields: &Document) -> Result<(), ValidationError> {
        match self {
            Table::Profiles => profile::validate_profile_fields(fields),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Columns usable in `eq` filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Primary key (document id).
    Id,
    /// Owner of the profile; assumed unique.
    UserId,
    /// Public slug; assumed unique once set.
    Handle,
}

impl Column {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Column::Id),
            "user_id" => Some(Column::UserId),
            "handle" => Some(Column::Handle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::UserId => "user_id",
            Column::Handle => "handle",
        }
    }

    pub fn is_primary_key(&self) -> bool {
        matches!(self, Column::Id)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_profiles_is_recognized() {
        assert_eq!(Table::parse("profiles"), Some(Table::Profiles));
        assert_eq!(Table::parse("bookings"), None);
        assert_eq!(Table::parse("Profiles"), None);
    }

    #[test]
    fn columns_resolve() {
        assert_eq!(Column::parse("id"), Some(Column::Id));
        assert_eq!(Column::parse("user_id"), Some(Column::UserId));
        assert_eq!(Column::parse("handle"), Some(Column::Handle));
        assert_eq!(Column::parse("email"), None);
        assert!(Column::Id.is_primary_key());
        assert!(!Column::Handle.is_primary_key());
    }
}
