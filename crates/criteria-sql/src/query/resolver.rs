//! Mapping of logical field names to physical, quoted column names.

use crate::query::dialect::Dialect;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The entity has no mapping for the requested field.
    #[error("Unknown field `{field}` on entity `{entity}`")]
    UnknownField { entity: String, field: String },

    #[error("Column resolution failed: {0}")]
    Other(String),
}

/// Resolves a logical field name to the column reference used in SQL.
///
/// The returned name is already quoted as needed; the translator prefixes
/// it with the table alias and does nothing else with it.
pub trait ColumnResolver: Send + Sync {
    fn resolve(&self, field: &str) -> Result<String, ResolveError>;
}

impl<F> ColumnResolver for F
where
    F: Fn(&str) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, field: &str) -> Result<String, ResolveError> {
        self(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub column: String,
    /// Whether the column must always be quoted (e.g. reserved words).
    pub quoted: bool,
}

/// Field-to-column mapping of one entity.
#[derive(Debug, Clone, Default)]
pub struct EntityMetadata {
    pub name: String,
    pub fields: HashMap<String, FieldMapping>,
}

impl EntityMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    pub fn field(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.fields.insert(
            field.into(),
            FieldMapping {
                column: column.into(),
                quoted: false,
            },
        );
        self
    }

    pub fn quoted_field(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.fields.insert(
            field.into(),
            FieldMapping {
                column: column.into(),
                quoted: true,
            },
        );
        self
    }

    pub fn mapping(&self, field: &str) -> Option<&FieldMapping> {
        self.fields.get(field)
    }
}

/// Resolves fields through [`EntityMetadata`], quoting flagged columns with
/// the dialect's identifier quoting.
pub struct MetadataResolver<'a> {
    metadata: &'a EntityMetadata,
    dialect: &'a dyn Dialect,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(metadata: &'a EntityMetadata, dialect: &'a dyn Dialect) -> Self {
        Self { metadata, dialect }
    }
}

impl ColumnResolver for MetadataResolver<'_> {
    fn resolve(&self, field: &str) -> Result<String, ResolveError> {
        let mapping = self
            .metadata
            .mapping(field)
            .ok_or_else(|| ResolveError::UnknownField {
                entity: self.metadata.name.clone(),
                field: field.to_string(),
            })?;

        if mapping.quoted {
            Ok(self.dialect.quote_identifier(&mapping.column))
        } else {
            Ok(mapping.column.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dialect::{MySql, Postgres};

    fn user_metadata() -> EntityMetadata {
        EntityMetadata::new("User")
            .field("name", "name")
            .field("createdAt", "created_at")
            .quoted_field("order", "order")
    }

    #[test]
    fn test_resolve_plain_and_quoted() {
        let meta = user_metadata();

        let pg = MetadataResolver::new(&meta, &Postgres);
        assert_eq!(pg.resolve("createdAt").unwrap(), "created_at");
        assert_eq!(pg.resolve("order").unwrap(), r#""order""#);

        let my = MetadataResolver::new(&meta, &MySql);
        assert_eq!(my.resolve("order").unwrap(), "`order`");
    }

    #[test]
    fn test_resolve_unknown_field() {
        let meta = user_metadata();
        let resolver = MetadataResolver::new(&meta, &Postgres);

        assert_eq!(
            resolver.resolve("email"),
            Err(ResolveError::UnknownField {
                entity: "User".into(),
                field: "email".into(),
            })
        );
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |field: &str| Ok::<_, ResolveError>(field.to_uppercase());
        assert_eq!(resolver.resolve("id").unwrap(), "ID");
    }
}
