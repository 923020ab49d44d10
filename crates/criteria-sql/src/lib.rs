pub mod error;
pub mod query;

pub use error::TranslateError;
pub use query::{
    dialect::{Dialect, MySql, Postgres, Sqlite},
    renderer::Renderer,
    resolver::{ColumnResolver, EntityMetadata, MetadataResolver, ResolveError},
    settings::{DialectKind, TranslatorSettings},
    where_clause::{WhereClause, WhereTranslator, translate_criteria},
};
