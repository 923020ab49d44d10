use crate::core::value::Value;
use std::{fmt, sync::Arc};
use thiserror::Error;

/// Capability of entity-like values that are represented in a query by a
/// single scalar, typically their primary key.
pub trait HasIdentity: fmt::Debug + Send + Sync {
    fn identity(&self) -> Result<Value, IdentityError>;
}

/// Shared handle to an entity used as a filter value.
pub type EntityRef = Arc<dyn HasIdentity>;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The entity has not been assigned an identity yet.
    #[error("Entity `{0}` is not persisted and has no identity")]
    NotPersisted(String),

    /// The identity accessor failed for any other reason.
    #[error("Identity error: {0}")]
    Other(String),
}
