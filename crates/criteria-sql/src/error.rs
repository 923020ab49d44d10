use crate::query::resolver::ResolveError;
use model::criteria::{CompositeKind, IdentityError, Operator};
use thiserror::Error;

/// Errors raised while translating criteria into a WHERE fragment.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The column resolver rejected a field; passed through unchanged.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// An entity value could not produce its identity; passed through unchanged.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A composite without children has no valid SQL rendering.
    #[error("Empty {0} composite")]
    EmptyComposite(CompositeKind),

    /// `IN ()` is not valid SQL.
    #[error("Empty value list for field `{field}`")]
    EmptyList { field: String },

    /// A custom operator contains characters outside the symbolic set.
    #[error("Invalid operator: {0:?}")]
    InvalidOperator(String),

    /// Operator and value shape do not form a valid comparison.
    #[error("Operator {operator} does not accept a {shape} value (field `{field}`)")]
    UnsupportedOperand {
        field: String,
        operator: Operator,
        shape: &'static str,
    },
}
