//! Dialect-independent filter criteria.
//!
//! A criteria tree is built once by the caller and handed, read-only, to a
//! translator that turns it into a SQL fragment for a concrete dialect.

pub mod expr;
pub mod identity;
pub mod value;

pub use expr::{Comparison, Composite, CompositeKind, Expression, Operator};
pub use identity::{EntityRef, HasIdentity, IdentityError};
pub use value::{FilterValue, ListItem};
