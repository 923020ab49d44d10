use super::identity::{EntityRef, HasIdentity};
use crate::core::value::Value;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum FilterValue {
    /// Compared with `IS` / `IS NOT`, never bound.
    Null,

    /// A single bound value. `Scalar(Value::Null)` is bound as a parameter.
    Scalar(Value),

    /// A related object, represented by its identity.
    Entity(EntityRef),

    /// An ordered set of values for `IN` / `NOT IN`.
    List(Vec<ListItem>),
}

/// Element of a [`FilterValue::List`].
#[derive(Debug, Clone)]
pub enum ListItem {
    Scalar(Value),
    Entity(EntityRef),
}

impl FilterValue {
    pub fn entity<E: HasIdentity + 'static>(entity: E) -> Self {
        FilterValue::Entity(Arc::new(entity))
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ListItem>,
    {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::Scalar(_) => "scalar",
            FilterValue::Entity(_) => "entity",
            FilterValue::List(_) => "list",
        }
    }
}

impl ListItem {
    pub fn entity<E: HasIdentity + 'static>(entity: E) -> Self {
        ListItem::Entity(Arc::new(entity))
    }
}

impl From<Value> for FilterValue {
    /// `Value::Null` becomes [`FilterValue::Null`] so that equality against
    /// it renders as `IS NULL`.
    fn from(v: Value) -> Self {
        match v {
            Value::Null => FilterValue::Null,
            other => FilterValue::Scalar(other),
        }
    }
}

impl From<EntityRef> for FilterValue {
    fn from(entity: EntityRef) -> Self {
        FilterValue::Entity(entity)
    }
}

impl From<Vec<ListItem>> for FilterValue {
    fn from(items: Vec<ListItem>) -> Self {
        FilterValue::List(items)
    }
}

impl From<Value> for ListItem {
    fn from(v: Value) -> Self {
        ListItem::Scalar(v)
    }
}

impl From<EntityRef> for ListItem {
    fn from(entity: EntityRef) -> Self {
        ListItem::Entity(entity)
    }
}

macro_rules! impl_filter_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(v: $ty) -> Self {
                    FilterValue::Scalar(Value::from(v))
                }
            }

            impl From<Option<$ty>> for FilterValue {
                fn from(v: Option<$ty>) -> Self {
                    match v {
                        Some(v) => FilterValue::Scalar(Value::from(v)),
                        None => FilterValue::Null,
                    }
                }
            }

            impl From<Vec<$ty>> for FilterValue {
                fn from(items: Vec<$ty>) -> Self {
                    FilterValue::list(items)
                }
            }

            impl From<$ty> for ListItem {
                fn from(v: $ty) -> Self {
                    ListItem::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_filter_value_from!(
    i64,
    i32,
    u64,
    u32,
    f64,
    BigDecimal,
    String,
    &str,
    bool,
    Uuid,
    NaiveDate,
    DateTime<Utc>,
);
