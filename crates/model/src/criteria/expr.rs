use super::value::FilterValue;
use std::fmt;

/// A boolean filter expression over logical field names.
#[derive(Debug, Clone)]
pub enum Expression {
    /// A single `field <op> value` test.
    Comparison(Comparison),

    /// An AND / OR of child expressions, in order.
    Composite(Composite),
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub field: String,
    pub operator: Operator,
    pub value: FilterValue,
}

#[derive(Debug, Clone)]
pub struct Composite {
    pub kind: CompositeKind,
    pub children: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Nin,
    Contains,
    StartsWith,
    EndsWith,

    /// Any other symbolic operator, e.g. `@>` or `~`, emitted as given.
    Custom(String),
}

impl Operator {
    /// The SQL spelling of the operator, before null-aware rewriting.
    pub fn symbol(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::In => "IN",
            Operator::Nin => "NOT IN",
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => "LIKE",
            Operator::Custom(symbol) => symbol,
        }
    }

    /// Whether the operator matches a `LIKE` pattern built from the value.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }

    /// Whether the operator expects a parenthesized list of values.
    pub fn is_set(&self) -> bool {
        matches!(self, Operator::In | Operator::Nin)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "EQ"),
            Operator::Neq => write!(f, "NEQ"),
            Operator::Lt => write!(f, "LT"),
            Operator::Lte => write!(f, "LTE"),
            Operator::Gt => write!(f, "GT"),
            Operator::Gte => write!(f, "GTE"),
            Operator::In => write!(f, "IN"),
            Operator::Nin => write!(f, "NIN"),
            Operator::Contains => write!(f, "CONTAINS"),
            Operator::StartsWith => write!(f, "STARTS_WITH"),
            Operator::EndsWith => write!(f, "ENDS_WITH"),
            Operator::Custom(symbol) => write!(f, "{symbol}"),
        }
    }
}

impl CompositeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            CompositeKind::And => "AND",
            CompositeKind::Or => "OR",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Comparison {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl From<Comparison> for Expression {
    fn from(c: Comparison) -> Self {
        Expression::Comparison(c)
    }
}

impl From<Composite> for Expression {
    fn from(c: Composite) -> Self {
        Expression::Composite(c)
    }
}

// Builder helpers, mirroring a criteria expression builder.
impl Expression {
    fn compare(field: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        Expression::Comparison(Comparison::new(field, operator, value))
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Neq, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Lte, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Gte, value)
    }

    pub fn is_in(field: impl Into<String>, values: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::In, values)
    }

    pub fn not_in(field: impl Into<String>, values: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Nin, values)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::Contains, value)
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::StartsWith, value)
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, Operator::EndsWith, value)
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Self::compare(field, Operator::Eq, FilterValue::Null)
    }

    pub fn and_x(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Composite(Composite {
            kind: CompositeKind::And,
            children: children.into_iter().collect(),
        })
    }

    pub fn or_x(children: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Composite(Composite {
            kind: CompositeKind::Or,
            children: children.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_child_order() {
        let expr = Expression::or_x([
            Expression::eq("a", 1_i64),
            Expression::is_null("b"),
            Expression::contains("c", "x"),
        ]);

        let Expression::Composite(composite) = expr else {
            panic!("expected composite");
        };
        assert_eq!(composite.kind, CompositeKind::Or);

        let fields: Vec<_> = composite
            .children
            .iter()
            .map(|c| match c {
                Expression::Comparison(c) => c.field.as_str(),
                Expression::Composite(_) => "<composite>",
            })
            .collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(Operator::Neq.symbol(), "<>");
        assert_eq!(Operator::Nin.symbol(), "NOT IN");
        assert_eq!(Operator::Contains.symbol(), "LIKE");
        assert_eq!(Operator::Custom("@>".into()).symbol(), "@>");
        assert!(Operator::EndsWith.is_pattern());
        assert!(Operator::Nin.is_set());
    }
}
