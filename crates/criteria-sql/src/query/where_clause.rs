//! Translation of criteria expressions into parameterized WHERE fragments.
//!
//! The walk is depth-first and left-to-right. Every placeholder is emitted at
//! the moment its value is bound, so the order of `Renderer::params` always
//! matches the order of placeholders in the produced SQL.

use crate::{
    error::TranslateError,
    query::{
        dialect::Dialect, renderer::Renderer, resolver::ColumnResolver,
        settings::{SettingsError, TranslatorSettings},
    },
};
use model::{
    core::value::Value,
    criteria::{Comparison, Composite, CompositeKind, Expression, FilterValue, ListItem, Operator},
};
use tracing::{debug, trace, warn};

const NULL: &str = "NULL";

/// Characters allowed in [`Operator::Custom`] symbols.
const OPERATOR_CHARS: &str = "<>=!~@#&|^-+*/%";

/// A translated fragment together with its bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<Value>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Render " WHERE ..." or empty string if there is no fragment.
    pub fn to_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql)
        }
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

pub struct WhereTranslator<'a> {
    alias: &'a str,
    resolver: &'a dyn ColumnResolver,
    dialect: &'a dyn Dialect,
    strict: bool,
}

impl<'a> WhereTranslator<'a> {
    /// `alias` is written into the SQL verbatim and must be trusted.
    pub fn new(alias: &'a str, resolver: &'a dyn ColumnResolver, dialect: &'a dyn Dialect) -> Self {
        Self {
            alias,
            resolver,
            dialect,
            strict: false,
        }
    }

    pub fn from_settings(
        settings: &'a TranslatorSettings,
        resolver: &'a dyn ColumnResolver,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::new(&settings.alias, resolver, settings.dialect.dialect()).strict(settings.strict))
    }

    /// Reject operator/value combinations that have no valid SQL form
    /// instead of emitting them as-is.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn alias(&self) -> &str {
        self.alias
    }

    /// Translates `expr` with a fresh parameter list.
    pub fn translate(&self, expr: &Expression) -> Result<WhereClause, TranslateError> {
        let mut renderer = Renderer::new(self.dialect);
        self.translate_into(expr, &mut renderer)?;
        let (sql, params) = renderer.finish();

        debug!(
            "Translated criteria for alias `{}` ({}): {} parameter(s)",
            self.alias,
            self.dialect.name(),
            params.len()
        );

        Ok(WhereClause { sql, params })
    }

    /// Appends the fragment for `expr` to `r.sql` and its values to `r.params`.
    ///
    /// On error, parameters bound during this call are removed again and
    /// `r.sql` is left untouched.
    pub fn translate_into(&self, expr: &Expression, r: &mut Renderer) -> Result<(), TranslateError> {
        let mark = r.params.len();
        match self.translate_expression(expr, r) {
            Ok(fragment) => {
                r.push_sql(&fragment);
                Ok(())
            }
            Err(err) => {
                r.params.truncate(mark);
                Err(err)
            }
        }
    }

    pub fn translate_expression(
        &self,
        expr: &Expression,
        r: &mut Renderer,
    ) -> Result<String, TranslateError> {
        match expr {
            Expression::Comparison(comparison) => self.translate_comparison(comparison, r),
            Expression::Composite(composite) => self.translate_composite(composite, r),
        }
    }

    pub fn translate_composite(
        &self,
        node: &Composite,
        r: &mut Renderer,
    ) -> Result<String, TranslateError> {
        if node.children.is_empty() {
            return Err(TranslateError::EmptyComposite(node.kind));
        }

        let parts = node
            .children
            .iter()
            .map(|child| self.translate_expression(child, r))
            .collect::<Result<Vec<_>, _>>()?;

        let separator = match node.kind {
            CompositeKind::And => " AND ",
            CompositeKind::Or => " OR ",
        };

        Ok(format!("({})", parts.join(separator)))
    }

    pub fn translate_comparison(
        &self,
        node: &Comparison,
        r: &mut Renderer,
    ) -> Result<String, TranslateError> {
        if let Operator::Custom(symbol) = &node.operator {
            validate_symbol(symbol, r.dialect)?;
        }
        self.check_operand(node)?;

        let value = self.translate_value(&node.value, Some(node), r)?;
        let operator = normalize_operator(&node.operator, &value);
        let column = self.resolver.resolve(&node.field)?;

        trace!("{} {} -> {}.{} {}", node.field, node.operator, self.alias, column, operator);

        Ok(format!("{}.{} {} {}", self.alias, column, operator, value))
    }

    /// Binds the value(s) of `value` and returns the SQL standing in for them.
    ///
    /// `comparison` decides whether a scalar is turned into a `LIKE` pattern.
    pub fn translate_value(
        &self,
        value: &FilterValue,
        comparison: Option<&Comparison>,
        r: &mut Renderer,
    ) -> Result<String, TranslateError> {
        match value {
            FilterValue::Null => Ok(NULL.to_string()),
            FilterValue::Entity(entity) => {
                let identity = entity.identity()?;
                Ok(bind_scalar(identity, comparison, r))
            }
            FilterValue::List(items) => {
                let placeholders = items
                    .iter()
                    .map(|item| -> Result<String, TranslateError> {
                        let v = match item {
                            ListItem::Scalar(v) => v.clone(),
                            ListItem::Entity(entity) => entity.identity()?,
                        };
                        Ok(r.bind(v))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(format!("({})", placeholders.join(", ")))
            }
            FilterValue::Scalar(v) => Ok(bind_scalar(v.clone(), comparison, r)),
        }
    }

    fn check_operand(&self, node: &Comparison) -> Result<(), TranslateError> {
        let mismatch = match (&node.operator, &node.value) {
            (_, FilterValue::List(items)) if items.is_empty() => {
                return Err(TranslateError::EmptyList {
                    field: node.field.clone(),
                });
            }
            (Operator::Custom(_), _) => false,
            (op, FilterValue::List(_)) => !op.is_set(),
            (op, _) if op.is_set() => true,
            (Operator::Eq | Operator::Neq, FilterValue::Null) => false,
            (_, FilterValue::Null) => true,
            _ => false,
        };

        if !mismatch {
            return Ok(());
        }

        if self.strict {
            return Err(TranslateError::UnsupportedOperand {
                field: node.field.clone(),
                operator: node.operator.clone(),
                shape: node.value.shape(),
            });
        }

        warn!(
            "Operator {} with a {} value on field `{}` is emitted as-is",
            node.operator,
            node.value.shape(),
            node.field
        );
        Ok(())
    }
}

/// Translates optional criteria; `None` yields an empty clause.
pub fn translate_criteria(
    translator: &WhereTranslator,
    criteria: Option<&Expression>,
) -> Result<WhereClause, TranslateError> {
    match criteria {
        Some(expr) => translator.translate(expr),
        None => Ok(WhereClause::default()),
    }
}

fn bind_scalar(value: Value, comparison: Option<&Comparison>, r: &mut Renderer) -> String {
    let value = match comparison.map(|c| &c.operator) {
        Some(Operator::Contains) => Value::String(format!("%{}%", value.as_text())),
        Some(Operator::StartsWith) => Value::String(format!("{}%", value.as_text())),
        Some(Operator::EndsWith) => Value::String(format!("%{}", value.as_text())),
        _ => value,
    };
    r.bind(value)
}

/// The null-aware rewrites only apply once pattern and set operators are ruled out.
fn normalize_operator<'o>(operator: &'o Operator, value_sql: &str) -> &'o str {
    match operator {
        op if op.is_pattern() => "LIKE",
        Operator::Nin => "NOT IN",
        Operator::Eq if value_sql == NULL => "IS",
        Operator::Neq if value_sql == NULL => "IS NOT",
        other => other.symbol(),
    }
}

fn validate_symbol(symbol: &str, dialect: &dyn Dialect) -> Result<(), TranslateError> {
    let valid = !symbol.is_empty()
        && symbol.chars().all(|c| OPERATOR_CHARS.contains(c))
        && !dialect
            .comment_starters()
            .iter()
            .any(|s| symbol.contains(s));

    if valid {
        Ok(())
    } else {
        Err(TranslateError::InvalidOperator(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        dialect::{MySql, Postgres},
        resolver::ResolveError,
    };

    fn passthrough(field: &str) -> Result<String, ResolveError> {
        Ok(field.to_string())
    }

    fn translate(expr: &Expression) -> (String, Vec<Value>) {
        WhereTranslator::new("te", &passthrough, &MySql)
            .translate(expr)
            .unwrap()
            .into_parts()
    }

    #[test]
    fn test_normalize_operator() {
        assert_eq!(normalize_operator(&Operator::Contains, "?"), "LIKE");
        assert_eq!(normalize_operator(&Operator::Nin, "(?, ?)"), "NOT IN");
        assert_eq!(normalize_operator(&Operator::Eq, "NULL"), "IS");
        assert_eq!(normalize_operator(&Operator::Neq, "NULL"), "IS NOT");
        assert_eq!(normalize_operator(&Operator::Eq, "?"), "=");
        assert_eq!(normalize_operator(&Operator::Lt, "NULL"), "<");
    }

    #[test]
    fn test_validate_symbol() {
        assert!(validate_symbol("@>", &Postgres).is_ok());
        assert!(validate_symbol("#>>", &Postgres).is_ok());
        assert!(validate_symbol("", &Postgres).is_err());
        assert!(validate_symbol("= 1 OR 1 =", &Postgres).is_err());
        assert!(validate_symbol("--", &Postgres).is_err());
        assert!(validate_symbol("/*", &MySql).is_err());
        assert!(validate_symbol("#", &MySql).is_err());
        assert!(validate_symbol("#>>", &MySql).is_err());
    }

    #[test]
    fn test_starts_and_ends_with_patterns() {
        let (sql, params) = translate(&Expression::and_x([
            Expression::starts_with("name", "ab"),
            Expression::ends_with("name", "yz"),
        ]));

        assert_eq!(sql, "(te.name LIKE ? AND te.name LIKE ?)");
        assert_eq!(params, vec![Value::from("ab%"), Value::from("%yz")]);
    }

    #[test]
    fn test_contains_wraps_non_string_scalars() {
        let (sql, params) = translate(&Expression::contains("code", 42_i64));

        assert_eq!(sql, "te.code LIKE ?");
        assert_eq!(params, vec![Value::from("%42%")]);
    }

    #[test]
    fn test_scalar_null_is_bound() {
        let expr = Expression::Comparison(Comparison::new(
            "deleted_at",
            Operator::Eq,
            FilterValue::Scalar(Value::Null),
        ));
        let (sql, params) = translate(&expr);

        assert_eq!(sql, "te.deleted_at = ?");
        assert_eq!(params, vec![Value::Null]);
    }

    #[test]
    fn test_postgres_numbering_spans_subtrees() {
        let expr = Expression::or_x([
            Expression::is_in("id", vec![1_i64, 2]),
            Expression::and_x([Expression::gt("age", 18_i64), Expression::neq("name", "x")]),
        ]);
        let (sql, params) = WhereTranslator::new("u", &passthrough, &Postgres)
            .translate(&expr)
            .unwrap()
            .into_parts();

        assert_eq!(sql, "(u.id IN ($1, $2) OR (u.age > $3 AND u.name <> $4))");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_translate_into_appends_to_query() {
        let translator = WhereTranslator::new("te", &passthrough, &Postgres);
        let mut renderer = Renderer::new(&Postgres);
        renderer.push_sql("SELECT te.* FROM users te WHERE te.tenant = ");
        let placeholder = renderer.bind(Value::Int(7));
        renderer.push_sql(&placeholder);
        renderer.push_sql(" AND ");

        translator
            .translate_into(&Expression::eq("status", "open"), &mut renderer)
            .unwrap();

        let (sql, params) = renderer.finish();
        assert_eq!(
            sql,
            "SELECT te.* FROM users te WHERE te.tenant = $1 AND te.status = $2"
        );
        assert_eq!(params, vec![Value::Int(7), Value::from("open")]);
    }

    #[test]
    fn test_translate_into_rolls_back_params_on_error() {
        let failing = |field: &str| -> Result<String, ResolveError> {
            if field == "bad" {
                Err(ResolveError::Other("nope".into()))
            } else {
                Ok(field.to_string())
            }
        };
        let translator = WhereTranslator::new("te", &failing, &MySql);
        let mut renderer = Renderer::new(&MySql);
        renderer.bind(Value::Int(1));

        let expr = Expression::and_x([Expression::eq("ok", 2_i64), Expression::eq("bad", 3_i64)]);
        assert!(translator.translate_into(&expr, &mut renderer).is_err());

        let (sql, params) = renderer.finish();
        assert!(sql.is_empty());
        assert_eq!(params, vec![Value::Int(1)]);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_permissive_mismatch_is_logged() {
        let (sql, params) = translate(&Expression::is_in("id", 5_i64));

        assert_eq!(sql, "te.id IN ?");
        assert_eq!(params, vec![Value::Int(5)]);
        assert!(logs_contain("Operator IN with a scalar value on field `id` is emitted as-is"));
    }

    #[test]
    fn test_where_clause_to_sql() {
        let clause = WhereClause {
            sql: "te.a = ?".into(),
            params: vec![Value::Int(1)],
        };
        assert_eq!(clause.to_sql(), " WHERE te.a = ?");
        assert_eq!(WhereClause::default().to_sql(), "");
    }

    #[test]
    fn test_translate_criteria_none() {
        let translator = WhereTranslator::new("te", &passthrough, &MySql);
        let clause = translate_criteria(&translator, None).unwrap();
        assert!(clause.is_empty());
        assert!(clause.params.is_empty());
    }
}
