//! Rendering context shared by one translation.

use crate::query::dialect::Dialect;
use model::core::value::Value;

/// A context that holds the state during the rendering process.
///
/// It accumulates the SQL string and the parameters, and provides
/// access to the dialect for syntax-specific details. The parameter list
/// is append-only: the n-th bound value belongs to the n-th placeholder.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Appends `value` to the parameter list and returns its placeholder.
    pub fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        self.dialect.get_placeholder(self.params.len() - 1)
    }

    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }
}
