//! Defines the `Dialect` trait for database-specific SQL syntax.

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    ///
    /// Embedded quote characters are doubled.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for the parameter at `index` (0-based).
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - MySQL and SQLite use `?`
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    /// Token sequences that open a comment in this dialect.
    ///
    /// MySQL also treats `#` as a line comment.
    fn comment_starters(&self) -> &'static [&'static str] {
        &["--", "/*", "*/"]
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> String {
        "MySQL".into()
    }

    fn comment_starters(&self) -> &'static [&'static str] {
        &["--", "/*", "*/", "#"]
    }
}

#[derive(Debug, Clone)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn get_placeholder(&self, _index: usize) -> String {
        "?".into()
    }

    fn name(&self) -> String {
        "SQLite".into()
    }
}
