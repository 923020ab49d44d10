pub mod dialect;
pub mod renderer;
pub mod resolver;
pub mod settings;
pub mod where_clause;
