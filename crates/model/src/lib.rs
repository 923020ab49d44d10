pub mod core;
pub mod criteria;
