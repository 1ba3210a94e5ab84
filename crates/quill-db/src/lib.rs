//! Persistence for Quill: diesel schema, models, query builders, the
//! connection pool and embedded migrations.

pub mod db;
pub mod error;
pub mod model;
