//! Core types and pure utilities shared by every Quill crate.
//!
//! Nothing in here touches the database or the network: configuration,
//! error types, route constants, the category table, slug assignment and
//! table-of-contents construction.

pub mod categories;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
