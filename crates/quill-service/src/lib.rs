//! Content workflows for Quill.
//!
//! ## Module Organization
//!
//! - `auth`: admin credentials (Basic header parsing, Argon2 verification)
//! - `content`: admin save, partial update, editor's choice, delete/restore
//!   and the public listings for case studies and blog posts
//! - `leads`: PDF download and contact form submissions
//! - `error`: the service error type

pub mod auth;
pub mod content;
pub mod error;
pub mod leads;
