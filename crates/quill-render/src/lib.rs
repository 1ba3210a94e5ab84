//! Server-side HTML rendering for the public site.
//!
//! Every page is produced by substituting rendered fragments into a page
//! shell. Values coming from stored content pass through [`escape`] or, for
//! rich-text fields, through [`sanitize`] before they reach the output.

pub mod blog;
pub mod case_study;
pub mod date;
mod doc;
pub mod error;
pub mod escape;
pub mod flipbook;
pub mod home;
pub mod portfolio;
pub mod sanitize;
pub mod seo;
pub mod template;
pub mod toc;
