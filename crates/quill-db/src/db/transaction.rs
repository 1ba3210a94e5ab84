//! Transaction helper for multi-statement writes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diesel_async::scoped_futures::ScopedFutureExt;
//! use quill_db::db::transaction::with_transaction;
//!
//! let changes = CaseStudyChangeset {
//!     editors_choice: Some(true),
//!     updated_at: Some(now),
//!     ..Default::default()
//! };
//!
//! with_transaction(&mut conn, |tx| async move {
//!     case_study::clear_editors_choice(tx, now).await?;
//!     case_study::update(tx, id, &changes).await
//! }.scope_boxed()).await?;
//! ```

use diesel_async::{AsyncConnection, AsyncPgConnection, scoped_futures::ScopedBoxFuture};

/// ## Summary
/// Runs `callback` inside a database transaction and returns its result.
///
/// The transaction is rolled back when the callback returns an error.
///
/// ## Errors
/// Returns any error produced by the closure, or errors raised while starting
/// or committing the transaction.
pub async fn with_transaction<'a, T, E, F>(conn: &'a mut AsyncPgConnection, callback: F) -> Result<T, E>
where
    F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
        + Send
        + 'a,
    T: Send + 'a,
    E: From<diesel::result::Error> + Send + 'a,
{
    conn.transaction(callback).await
}
