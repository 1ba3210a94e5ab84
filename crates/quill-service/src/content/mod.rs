//! Content workflows.
//!
//! Every write that assigns a slug runs inside one transaction: probe for a
//! free slug, then insert or update. A concurrent writer can still claim the
//! same slug between the probe and the commit; the partial unique index then
//! rejects the write, it surfaces as `Conflict`, and the whole save is run
//! again up to [`MAX_SAVE_ATTEMPTS`] times.
//!
//! [`MAX_SAVE_ATTEMPTS`]: quill_core::constants::MAX_SAVE_ATTEMPTS

pub mod blog_post;
pub mod case_study;
pub mod document;
pub mod slug;

use chrono::{DateTime, Utc};
use diesel_async::AsyncPgConnection;
use quill_core::constants::MAX_PER_PAGE;
use quill_core::types::ContentKind;
use quill_db::db::enums::ContentStatus;
use quill_db::db::query;
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};

/// Outcome of an admin save.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    pub record: T,
    pub created: bool,
}

/// One page of a listing plus the numbers the portfolio pager needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow, total_count: i64) -> Self {
        let total_pages = (total_count + window.per_page - 1) / window.per_page;
        Self {
            items,
            page: window.page,
            per_page: window.per_page,
            total_count,
            total_pages,
            has_next: window.page < total_pages,
            has_prev: window.page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// A validated `page` / `per_page` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
}

impl PageWindow {
    /// ## Errors
    /// Returns `ValidationError` if `page` is below 1, if `per_page` is
    /// outside `1..=MAX_PER_PAGE`, or if the window's row offset does not fit
    /// in an `i64`.
    pub fn new(page: i64, per_page: i64) -> ServiceResult<Self> {
        if page < 1 {
            return Err(ServiceError::ValidationError(
                "page must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ServiceError::ValidationError(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        if (page - 1).checked_mul(per_page).is_none() {
            return Err(ServiceError::ValidationError(format!(
                "page {page} is out of range"
            )));
        }
        Ok(Self { page, per_page })
    }

    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// ## Summary
/// Returns the `published_at` change for a write with `status`: stamped on
/// the first publication, untouched otherwise (drafting a published record
/// keeps its original date).
#[must_use]
pub fn first_publication(
    status: ContentStatus,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<Option<DateTime<Utc>>> {
    (status.is_published() && current.is_none()).then_some(Some(now))
}

/// A public content URL and when it last changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPage {
    pub path: String,
    pub updated_at: DateTime<Utc>,
}

/// ## Summary
/// Lists the public URLs of every published blog post and case study.
///
/// ## Errors
/// Returns a database error if either query fails.
#[tracing::instrument(skip(conn))]
pub async fn published_pages(conn: &mut AsyncPgConnection) -> ServiceResult<Vec<PublishedPage>> {
    let posts = query::blog_post::list_sitemap_entries(conn).await?;
    let case_studies = query::case_study::list_sitemap_entries(conn).await?;

    let pages = posts
        .into_iter()
        .map(|entry| PublishedPage {
            path: ContentKind::BlogPost.public_path(&entry.slug),
            updated_at: entry.updated_at,
        })
        .chain(case_studies.into_iter().map(|entry| PublishedPage {
            path: ContentKind::CaseStudy.public_path(&entry.slug),
            updated_at: entry.updated_at,
        }))
        .collect::<Vec<_>>();

    tracing::debug!(count = pages.len(), "Listed published pages");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_bounds() {
        assert!(PageWindow::new(1, 4).is_ok());
        assert!(PageWindow::new(3, MAX_PER_PAGE).is_ok());
        assert!(PageWindow::new(0, 4).is_err());
        assert!(PageWindow::new(1, 0).is_err());
        assert!(PageWindow::new(1, MAX_PER_PAGE + 1).is_err());

        assert_eq!(PageWindow::new(3, 4).expect("valid window").offset(), 8);
    }

    #[test]
    fn test_page_window_rejects_overflowing_offset() {
        assert!(matches!(
            PageWindow::new(i64::MAX, MAX_PER_PAGE),
            Err(ServiceError::ValidationError(_))
        ));

        let last = i64::MAX / MAX_PER_PAGE + 1;
        let window = PageWindow::new(last, MAX_PER_PAGE).expect("largest valid window");
        assert_eq!(window.offset(), (last - 1) * MAX_PER_PAGE);
        assert!(PageWindow::new(last + 1, MAX_PER_PAGE).is_err());
    }

    #[test]
    fn test_paginated_numbers() {
        let window = PageWindow::new(2, 4).expect("valid window");
        let page = Paginated::new(vec!["e", "f", "g", "h"], window, 9);

        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);

        let last = Paginated::new(vec!["i"], PageWindow::new(3, 4).expect("valid window"), 9);
        assert!(!last.has_next);

        let empty = Paginated::<&str>::new(Vec::new(), PageWindow::new(1, 4).expect("valid window"), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn test_first_publication() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::days(3);

        assert_eq!(
            first_publication(ContentStatus::Published, None, now),
            Some(Some(now))
        );
        assert_eq!(
            first_publication(ContentStatus::Published, Some(earlier), now),
            None
        );
        assert_eq!(first_publication(ContentStatus::Draft, None, now), None);
    }

    #[test]
    fn test_paginated_map() {
        let window = PageWindow::new(1, 2).expect("valid window");
        let page = Paginated::new(vec![1, 2], window, 5).map(|n| n * 10);

        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_pages, 3);
    }
}
