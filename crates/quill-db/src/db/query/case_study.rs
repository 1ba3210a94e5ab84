//! Query builders and statements for case studies.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use quill_core::constants::CASE_STUDY_CONTENT_TYPE;

use crate::db::enums::ContentStatus;
use crate::db::schema::case_study;
use crate::model::case_study::{CaseStudy, CaseStudyChangeset, CaseStudySitemapEntry, NewCaseStudy};

/// ## Summary
/// Returns a query to select all case studies.
#[must_use]
pub fn all() -> case_study::BoxedQuery<'static, diesel::pg::Pg> {
    case_study::table.into_boxed()
}

/// ## Summary
/// Returns a query to find a case study by ID, deleted or not.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> case_study::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(case_study::id.eq(id))
}

/// ## Summary
/// Returns a query to find non-deleted case studies.
#[must_use]
pub fn not_deleted() -> case_study::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(case_study::deleted_at.is_null())
}

/// ## Summary
/// Returns a query to find the active case study with a slug.
#[must_use]
pub fn by_slug(slug: &str) -> case_study::BoxedQuery<'_, diesel::pg::Pg> {
    not_deleted().filter(case_study::slug.eq(slug))
}

/// ## Summary
/// Returns a query for the public portfolio: published, active, of the
/// portfolio content type, optionally limited to a set of category spellings.
#[must_use]
pub fn published(categories: Option<&[String]>) -> case_study::BoxedQuery<'_, diesel::pg::Pg> {
    let query = not_deleted()
        .filter(case_study::status.eq(ContentStatus::Published))
        .filter(case_study::content_type.eq(CASE_STUDY_CONTENT_TYPE));

    match categories {
        Some(values) => query.filter(case_study::category.eq_any(values)),
        None => query,
    }
}

/// ## Summary
/// Returns a query for active case studies whose `pdf_url` is one of `urls`.
#[must_use]
pub fn by_pdf_url(urls: &[String]) -> case_study::BoxedQuery<'_, diesel::pg::Pg> {
    not_deleted().filter(case_study::pdf_url.eq_any(urls))
}

/// ## Summary
/// Loads a record by ID, deleted or not.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> diesel::QueryResult<Option<CaseStudy>> {
    by_id(id).select(CaseStudy::as_select()).first(conn).await.optional()
}

/// ## Summary
/// Loads the active record with a slug.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_slug(conn: &mut AsyncPgConnection, slug: &str) -> diesel::QueryResult<Option<CaseStudy>> {
    by_slug(slug)
        .select(CaseStudy::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Checks whether an active case study already uses `slug`, ignoring
/// `exclude` (the record being renamed).
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn slug_taken(
    conn: &mut AsyncPgConnection,
    slug: &str,
    exclude: Option<uuid::Uuid>,
) -> diesel::QueryResult<bool> {
    let mut query = by_slug(slug);
    if let Some(id) = exclude {
        query = query.filter(case_study::id.ne(id));
    }

    let found: Option<uuid::Uuid> = query
        .select(case_study::id)
        .first(conn)
        .await
        .optional()?;

    Ok(found.is_some())
}

/// ## Summary
/// Checks whether an active case study links to one of `urls` as its PDF.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn pdf_url_in_use(conn: &mut AsyncPgConnection, urls: &[String]) -> diesel::QueryResult<bool> {
    let found: Option<uuid::Uuid> = by_pdf_url(urls)
        .select(case_study::id)
        .first(conn)
        .await
        .optional()?;

    Ok(found.is_some())
}

/// ## Summary
/// Lists case studies for the admin panel, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_admin(
    conn: &mut AsyncPgConnection,
    include_deleted: bool,
) -> diesel::QueryResult<Vec<CaseStudy>> {
    let query = if include_deleted { all() } else { not_deleted() };

    query
        .filter(case_study::content_type.eq(CASE_STUDY_CONTENT_TYPE))
        .order((
            case_study::published_at.desc().nulls_last(),
            case_study::created_at.desc(),
        ))
        .select(CaseStudy::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads one page of the public portfolio. Editor's choice comes first, then
/// the newest publications.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_published_page(
    conn: &mut AsyncPgConnection,
    categories: Option<&[String]>,
    limit: i64,
    offset: i64,
) -> diesel::QueryResult<Vec<CaseStudy>> {
    published(categories)
        .order((
            case_study::editors_choice.desc(),
            case_study::published_at.desc().nulls_last(),
            case_study::created_at.desc(),
        ))
        .limit(limit)
        .offset(offset)
        .select(CaseStudy::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Counts the public portfolio entries matching `categories`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_published(
    conn: &mut AsyncPgConnection,
    categories: Option<&[String]>,
) -> diesel::QueryResult<i64> {
    published(categories).count().get_result(conn).await
}

/// ## Summary
/// Returns the case study featured on the home page: the editor's choice, or
/// the newest published one when none is set.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn featured(conn: &mut AsyncPgConnection) -> diesel::QueryResult<Option<CaseStudy>> {
    list_published_page(conn, None, 1, 0)
        .await
        .map(|rows| rows.into_iter().next())
}

/// ## Summary
/// Lists active case studies flagged as editor's choice.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_editors_choice(conn: &mut AsyncPgConnection) -> diesel::QueryResult<Vec<CaseStudy>> {
    not_deleted()
        .filter(case_study::content_type.eq(CASE_STUDY_CONTENT_TYPE))
        .filter(case_study::editors_choice.eq(true))
        .order(case_study::published_at.desc().nulls_last())
        .select(CaseStudy::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Returns slugs of every public case study, for the sitemap.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_sitemap_entries(
    conn: &mut AsyncPgConnection,
) -> diesel::QueryResult<Vec<CaseStudySitemapEntry>> {
    published(None)
        .order(case_study::published_at.desc().nulls_last())
        .select(CaseStudySitemapEntry::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Inserts a case study and returns the stored row.
///
/// ## Errors
/// Returns a database error if the insert fails, including unique violations
/// on the active slug index.
pub async fn insert(
    conn: &mut AsyncPgConnection,
    new_case_study: &NewCaseStudy<'_>,
) -> diesel::QueryResult<CaseStudy> {
    diesel::insert_into(case_study::table)
        .values(new_case_study)
        .returning(CaseStudy::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Applies a changeset to a case study and returns the updated row.
///
/// ## Errors
/// Returns `NotFound` if no row has this ID, or a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    changes: &CaseStudyChangeset<'_>,
) -> diesel::QueryResult<CaseStudy> {
    diesel::update(case_study::table.filter(case_study::id.eq(id)))
        .set(changes)
        .returning(CaseStudy::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Marks an active case study as deleted and drops its editor's choice flag.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn soft_delete(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(
        case_study::table
            .filter(case_study::id.eq(id))
            .filter(case_study::deleted_at.is_null()),
    )
    .set((
        case_study::deleted_at.eq(Some(now)),
        case_study::editors_choice.eq(false),
        case_study::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}

/// ## Summary
/// Clears the deleted marker of a case study.
///
/// ## Errors
/// Returns a database error if the update fails, including a unique violation
/// when an active record took the slug in the meantime.
pub async fn restore(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(
        case_study::table
            .filter(case_study::id.eq(id))
            .filter(case_study::deleted_at.is_not_null()),
    )
    .set((
        case_study::deleted_at.eq(None::<DateTime<Utc>>),
        case_study::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}

/// ## Summary
/// Permanently removes a case study.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn hard_delete(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> diesel::QueryResult<usize> {
    diesel::delete(case_study::table.filter(case_study::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Summary
/// Removes the editor's choice flag from every active portfolio case study.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn clear_editors_choice(
    conn: &mut AsyncPgConnection,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(
        case_study::table
            .filter(case_study::editors_choice.eq(true))
            .filter(case_study::deleted_at.is_null())
            .filter(case_study::content_type.eq(CASE_STUDY_CONTENT_TYPE)),
    )
    .set((
        case_study::editors_choice.eq(false),
        case_study::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}
