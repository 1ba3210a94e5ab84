//! Case study workflows: admin save, JSON create and partial update,
//! editor's choice, delete and restore, and the public listings.

use chrono::Utc;
use diesel_async::AsyncPgConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use quill_core::categories::CategoryTable;
use quill_core::constants::{CASE_STUDY_CONTENT_TYPE, MAX_SAVE_ATTEMPTS};
use quill_core::error::CoreError;
use quill_core::types::ContentKind;
use quill_core::util::slug::assign_unique_slug;
use quill_db::db::enums::ContentStatus;
use quill_db::db::query::case_study;
use quill_db::db::transaction::with_transaction;
use quill_db::model::case_study::{CaseStudy, CaseStudyChangeset, NewCaseStudy};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::content::document::{AdminDocument, ContentFields, SaveMode};
use crate::content::slug::ActiveSlugs;
use crate::content::{PageWindow, Paginated, Saved, first_publication};
use crate::error::{ServiceError, ServiceResult};

const CONFLICT_MESSAGE: &str =
    "Another case study took this slug or the editor's choice flag, please retry";

fn not_found() -> ServiceError {
    ServiceError::NotFound("Case study not found".to_string())
}

/// ## Summary
/// Creates or updates a case study from an admin panel document.
///
/// Creation assigns a fresh slug. An update requires an active record and
/// re-assigns the slug from the title, excluding the record itself, so an
/// unchanged title keeps its slug.
///
/// ## Errors
/// Returns `NotFound` when the record to update is missing or deleted,
/// `CoreError` for an unusable title, and `Conflict` if every attempt lost a
/// race on a unique index.
#[tracing::instrument(skip(conn, document), fields(title = %document.title, mode = ?document.mode))]
pub async fn save_case_study(
    conn: &mut AsyncPgConnection,
    document: &AdminDocument,
) -> ServiceResult<Saved<CaseStudy>> {
    let mut attempt = 1;
    loop {
        match save_once(conn, document).await {
            Err(ServiceError::Conflict(message)) if attempt < MAX_SAVE_ATTEMPTS => {
                tracing::warn!(attempt, %message, "Case study save lost a race, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn save_once(
    conn: &mut AsyncPgConnection,
    document: &AdminDocument,
) -> ServiceResult<Saved<CaseStudy>> {
    let content_type = document
        .content_type
        .as_deref()
        .unwrap_or(CASE_STUDY_CONTENT_TYPE);
    let mut content = document.content.clone();
    if let Value::Object(fields) = &mut content {
        fields.insert(
            "contentType".to_string(),
            Value::String(content_type.to_string()),
        );
    }

    with_transaction(conn, |tx| {
        async move {
            match document.mode {
                SaveMode::Create => insert_document(tx, document, &content, content_type)
                    .await
                    .map(|record| Saved {
                        record,
                        created: true,
                    }),
                SaveMode::Update(id) => {
                    update_document(tx, id, document, &content, content_type)
                        .await
                        .map(|record| Saved {
                            record,
                            created: false,
                        })
                }
            }
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

async fn insert_document(
    tx: &mut AsyncPgConnection,
    document: &AdminDocument,
    content: &Value,
    content_type: &str,
) -> ServiceResult<CaseStudy> {
    let now = Utc::now();
    let status = ContentStatus::from(document.status);
    let slug = assign_unique_slug(
        &document.title,
        &mut ActiveSlugs::new(tx, ContentKind::CaseStudy, None),
    )
    .await?;

    if document.editors_choice {
        case_study::clear_editors_choice(tx, now).await?;
    }

    let new_case_study = NewCaseStudy {
        id: Uuid::now_v7(),
        content,
        status,
        content_type,
        published_at: status.is_published().then_some(now),
        keyword: None,
        preview: &document.preview,
        slug: &slug,
        redirect_url: None,
        pdf_url: document.pdf_url.as_deref(),
        category: document.category.as_deref(),
        editors_choice: document.editors_choice,
    };
    let record = case_study::insert(tx, &new_case_study).await?;

    tracing::info!(id = %record.id, slug = %record.slug, "Case study created");
    Ok(record)
}

async fn update_document(
    tx: &mut AsyncPgConnection,
    id: Uuid,
    document: &AdminDocument,
    content: &Value,
    content_type: &str,
) -> ServiceResult<CaseStudy> {
    let now = Utc::now();
    let status = ContentStatus::from(document.status);
    let existing = case_study::find(tx, id)
        .await?
        .filter(|record| !record.is_deleted())
        .ok_or_else(|| ServiceError::NotFound("Case study not found for update".to_string()))?;

    let slug = assign_unique_slug(
        &document.title,
        &mut ActiveSlugs::new(tx, ContentKind::CaseStudy, Some(id)),
    )
    .await?;

    if document.editors_choice && !existing.editors_choice {
        case_study::clear_editors_choice(tx, now).await?;
    }

    let changes = CaseStudyChangeset {
        content: Some(content),
        status: Some(status),
        content_type: Some(content_type),
        published_at: first_publication(status, existing.published_at, now),
        preview: Some(&document.preview),
        slug: Some(&slug),
        pdf_url: Some(document.pdf_url.as_deref()),
        category: Some(document.category.as_deref()),
        editors_choice: Some(document.editors_choice),
        updated_at: Some(now),
        ..Default::default()
    };
    let record = case_study::update(tx, id, &changes).await?;

    if record.slug != existing.slug {
        tracing::info!(%id, from = %existing.slug, to = %record.slug, "Case study renamed");
    }
    tracing::info!(%id, "Case study updated");
    Ok(record)
}

/// ## Summary
/// Creates a case study from the JSON API. The slug comes from `slug` when
/// given, otherwise from the document title.
///
/// ## Errors
/// Returns `ValidationError` when `blogContent` is missing or empty,
/// `CoreError` when no slug source is usable, and `Conflict` after
/// exhausting retries.
#[tracing::instrument(skip(conn, fields))]
pub async fn create_case_study(
    conn: &mut AsyncPgConnection,
    fields: &ContentFields,
) -> ServiceResult<CaseStudy> {
    let content = fields.content().ok_or_else(|| {
        ServiceError::ValidationError("Case study content is required".to_string())
    })?;
    let slug_source = fields
        .requested_slug()
        .map(ToString::to_string)
        .or_else(|| fields.title())
        .ok_or_else(|| CoreError::InvalidInput("title is required".to_string()))?;

    let mut attempt = 1;
    loop {
        match create_once(conn, fields, content, &slug_source).await {
            Err(ServiceError::Conflict(message)) if attempt < MAX_SAVE_ATTEMPTS => {
                tracing::warn!(attempt, %message, "Case study create lost a race, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn create_once(
    conn: &mut AsyncPgConnection,
    fields: &ContentFields,
    content: &Value,
    slug_source: &str,
) -> ServiceResult<CaseStudy> {
    let status = ContentStatus::from(fields.status().unwrap_or_default());
    let editors_choice = fields.editors_choice().unwrap_or(false);
    let preview = fields.preview_with_title().unwrap_or_else(|| json!({}));

    with_transaction(conn, |tx| {
        async move {
            let now = Utc::now();
            let slug = assign_unique_slug(
                slug_source,
                &mut ActiveSlugs::new(tx, ContentKind::CaseStudy, None),
            )
            .await?;

            if editors_choice {
                case_study::clear_editors_choice(tx, now).await?;
            }

            let new_case_study = NewCaseStudy {
                id: Uuid::now_v7(),
                content,
                status,
                content_type: CASE_STUDY_CONTENT_TYPE,
                published_at: status.is_published().then_some(now),
                keyword: fields.keyword.as_ref(),
                preview: &preview,
                slug: &slug,
                redirect_url: fields.redirect_url.as_deref(),
                pdf_url: fields.pdf_url.as_deref(),
                category: fields.category(),
                editors_choice,
            };
            let record = case_study::insert(tx, &new_case_study).await?;

            tracing::info!(id = %record.id, slug = %record.slug, "Case study created");
            Ok(record)
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Summary
/// Applies the provided fields to an active case study. A new `slug`, or a
/// changed `blogTitle` in the content, re-assigns the slug.
///
/// ## Errors
/// Returns `ValidationError` when no field is provided or the record is
/// deleted, `NotFound` when it does not exist, and `Conflict` after
/// exhausting retries.
#[tracing::instrument(skip(conn, fields))]
pub async fn update_case_study(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    fields: &ContentFields,
) -> ServiceResult<CaseStudy> {
    if fields.is_empty() {
        return Err(ServiceError::ValidationError(
            "No fields to update".to_string(),
        ));
    }

    let mut attempt = 1;
    loop {
        match update_once(conn, id, fields).await {
            Err(ServiceError::Conflict(message)) if attempt < MAX_SAVE_ATTEMPTS => {
                tracing::warn!(attempt, %message, "Case study update lost a race, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn update_once(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    fields: &ContentFields,
) -> ServiceResult<CaseStudy> {
    let status = fields.status().map(ContentStatus::from);
    let editors_choice = fields.editors_choice();
    let preview = fields.preview_with_title();

    with_transaction(conn, |tx| {
        async move {
            let existing = case_study::find(tx, id).await?.ok_or_else(not_found)?;
            if existing.is_deleted() {
                return Err(ServiceError::ValidationError(
                    "Cannot update deleted case study".to_string(),
                ));
            }
            let now = Utc::now();

            let slug_source = fields
                .requested_slug()
                .map(ToString::to_string)
                .or_else(|| fields.renamed_title(&existing.content));
            let slug = match slug_source {
                Some(source) => Some(
                    assign_unique_slug(
                        &source,
                        &mut ActiveSlugs::new(tx, ContentKind::CaseStudy, Some(id)),
                    )
                    .await?,
                ),
                None => None,
            };

            if editors_choice == Some(true) && !existing.editors_choice {
                case_study::clear_editors_choice(tx, now).await?;
            }

            let changes = CaseStudyChangeset {
                content: fields.content.as_ref(),
                status,
                content_type: None,
                published_at: status
                    .and_then(|status| first_publication(status, existing.published_at, now)),
                keyword: fields.keyword.as_ref().map(Some),
                preview: preview.as_ref(),
                slug: slug.as_deref(),
                redirect_url: fields.redirect_url.as_deref().map(Some),
                pdf_url: fields.pdf_url.as_deref().map(Some),
                category: fields.category.as_deref().map(Some),
                editors_choice,
                updated_at: Some(now),
            };
            let record = case_study::update(tx, id, &changes).await?;

            tracing::info!(%id, slug = %record.slug, "Case study updated");
            Ok(record)
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Summary
/// Flips the editor's choice flag. Setting it clears the previous holder in
/// the same transaction.
///
/// ## Errors
/// Returns `NotFound`, `ValidationError` for a deleted record, or `Conflict`
/// if another writer set the flag concurrently.
#[tracing::instrument(skip(conn))]
pub async fn toggle_editors_choice(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> ServiceResult<CaseStudy> {
    with_transaction(conn, |tx| {
        async move {
            let existing = case_study::find(tx, id).await?.ok_or_else(not_found)?;
            if existing.is_deleted() {
                return Err(ServiceError::ValidationError(
                    "Cannot modify deleted case study".to_string(),
                ));
            }

            let now = Utc::now();
            let enable = !existing.editors_choice;
            if enable {
                let cleared = case_study::clear_editors_choice(tx, now).await?;
                tracing::debug!(cleared, "Cleared previous editor's choice");
            }

            let changes = CaseStudyChangeset {
                editors_choice: Some(enable),
                updated_at: Some(now),
                ..Default::default()
            };
            let record = case_study::update(tx, id, &changes).await?;

            tracing::info!(%id, editors_choice = enable, "Editor's choice toggled");
            Ok(record)
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Summary
/// Soft-deletes a case study, or removes it for good when `permanent` is set.
///
/// ## Errors
/// Returns `NotFound`, or `ValidationError` when soft-deleting a record that
/// is already deleted.
#[tracing::instrument(skip(conn))]
pub async fn delete_case_study(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    permanent: bool,
) -> ServiceResult<()> {
    let existing = case_study::find(conn, id).await?.ok_or_else(not_found)?;

    if permanent {
        tracing::warn!(%id, slug = %existing.slug, "Permanently deleting case study");
        case_study::hard_delete(conn, id).await?;
        return Ok(());
    }

    if existing.is_deleted() {
        return Err(ServiceError::ValidationError(
            "Case study is already deleted".to_string(),
        ));
    }

    case_study::soft_delete(conn, id, Utc::now()).await?;
    tracing::info!(%id, "Case study deleted");
    Ok(())
}

/// ## Summary
/// Restores a soft-deleted case study.
///
/// ## Errors
/// Returns `NotFound`, `ValidationError` when the record is not deleted, or
/// `Conflict` when an active record took its slug in the meantime.
#[tracing::instrument(skip(conn))]
pub async fn restore_case_study(conn: &mut AsyncPgConnection, id: Uuid) -> ServiceResult<()> {
    let existing = case_study::find(conn, id).await?.ok_or_else(not_found)?;
    if !existing.is_deleted() {
        return Err(ServiceError::ValidationError(
            "Case study is not deleted".to_string(),
        ));
    }

    case_study::restore(conn, id, Utc::now())
        .await
        .map_err(|e| {
            ServiceError::from(e).into_conflict(&format!(
                "An active case study already uses the slug '{}'",
                existing.slug
            ))
        })?;

    tracing::info!(%id, "Case study restored");
    Ok(())
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_admin(
    conn: &mut AsyncPgConnection,
    include_deleted: bool,
) -> ServiceResult<Vec<CaseStudy>> {
    Ok(case_study::list_admin(conn, include_deleted).await?)
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_editors_choice(conn: &mut AsyncPgConnection) -> ServiceResult<Vec<CaseStudy>> {
    Ok(case_study::list_editors_choice(conn).await?)
}

/// ## Summary
/// Loads one page of the public portfolio. An unknown `category` key lists
/// every category.
///
/// ## Errors
/// Returns a database error if a query fails.
#[tracing::instrument(skip(conn, categories))]
pub async fn list_published(
    conn: &mut AsyncPgConnection,
    categories: &CategoryTable,
    window: PageWindow,
    category: Option<&str>,
) -> ServiceResult<Paginated<CaseStudy>> {
    let filter = category.and_then(|key| categories.filter_values(key));
    if category.is_some() && filter.is_none() {
        tracing::debug!(?category, "Unknown category, listing all");
    }

    let total_count = case_study::count_published(conn, filter.as_deref()).await?;
    let items =
        case_study::list_published_page(conn, filter.as_deref(), window.per_page, window.offset())
            .await?;

    Ok(Paginated::new(items, window, total_count))
}

/// ## Summary
/// Returns the case study featured on the home page, if any is published.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn featured(conn: &mut AsyncPgConnection) -> ServiceResult<Option<CaseStudy>> {
    Ok(case_study::featured(conn).await?)
}

/// ## Summary
/// Whether an active case study offers `url` as its PDF. Both the URL as
/// requested and its normalised form are compared with the stored value.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn offers_pdf(conn: &mut AsyncPgConnection, requested: &str, normalised: &str) -> ServiceResult<bool> {
    let mut urls = vec![requested.to_string()];
    if normalised != requested {
        urls.push(normalised.to_string());
    }
    Ok(case_study::pdf_url_in_use(conn, &urls).await?)
}

/// ## Summary
/// Loads a public case study by slug.
///
/// ## Errors
/// Returns `NotFound` when no published, active record has this slug.
pub async fn published_by_slug(conn: &mut AsyncPgConnection, slug: &str) -> ServiceResult<CaseStudy> {
    case_study::find_by_slug(conn, slug)
        .await?
        .filter(CaseStudy::is_public)
        .ok_or_else(not_found)
}

/// ## Summary
/// Loads a public case study by ID.
///
/// ## Errors
/// Returns `NotFound` when the record is missing, unpublished or deleted.
pub async fn published_by_id(conn: &mut AsyncPgConnection, id: Uuid) -> ServiceResult<CaseStudy> {
    case_study::find(conn, id)
        .await?
        .filter(CaseStudy::is_public)
        .ok_or_else(not_found)
}
