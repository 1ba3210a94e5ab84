//! Blog post workflows. They mirror the case study ones; posts keep their
//! preview inside the content document and have no PDF or redirect columns.

use chrono::Utc;
use diesel_async::AsyncPgConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use quill_core::constants::{MAX_SAVE_ATTEMPTS, MORE_BLOGS_LIMIT};
use quill_core::error::CoreError;
use quill_core::types::ContentKind;
use quill_core::util::slug::assign_unique_slug;
use quill_db::db::enums::ContentStatus;
use quill_db::db::query::blog_post;
use quill_db::db::transaction::with_transaction;
use quill_db::model::blog_post::{BlogPost, BlogPostChangeset, NewBlogPost};
use serde_json::Value;
use uuid::Uuid;

use crate::content::document::{AdminDocument, ContentFields, SaveMode};
use crate::content::slug::ActiveSlugs;
use crate::content::{Saved, first_publication};
use crate::error::{ServiceError, ServiceResult};

/// Number of posts on the home page.
pub const HOME_POSTS_LIMIT: i64 = 3;

/// Number of posts on the `/blogs` index.
pub const INDEX_POSTS_LIMIT: i64 = 100;

const PREVIEW_FIELD: &str = "previewData";

const CONFLICT_MESSAGE: &str =
    "Another blog post took this slug or the editor's choice flag, please retry";

fn not_found() -> ServiceError {
    ServiceError::NotFound("Blog not found".to_string())
}

/// ## Summary
/// Creates or updates a blog post from an admin panel document.
///
/// ## Errors
/// Returns `NotFound` when the post to update is missing or deleted,
/// `CoreError` for an unusable title, and `Conflict` if every attempt lost a
/// race on a unique index.
#[tracing::instrument(skip(conn, document), fields(title = %document.title, mode = ?document.mode))]
pub async fn save_blog(
    conn: &mut AsyncPgConnection,
    document: &AdminDocument,
) -> ServiceResult<Saved<BlogPost>> {
    let mut attempt = 1;
    loop {
        match save_once(conn, document).await {
            Err(ServiceError::Conflict(message)) if attempt < MAX_SAVE_ATTEMPTS => {
                tracing::warn!(attempt, %message, "Blog save lost a race, retrying");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// The stored document: the admin content with the preview put back.
#[must_use]
pub fn stored_content(document: &AdminDocument) -> Value {
    let mut content = document.content.clone();
    if let Value::Object(fields) = &mut content {
        fields.insert(PREVIEW_FIELD.to_string(), document.preview.clone());
    }
    content
}

async fn save_once(
    conn: &mut AsyncPgConnection,
    document: &AdminDocument,
) -> ServiceResult<Saved<BlogPost>> {
    let content = stored_content(document);
    let status = ContentStatus::from(document.status);

    with_transaction(conn, |tx| {
        async move {
            let now = Utc::now();
            let exclude = match document.mode {
                SaveMode::Create => None,
                SaveMode::Update(id) => Some(id),
            };

            let existing = match exclude {
                Some(id) => Some(
                    blog_post::find(tx, id)
                        .await?
                        .filter(|post| !post.is_deleted())
                        .ok_or_else(|| {
                            ServiceError::NotFound("Blog not found for update".to_string())
                        })?,
                ),
                None => None,
            };

            let slug = assign_unique_slug(
                &document.title,
                &mut ActiveSlugs::new(tx, ContentKind::BlogPost, exclude),
            )
            .await?;

            let holds_flag = existing.as_ref().is_some_and(|post| post.editors_choice);
            if document.editors_choice && !holds_flag {
                blog_post::clear_editors_choice(tx, now).await?;
            }

            let Some(existing) = existing else {
                let new_post = NewBlogPost {
                    id: Uuid::now_v7(),
                    content: &content,
                    status,
                    published_at: status.is_published().then_some(now),
                    slug: &slug,
                    category: document.category.as_deref(),
                    editors_choice: document.editors_choice,
                };
                let record = blog_post::insert(tx, &new_post).await?;

                tracing::info!(id = %record.id, slug = %record.slug, "Blog post created");
                return Ok(Saved {
                    record,
                    created: true,
                });
            };

            let changes = BlogPostChangeset {
                content: Some(&content),
                status: Some(status),
                published_at: first_publication(status, existing.published_at, now),
                slug: Some(&slug),
                category: Some(document.category.as_deref()),
                editors_choice: Some(document.editors_choice),
                updated_at: Some(now),
            };
            let record = blog_post::update(tx, existing.id, &changes).await?;

            if record.slug != existing.slug {
                tracing::info!(id = %record.id, from = %existing.slug, to = %record.slug, "Blog post renamed");
            }
            Ok(Saved {
                record,
                created: false,
            })
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Summary
/// Creates a blog post from the JSON API.
///
/// ## Errors
/// Returns `ValidationError` when `blogContent` is missing or empty,
/// `CoreError` when no slug source is usable, and `Conflict` after
/// exhausting retries.
#[tracing::instrument(skip(conn, fields))]
pub async fn create_blog(
    conn: &mut AsyncPgConnection,
    fields: &ContentFields,
) -> ServiceResult<BlogPost> {
    let content = fields
        .content()
        .ok_or_else(|| ServiceError::ValidationError("Blog content is required".to_string()))?;
    let slug_source = fields
        .requested_slug()
        .map(ToString::to_string)
        .or_else(|| fields.title())
        .ok_or_else(|| CoreError::InvalidInput("title is required".to_string()))?;

    let mut attempt = 1;
    loop {
        match create_once(conn, fields, content, &slug_source).await {
            Err(ServiceError::Conflict(message)) if attempt < MAX_SAVE_ATTEMPTS => {
                tracing::warn!(attempt, %message, "Blog create lost a race, retrying");
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
) -> ServiceResult<BlogPost> {
    let status = ContentStatus::from(fields.status().unwrap_or_default());
    let editors_choice = fields.editors_choice().unwrap_or(false);

    with_transaction(conn, |tx| {
        async move {
            let now = Utc::now();
            let slug = assign_unique_slug(
                slug_source,
                &mut ActiveSlugs::new(tx, ContentKind::BlogPost, None),
            )
            .await?;

            if editors_choice {
                blog_post::clear_editors_choice(tx, now).await?;
            }

            let new_post = NewBlogPost {
                id: Uuid::now_v7(),
                content,
                status,
                published_at: status.is_published().then_some(now),
                slug: &slug,
                category: fields.category(),
                editors_choice,
            };
            let record = blog_post::insert(tx, &new_post).await?;

            tracing::info!(id = %record.id, slug = %record.slug, "Blog post created");
            Ok(record)
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Summary
/// Applies the provided fields to an active blog post. A new `slug`, or a
/// changed `blogTitle`, re-assigns the slug.
///
/// ## Errors
/// Returns `ValidationError` when no field is provided or the post is
/// deleted, `NotFound` when it does not exist, and `Conflict` after
/// exhausting retries.
#[tracing::instrument(skip(conn, fields))]
pub async fn update_blog(
    conn: &mut AsyncPgConnection,
    id: Uuid,
    fields: &ContentFields,
) -> ServiceResult<BlogPost> {
    if fields.is_empty() {
        return Err(ServiceError::ValidationError(
            "No fields to update".to_string(),
        ));
    }

    let mut attempt = 1;
    loop {
        match update_once(conn, id, fields).await {
            Err(ServiceError::Conflict(message)) if attempt < MAX_SAVE_ATTEMPTS => {
                tracing::warn!(attempt, %message, "Blog update lost a race, retrying");
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
) -> ServiceResult<BlogPost> {
    let status = fields.status().map(ContentStatus::from);
    let editors_choice = fields.editors_choice();

    with_transaction(conn, |tx| {
        async move {
            let existing = blog_post::find(tx, id).await?.ok_or_else(not_found)?;
            if existing.is_deleted() {
                return Err(ServiceError::ValidationError(
                    "Cannot update deleted blog".to_string(),
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
                        &mut ActiveSlugs::new(tx, ContentKind::BlogPost, Some(id)),
                    )
                    .await?,
                ),
                None => None,
            };

            if editors_choice == Some(true) && !existing.editors_choice {
                blog_post::clear_editors_choice(tx, now).await?;
            }

            let changes = BlogPostChangeset {
                content: fields.content.as_ref(),
                status,
                published_at: status
                    .and_then(|status| first_publication(status, existing.published_at, now)),
                slug: slug.as_deref(),
                category: fields.category.as_deref().map(Some),
                editors_choice,
                updated_at: Some(now),
            };
            let record = blog_post::update(tx, id, &changes).await?;

            tracing::info!(%id, slug = %record.slug, "Blog post updated");
            Ok(record)
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Summary
/// Flips the editor's choice flag of a post, clearing the previous holder.
///
/// ## Errors
/// Returns `NotFound`, `ValidationError` for a deleted post, or `Conflict`.
#[tracing::instrument(skip(conn))]
pub async fn toggle_editors_choice(conn: &mut AsyncPgConnection, id: Uuid) -> ServiceResult<BlogPost> {
    with_transaction(conn, |tx| {
        async move {
            let existing = blog_post::find(tx, id).await?.ok_or_else(not_found)?;
            if existing.is_deleted() {
                return Err(ServiceError::ValidationError(
                    "Cannot modify deleted blog".to_string(),
                ));
            }

            let now = Utc::now();
            let enable = !existing.editors_choice;
            if enable {
                blog_post::clear_editors_choice(tx, now).await?;
            }

            let changes = BlogPostChangeset {
                editors_choice: Some(enable),
                updated_at: Some(now),
                ..Default::default()
            };
            let record = blog_post::update(tx, id, &changes).await?;

            tracing::info!(%id, editors_choice = enable, "Editor's choice toggled");
            Ok(record)
        }
        .scope_boxed()
    })
    .await
    .map_err(|e: ServiceError| e.into_conflict(CONFLICT_MESSAGE))
}

/// ## Errors
/// Returns `NotFound`, or `ValidationError` when soft-deleting a post that
/// is already deleted.
#[tracing::instrument(skip(conn))]
pub async fn delete_blog(conn: &mut AsyncPgConnection, id: Uuid, permanent: bool) -> ServiceResult<()> {
    let existing = blog_post::find(conn, id).await?.ok_or_else(not_found)?;

    if permanent {
        tracing::warn!(%id, slug = %existing.slug, "Permanently deleting blog post");
        blog_post::hard_delete(conn, id).await?;
        return Ok(());
    }

    if existing.is_deleted() {
        return Err(ServiceError::ValidationError(
            "Blog is already deleted".to_string(),
        ));
    }

    blog_post::soft_delete(conn, id, Utc::now()).await?;
    tracing::info!(%id, "Blog post deleted");
    Ok(())
}

/// ## Errors
/// Returns `NotFound`, `ValidationError` when the post is not deleted, or
/// `Conflict` when an active post took its slug in the meantime.
#[tracing::instrument(skip(conn))]
pub async fn restore_blog(conn: &mut AsyncPgConnection, id: Uuid) -> ServiceResult<()> {
    let existing = blog_post::find(conn, id).await?.ok_or_else(not_found)?;
    if !existing.is_deleted() {
        return Err(ServiceError::ValidationError(
            "Blog is not deleted".to_string(),
        ));
    }

    blog_post::restore(conn, id, Utc::now())
        .await
        .map_err(|e| {
            ServiceError::from(e).into_conflict(&format!(
                "An active blog already uses the slug '{}'",
                existing.slug
            ))
        })?;

    tracing::info!(%id, "Blog post restored");
    Ok(())
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_admin(
    conn: &mut AsyncPgConnection,
    include_deleted: bool,
) -> ServiceResult<Vec<BlogPost>> {
    Ok(blog_post::list_admin(conn, include_deleted).await?)
}

/// ## Summary
/// Posts shown on the home page, editor's choice first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn home_posts(conn: &mut AsyncPgConnection) -> ServiceResult<Vec<BlogPost>> {
    Ok(blog_post::list_published(conn, HOME_POSTS_LIMIT).await?)
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn index_posts(conn: &mut AsyncPgConnection) -> ServiceResult<Vec<BlogPost>> {
    Ok(blog_post::list_published(conn, INDEX_POSTS_LIMIT).await?)
}

/// ## Summary
/// The "more blogs" cards shown under `slug`.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn more_posts(conn: &mut AsyncPgConnection, slug: &str) -> ServiceResult<Vec<BlogPost>> {
    Ok(blog_post::list_more(conn, slug, MORE_BLOGS_LIMIT).await?)
}

/// ## Summary
/// Loads a public post by slug.
///
/// ## Errors
/// Returns `NotFound` when no published, active post has this slug.
pub async fn published_by_slug(conn: &mut AsyncPgConnection, slug: &str) -> ServiceResult<BlogPost> {
    blog_post::find_by_slug(conn, slug)
        .await?
        .filter(BlogPost::is_public)
        .ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use quill_core::types::ContentStatus as CoreStatus;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stored_content_keeps_preview() {
        let document = AdminDocument::parse(json!({
            "blogTitle": "Hello",
            "blogStatus": "published",
            "previewData": { "blogSummary": "Short" },
            "dynamicSections": [],
        }))
        .expect("valid document");
        assert_eq!(document.status, CoreStatus::Published);

        let content = stored_content(&document);

        assert_eq!(
            content.get(PREVIEW_FIELD),
            Some(&json!({ "blogSummary": "Short", "blogTitle": "Hello" }))
        );
        assert!(content.get("dynamicSections").is_some());
    }
}
