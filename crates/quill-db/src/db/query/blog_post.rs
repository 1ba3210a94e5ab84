//! Query builders and statements for blog posts.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::enums::ContentStatus;
use crate::db::schema::blog_post;
use crate::model::blog_post::{BlogPost, BlogPostChangeset, BlogPostSitemapEntry, NewBlogPost};

#[must_use]
pub fn all() -> blog_post::BoxedQuery<'static, diesel::pg::Pg> {
    blog_post::table.into_boxed()
}

#[must_use]
pub fn by_id(id: uuid::Uuid) -> blog_post::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(blog_post::id.eq(id))
}

#[must_use]
pub fn not_deleted() -> blog_post::BoxedQuery<'static, diesel::pg::Pg> {
    all().filter(blog_post::deleted_at.is_null())
}

#[must_use]
pub fn by_slug(slug: &str) -> blog_post::BoxedQuery<'_, diesel::pg::Pg> {
    not_deleted().filter(blog_post::slug.eq(slug))
}

/// ## Summary
/// Returns a query for published, active posts.
#[must_use]
pub fn published() -> blog_post::BoxedQuery<'static, diesel::pg::Pg> {
    not_deleted().filter(blog_post::status.eq(ContentStatus::Published))
}

/// ## Summary
/// Loads a record by ID, deleted or not.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> diesel::QueryResult<Option<BlogPost>> {
    by_id(id).select(BlogPost::as_select()).first(conn).await.optional()
}

/// ## Summary
/// Loads the active record with a slug.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_by_slug(conn: &mut AsyncPgConnection, slug: &str) -> diesel::QueryResult<Option<BlogPost>> {
    by_slug(slug)
        .select(BlogPost::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Checks whether an active post already uses `slug`, ignoring `exclude`.
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
        query = query.filter(blog_post::id.ne(id));
    }

    let found: Option<uuid::Uuid> = query
        .select(blog_post::id)
        .first(conn)
        .await
        .optional()?;

    Ok(found.is_some())
}

/// ## Summary
/// Lists posts for the admin panel, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_admin(
    conn: &mut AsyncPgConnection,
    include_deleted: bool,
) -> diesel::QueryResult<Vec<BlogPost>> {
    let query = if include_deleted { all() } else { not_deleted() };

    query
        .order((
            blog_post::published_at.desc().nulls_last(),
            blog_post::created_at.desc(),
        ))
        .select(BlogPost::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists published posts, editor's choice first, then newest.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_published(
    conn: &mut AsyncPgConnection,
    limit: i64,
) -> diesel::QueryResult<Vec<BlogPost>> {
    published()
        .order((
            blog_post::editors_choice.desc(),
            blog_post::published_at.desc().nulls_last(),
            blog_post::created_at.desc(),
        ))
        .limit(limit)
        .select(BlogPost::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists the newest published posts other than `exclude_slug`, for the
/// "more blogs" cards.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_more(
    conn: &mut AsyncPgConnection,
    exclude_slug: &str,
    limit: i64,
) -> diesel::QueryResult<Vec<BlogPost>> {
    published()
        .filter(blog_post::slug.ne(exclude_slug.to_string()))
        .order((
            blog_post::published_at.desc().nulls_last(),
            blog_post::created_at.desc(),
        ))
        .limit(limit)
        .select(BlogPost::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_sitemap_entries(
    conn: &mut AsyncPgConnection,
) -> diesel::QueryResult<Vec<BlogPostSitemapEntry>> {
    published()
        .order(blog_post::published_at.desc().nulls_last())
        .select(BlogPostSitemapEntry::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails, including unique violations
/// on the active slug index.
pub async fn insert(
    conn: &mut AsyncPgConnection,
    new_post: &NewBlogPost<'_>,
) -> diesel::QueryResult<BlogPost> {
    diesel::insert_into(blog_post::table)
        .values(new_post)
        .returning(BlogPost::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns `NotFound` if no row has this ID, or a database error if the update fails.
pub async fn update(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    changes: &BlogPostChangeset<'_>,
) -> diesel::QueryResult<BlogPost> {
    diesel::update(blog_post::table.filter(blog_post::id.eq(id)))
        .set(changes)
        .returning(BlogPost::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn soft_delete(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(
        blog_post::table
            .filter(blog_post::id.eq(id))
            .filter(blog_post::deleted_at.is_null()),
    )
    .set((
        blog_post::deleted_at.eq(Some(now)),
        blog_post::editors_choice.eq(false),
        blog_post::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn restore(
    conn: &mut AsyncPgConnection,
    id: uuid::Uuid,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(
        blog_post::table
            .filter(blog_post::id.eq(id))
            .filter(blog_post::deleted_at.is_not_null()),
    )
    .set((
        blog_post::deleted_at.eq(None::<DateTime<Utc>>),
        blog_post::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}

/// ## Errors
/// Returns a database error if the delete fails.
pub async fn hard_delete(conn: &mut AsyncPgConnection, id: uuid::Uuid) -> diesel::QueryResult<usize> {
    diesel::delete(blog_post::table.filter(blog_post::id.eq(id)))
        .execute(conn)
        .await
}

/// ## Errors
/// Returns a database error if the update fails.
pub async fn clear_editors_choice(
    conn: &mut AsyncPgConnection,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::update(
        blog_post::table
            .filter(blog_post::editors_choice.eq(true))
            .filter(blog_post::deleted_at.is_null()),
    )
    .set((
        blog_post::editors_choice.eq(false),
        blog_post::updated_at.eq(now),
    ))
    .execute(conn)
    .await
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;

    use super::*;

    #[test_log::test]
    fn test_by_slug_ignores_deleted_rows() {
        let sql = debug_query::<Pg, _>(&by_slug("hello-world")).to_string();

        assert!(sql.contains("\"blog_post\".\"deleted_at\" IS NULL"), "{sql}");
        assert!(sql.contains("\"blog_post\".\"slug\" = $1"), "{sql}");
    }
}
