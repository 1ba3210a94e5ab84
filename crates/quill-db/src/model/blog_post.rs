use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde_json::Value;

use crate::db::{enums::ContentStatus, schema};

/// Blog post. `content` holds the admin panel document, including the
/// `dynamicSections` block list.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::blog_post)]
#[diesel(check_for_backend(Pg))]
pub struct BlogPost {
    pub id: uuid::Uuid,
    pub content: Value,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub slug: String,
    pub category: Option<String>,
    pub editors_choice: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.status.is_published() && self.deleted_at.is_none()
    }

    #[must_use]
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::blog_post)]
pub struct NewBlogPost<'a> {
    pub id: uuid::Uuid,
    pub content: &'a Value,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub slug: &'a str,
    pub category: Option<&'a str>,
    pub editors_choice: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = schema::blog_post)]
pub struct BlogPostChangeset<'a> {
    pub content: Option<&'a Value>,
    pub status: Option<ContentStatus>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub slug: Option<&'a str>,
    pub category: Option<Option<&'a str>>,
    pub editors_choice: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = schema::blog_post)]
#[diesel(check_for_backend(Pg))]
pub struct BlogPostSitemapEntry {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}
