use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde_json::Value;

use crate::db::{enums::ContentStatus, schema};

/// Portfolio case study. `content` holds the admin panel document as sent.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::case_study)]
#[diesel(check_for_backend(Pg))]
pub struct CaseStudy {
    pub id: uuid::Uuid,
    pub content: Value,
    pub status: ContentStatus,
    pub content_type: String,
    pub published_at: Option<DateTime<Utc>>,
    pub keyword: Option<Value>,
    pub preview: Value,
    pub slug: String,
    pub redirect_url: Option<String>,
    pub pdf_url: Option<String>,
    pub category: Option<String>,
    pub editors_choice: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CaseStudy {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Published and not deleted.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.status.is_published() && self.deleted_at.is_none()
    }

    /// Date shown on the page: the publication date, or creation for older rows.
    #[must_use]
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }
}

/// Insert struct for creating new case studies
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::case_study)]
pub struct NewCaseStudy<'a> {
    pub id: uuid::Uuid,
    pub content: &'a Value,
    pub status: ContentStatus,
    pub content_type: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub keyword: Option<&'a Value>,
    pub preview: &'a Value,
    pub slug: &'a str,
    pub redirect_url: Option<&'a str>,
    pub pdf_url: Option<&'a str>,
    pub category: Option<&'a str>,
    pub editors_choice: bool,
}

/// Partial update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = schema::case_study)]
pub struct CaseStudyChangeset<'a> {
    pub content: Option<&'a Value>,
    pub status: Option<ContentStatus>,
    pub content_type: Option<&'a str>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub keyword: Option<Option<&'a Value>>,
    pub preview: Option<&'a Value>,
    pub slug: Option<&'a str>,
    pub redirect_url: Option<Option<&'a str>>,
    pub pdf_url: Option<Option<&'a str>>,
    pub category: Option<Option<&'a str>>,
    pub editors_choice: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Slug and last modification, for the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = schema::case_study)]
#[diesel(check_for_backend(Pg))]
pub struct CaseStudySitemapEntry {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}
