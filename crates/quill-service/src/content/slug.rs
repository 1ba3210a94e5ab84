use diesel_async::AsyncPgConnection;
use quill_core::types::ContentKind;
use quill_core::util::slug::SlugLookup;
use quill_db::db::query::{blog_post, case_study};

use crate::error::{ServiceError, ServiceResult};

/// Slug lookup over the active records of one content kind.
///
/// `exclude` is the record being renamed, so that it does not collide with
/// its own slug.
pub struct ActiveSlugs<'c> {
    conn: &'c mut AsyncPgConnection,
    kind: ContentKind,
    exclude: Option<uuid::Uuid>,
}

impl<'c> ActiveSlugs<'c> {
    #[must_use]
    pub fn new(
        conn: &'c mut AsyncPgConnection,
        kind: ContentKind,
        exclude: Option<uuid::Uuid>,
    ) -> Self {
        Self {
            conn,
            kind,
            exclude,
        }
    }
}

impl SlugLookup for ActiveSlugs<'_> {
    type Error = ServiceError;

    async fn slug_exists(&mut self, candidate: &str) -> ServiceResult<bool> {
        let taken = match self.kind {
            ContentKind::CaseStudy => {
                case_study::slug_taken(self.conn, candidate, self.exclude).await?
            }
            ContentKind::BlogPost => blog_post::slug_taken(self.conn, candidate, self.exclude).await?,
        };

        tracing::trace!(kind = %self.kind, candidate, taken, "Probed slug");
        Ok(taken)
    }
}
