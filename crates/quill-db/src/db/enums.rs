//! Database enum types with Diesel serialization.
//!
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Publication status of a blog post or case study.
///
/// Maps to the `status` CHECK constraint of both content tables.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Published,
}

impl ToSql<Text, Pg> for ContentStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for ContentStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"draft" => Ok(Self::Draft),
            b"published" => Ok(Self::Published),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ContentStatus {
    /// Returns the database string representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    #[must_use]
    pub const fn is_published(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ContentStatus> for quill_core::types::ContentStatus {
    fn from(db_status: ContentStatus) -> Self {
        match db_status {
            ContentStatus::Draft => Self::Draft,
            ContentStatus::Published => Self::Published,
        }
    }
}

impl From<quill_core::types::ContentStatus> for ContentStatus {
    fn from(core_status: quill_core::types::ContentStatus) -> Self {
        match core_status {
            quill_core::types::ContentStatus::Draft => Self::Draft,
            quill_core::types::ContentStatus::Published => Self::Published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings_match_check_constraint() {
        assert_eq!(ContentStatus::Draft.as_str(), "draft");
        assert_eq!(ContentStatus::Published.as_str(), "published");
        assert_eq!(ContentStatus::Published.to_string(), "published");
    }

    #[test]
    fn test_core_conversions() {
        let core: quill_core::types::ContentStatus = ContentStatus::Published.into();
        assert_eq!(core, quill_core::types::ContentStatus::Published);

        let db: ContentStatus = quill_core::types::ContentStatus::Draft.into();
        assert_eq!(db, ContentStatus::Draft);
        assert!(!db.is_published());
    }
}
