use serde::{Deserialize, Serialize};

use crate::constants::{BLOG_ROUTE_PREFIX, CASE_STUDY_ROUTE_PREFIX};

/// Publication status without database dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
}

impl ContentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Parses the status sent by the admin panel. Anything that is not
    /// `published` (case-insensitive) is treated as a draft.
    #[must_use]
    pub fn from_admin(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("published") {
            Self::Published
        } else {
            Self::Draft
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of slugged content the site publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    BlogPost,
    CaseStudy,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlogPost => "blog post",
            Self::CaseStudy => "case study",
        }
    }

    /// ## Summary
    /// Returns the public URL path of a record of this kind, `/{content-type}/{slug}`.
    #[must_use]
    pub fn public_path(self, slug: &str) -> String {
        match self {
            Self::BlogPost => format!("{BLOG_ROUTE_PREFIX}/{slug}"),
            Self::CaseStudy => format!("{CASE_STUDY_ROUTE_PREFIX}/{slug}"),
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
