//! Page shells and placeholder substitution.
//!
//! Shells are plain HTML files read from the configured pages directory at
//! startup. A page whose file is missing falls back to a minimal built-in
//! shell carrying the same placeholders.

use std::path::Path;

use crate::error::{RenderError, RenderResult};

/// Placeholders recognised in the page shells.
pub mod placeholder {
    pub const PAGE_TITLE: &str = "[[[title]]]";
    pub const HEAD: &str = "[[head]]";
    pub const BODY: &str = "[[total_body]]";

    pub const CASE_STUDIES: &str = "<!-- CASE STUDIES WILL BE INSERTED HERE DYNAMICALLY -->";
    pub const PAGINATION: &str = "<!-- PAGINATION WILL BE GENERATED DYNAMICALLY -->";
    pub const CATEGORY_FILTER: &str = "<!-- CATEGORY FILTER WILL BE INSERTED HERE -->";

    pub const BLOG_CARDS: &str = "<!-- BLOGS WILL BE INSERTED HERE DYNAMICALLY -->";

    pub const HOME_BLOGS: &str =
        "<!-- TOP EDITOR'S CHOICE BLOGS WILL BE INSERTED HERE DYNAMICALLY -->";
    pub const HOME_CASE_STUDY_TITLE: &str =
        "<!-- CASE STUDY TITLE WILL BE INSERTED HERE DYNAMICALLY -->";
    pub const HOME_CASE_STUDY_SUMMARY: &str =
        "<!-- CASE STUDY SUMMARY WILL BE INSERTED HERE DYNAMICALLY -->";
    pub const HOME_READ_MORE: &str = "<!-- READ MORE BUTTON WILL BE INSERTED HERE DYNAMICALLY -->";
    pub const HOME_IMAGE_URL: &str = "[[[imageURL]]]";
}

/// Server-rendered pages that use a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    Portfolio,
    Blog,
    BlogList,
    CaseStudy,
}

impl PageKind {
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Portfolio,
        Self::Blog,
        Self::BlogList,
        Self::CaseStudy,
    ];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Home => "home.html",
            Self::Portfolio => "portfolio.html",
            Self::Blog => "blog.html",
            Self::BlogList => "blogs.html",
            Self::CaseStudy => "case_study.html",
        }
    }

    const fn builtin(self) -> &'static str {
        match self {
            Self::Home => BUILTIN_HOME,
            Self::Portfolio => BUILTIN_PORTFOLIO,
            Self::Blog => BUILTIN_BLOG,
            Self::BlogList => BUILTIN_BLOG_LIST,
            Self::CaseStudy => BUILTIN_CASE_STUDY,
        }
    }
}

/// Loaded page shells, one per [`PageKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplates {
    home: String,
    portfolio: String,
    blog: String,
    blog_list: String,
    case_study: String,
}

impl Default for PageTemplates {
    fn default() -> Self {
        Self {
            home: PageKind::Home.builtin().to_string(),
            portfolio: PageKind::Portfolio.builtin().to_string(),
            blog: PageKind::Blog.builtin().to_string(),
            blog_list: PageKind::BlogList.builtin().to_string(),
            case_study: PageKind::CaseStudy.builtin().to_string(),
        }
    }
}

impl PageTemplates {
    /// ## Summary
    /// Reads every shell from `dir`, using the built-in shell for files that do
    /// not exist.
    ///
    /// ## Errors
    /// Returns `TemplateRead` if a file exists but cannot be read.
    #[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn load(dir: impl AsRef<Path>) -> RenderResult<Self> {
        let dir = dir.as_ref();
        let mut templates = Self::default();

        for kind in PageKind::ALL {
            let path = dir.join(kind.file_name());
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => {
                    tracing::debug!(path = %path.display(), "Loaded page template");
                    *templates.slot_mut(kind) = contents;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "Page template missing, using built-in shell");
                }
                Err(source) => {
                    return Err(RenderError::TemplateRead {
                        name: kind.file_name(),
                        source,
                    });
                }
            }
        }

        Ok(templates)
    }

    #[must_use]
    pub fn get(&self, kind: PageKind) -> &str {
        match kind {
            PageKind::Home => &self.home,
            PageKind::Portfolio => &self.portfolio,
            PageKind::Blog => &self.blog,
            PageKind::BlogList => &self.blog_list,
            PageKind::CaseStudy => &self.case_study,
        }
    }

    const fn slot_mut(&mut self, kind: PageKind) -> &mut String {
        match kind {
            PageKind::Home => &mut self.home,
            PageKind::Portfolio => &mut self.portfolio,
            PageKind::Blog => &mut self.blog,
            PageKind::BlogList => &mut self.blog_list,
            PageKind::CaseStudy => &mut self.case_study,
        }
    }
}

/// ## Summary
/// Replaces every occurrence of each placeholder in a single pass over the
/// shell.
///
/// Replacement values are inserted verbatim and never scanned again, so a
/// value that itself contains a placeholder is left as written. Callers
/// escape values first. When two placeholders start at the same offset the
/// longer one wins.
#[must_use]
pub fn fill(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut page = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((at, placeholder, value)) = next_placeholder(rest, replacements) {
        page.push_str(&rest[..at]);
        page.push_str(value);
        rest = &rest[at + placeholder.len()..];
    }

    page.push_str(rest);
    page
}

fn next_placeholder<'a>(
    haystack: &str,
    replacements: &[(&'a str, &'a str)],
) -> Option<(usize, &'a str, &'a str)> {
    replacements
        .iter()
        .filter(|(placeholder, _)| !placeholder.is_empty())
        .filter_map(|&(placeholder, value)| {
            haystack
                .find(placeholder)
                .map(|at| (at, placeholder, value))
        })
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.len().cmp(&a.1.len())))
}

const BUILTIN_HOME: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Home</title>
</head>
<body>
    <main>
        <section class="featured-case-study">
            <img src="[[[imageURL]]]" alt="Featured case study" />
            <!-- CASE STUDY TITLE WILL BE INSERTED HERE DYNAMICALLY -->
            <!-- CASE STUDY SUMMARY WILL BE INSERTED HERE DYNAMICALLY -->
            <!-- READ MORE BUTTON WILL BE INSERTED HERE DYNAMICALLY -->
        </section>
        <section class="insights">
            <!-- TOP EDITOR'S CHOICE BLOGS WILL BE INSERTED HERE DYNAMICALLY -->
        </section>
    </main>
</body>
</html>
"#;

const BUILTIN_PORTFOLIO: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Case Studies</title>
</head>
<body>
    <main>
        <!-- CATEGORY FILTER WILL BE INSERTED HERE -->
        <div class="case-studies-grid">
            <!-- CASE STUDIES WILL BE INSERTED HERE DYNAMICALLY -->
        </div>
        <!-- PAGINATION WILL BE GENERATED DYNAMICALLY -->
    </main>
</body>
</html>
"#;

const BUILTIN_BLOG: &str = r#"<!doctype html>
<html lang="en" class="scroll-smooth w-full">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>[[[title]]]</title>
</head>
<body>
    <main>
        [[total_body]]
    </main>
</body>
</html>
"#;

const BUILTIN_BLOG_LIST: &str = r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Blog</title>
</head>
<body>
    <main>
        <div class="blog-grid">
            <!-- BLOGS WILL BE INSERTED HERE DYNAMICALLY -->
        </div>
    </main>
</body>
</html>
"#;

const BUILTIN_CASE_STUDY: &str = r##"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    [[head]]
</head>
<body>
    <a href="#main" class="visually-hidden">Skip to content</a>
    <main id="main" class="wrap" role="main" aria-labelledby="title">
        [[total_body]]
    </main>
</body>
</html>
"##;
