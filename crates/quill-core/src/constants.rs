/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const BLOG_ROUTE_COMPONENT: &str = "blog";
pub const BLOG_ROUTE_PREFIX: &str = const_str::concat!("/", BLOG_ROUTE_COMPONENT);

pub const BLOG_LIST_ROUTE_COMPONENT: &str = "blogs";
pub const BLOG_LIST_ROUTE_PREFIX: &str = const_str::concat!("/", BLOG_LIST_ROUTE_COMPONENT);

pub const CASE_STUDY_ROUTE_COMPONENT: &str = "case-study";
pub const CASE_STUDY_ROUTE_PREFIX: &str = const_str::concat!("/", CASE_STUDY_ROUTE_COMPONENT);

pub const PORTFOLIO_ROUTE_COMPONENT: &str = "case-studies";
pub const PORTFOLIO_ROUTE_PREFIX: &str = const_str::concat!("/", PORTFOLIO_ROUTE_COMPONENT);

pub const DOWNLOAD_PROXY_ROUTE_COMPONENT: &str = "download_proxy";
pub const DOWNLOAD_PROXY_ROUTE_PREFIX: &str =
    const_str::concat!("/", DOWNLOAD_PROXY_ROUTE_COMPONENT);

/// Value of the `content_type` column for portfolio case studies.
pub const CASE_STUDY_CONTENT_TYPE: &str = "CASE STUDY";

/// Portfolio page size used by the server-rendered portfolio and the paginated API default.
pub const DEFAULT_PER_PAGE: i64 = 4;
pub const MAX_PER_PAGE: i64 = 20;

/// Number of "more blogs" cards rendered under a blog post.
pub const MORE_BLOGS_LIMIT: i64 = 3;

/// Number of times a content save is re-run after losing a slug race.
pub const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Largest upstream body the download proxy will relay.
pub const MAX_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;
