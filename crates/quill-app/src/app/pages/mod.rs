//! Server-rendered public pages.

mod blog;
mod case_study;
mod download_proxy;
mod home;
mod portfolio;
mod seo;
mod static_pages;

use quill_core::constants::{
    BLOG_LIST_ROUTE_COMPONENT, BLOG_ROUTE_COMPONENT, CASE_STUDY_ROUTE_COMPONENT,
    DOWNLOAD_PROXY_ROUTE_COMPONENT, PORTFOLIO_ROUTE_COMPONENT,
};
use salvo::http::StatusCode;
use salvo::writing::Text;
use salvo::{Depot, Request, Response, Router, Writer, async_trait};

use crate::error::AppError;

pub use download_proxy::{DownloadProxy, download_client};

/// ## Summary
/// Builds the page routes. The catch-all static page route comes last.
#[must_use]
pub fn routes(http: reqwest::Client) -> Router {
    Router::new()
        .get(home::home)
        .push(Router::with_path("robots.txt").get(seo::robots))
        .push(Router::with_path("sitemap.xml").get(seo::sitemap))
        .push(Router::with_path(PORTFOLIO_ROUTE_COMPONENT).get(portfolio::portfolio))
        .push(
            Router::with_path(CASE_STUDY_ROUTE_COMPONENT)
                .push(Router::with_path("id/{id}").get(case_study::by_id))
                .push(Router::with_path("{slug}").get(case_study::by_slug)),
        )
        .push(
            Router::with_path(BLOG_ROUTE_COMPONENT)
                .push(Router::with_path("{slug}").get(blog::blog_post_page)),
        )
        .push(Router::with_path(BLOG_LIST_ROUTE_COMPONENT).get(blog::index))
        .push(Router::with_path(DOWNLOAD_PROXY_ROUTE_COMPONENT).get(DownloadProxy::new(http)))
        .push(Router::with_path("{page}").get(static_pages::static_page))
}

/// An [`AppError`] raised while serving a page. Written as a small HTML
/// document instead of the JSON error body.
#[derive(Debug)]
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

pub type PageResult<T> = Result<T, PageError>;

fn error_page(status: StatusCode) -> String {
    let heading = match status {
        StatusCode::NOT_FOUND => "Page not found",
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::BAD_GATEWAY => "Download failed",
        _ => "Something went wrong",
    };
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{heading}</title></head>\
         <body><h1>{}</h1><p>{heading}</p><p><a href=\"/\">Back to home</a></p></body></html>",
        status.as_u16()
    )
}

#[async_trait]
impl Writer for PageError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self.0, path = %req.uri().path(), "Page failed");
        } else {
            tracing::debug!(error = %self.0, %status, path = %req.uri().path(), "Page rejected");
        }

        res.status_code(status);
        res.render(Text::Html(error_page(status)));
    }
}
