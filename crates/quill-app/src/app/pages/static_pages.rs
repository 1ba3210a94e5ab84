use std::path::Path;

use quill_render::error::RenderError;
use quill_render::seo::STATIC_PAGES;
use quill_service::error::ServiceError;
use salvo::writing::Text;
use salvo::{Depot, Request, handler};

use super::PageResult;
use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult};

/// Whether `/{page}` is one of the listed static pages.
fn is_static_page(page: &str) -> bool {
    !page.is_empty()
        && STATIC_PAGES
            .iter()
            .any(|(path, ..)| path.strip_prefix('/') == Some(page))
}

/// ## Summary
/// `GET /{page}`: serves `{pages_dir}/{page}.html` for the listed static
/// pages. Anything else is a 404.
#[handler]
pub async fn static_page(req: &mut Request, depot: &mut Depot) -> PageResult<Text<String>> {
    let page = req.param::<String>("page").unwrap_or_default();
    Ok(Text::Html(load(depot, &page).await?))
}

async fn load(depot: &Depot, page: &str) -> AppResult<String> {
    if !is_static_page(page) {
        return Err(ServiceError::NotFound(format!("No page named '{page}'")).into());
    }

    let settings = get_config_from_depot(depot)?;
    let path = Path::new(&settings.site.pages_dir).join(format!("{page}.html"));

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(html),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Static page file missing");
            Err(ServiceError::NotFound(format!("No page named '{page}'")).into())
        }
        Err(e) => Err(AppError::from(RenderError::from(e))),
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use salvo::test::TestClient;

    use super::*;
    use crate::app::pages::tests::{BASE, router};

    #[test]
    fn test_static_page_allow_list() {
        assert!(is_static_page("about"));
        assert!(is_static_page("privacy-policy"));
        assert!(!is_static_page(""));
        assert!(!is_static_page("admin-blogs"));
        assert!(!is_static_page("..%2Fconfig"));
    }

    #[test_log::test(tokio::test)]
    async fn test_unlisted_page_is_not_found() {
        let res = TestClient::get(format!("{BASE}/admin-homepage"))
            .send(router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[test_log::test(tokio::test)]
    async fn test_listed_page_without_file_is_not_found() {
        // The test configuration points at a `pages` directory that has no such file.
        let res = TestClient::get(format!("{BASE}/cancellation-and-refund-policy"))
            .send(router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
