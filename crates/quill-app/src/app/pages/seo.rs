use chrono::Utc;
use quill_render::seo::{ChangeFrequency, SitemapEntry, render_robots, render_sitemap, static_entries};
use quill_service::content::published_pages;
use salvo::writing::Text;
use salvo::{Depot, handler};

use super::PageResult;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

const CONTENT_PRIORITY: &str = "0.8";

/// `GET /robots.txt`
#[handler]
pub async fn robots(depot: &mut Depot) -> PageResult<Text<String>> {
    let settings = get_config_from_depot(depot)?;
    Ok(Text::Plain(render_robots(&settings.public_origin())))
}

/// `GET /sitemap.xml`: the static pages plus every published post and case study.
#[handler]
pub async fn sitemap(depot: &mut Depot) -> PageResult<Text<String>> {
    Ok(Text::Xml(build_sitemap(depot).await?))
}

async fn build_sitemap(depot: &Depot) -> AppResult<String> {
    let settings = get_config_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let mut entries = static_entries(Utc::now());
    entries.extend(published_pages(&mut conn).await?.into_iter().map(|page| {
        SitemapEntry::new(page.path, page.updated_at, ChangeFrequency::Weekly, CONTENT_PRIORITY)
    }));

    tracing::debug!(entries = entries.len(), "Rendering sitemap");
    Ok(render_sitemap(&settings.public_origin(), &entries)?)
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use salvo::test::{ResponseExt, TestClient};

    use crate::app::pages::tests::{BASE, router};

    #[test_log::test(tokio::test)]
    async fn test_robots_points_at_sitemap() {
        let mut res = TestClient::get(format!("{BASE}/robots.txt"))
            .send(router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body = res.take_string().await.expect("body");
        assert!(body.starts_with("User-agent: *\n"), "{body}");
        assert!(body.contains("Disallow: /api/\n"), "{body}");
        assert!(body.ends_with("Sitemap: https://www.example.com/sitemap.xml\n"), "{body}");
    }

    #[test_log::test(tokio::test)]
    async fn test_sitemap_without_database_is_a_server_error() {
        let mut res = TestClient::get(format!("{BASE}/sitemap.xml"))
            .send(router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        let body = res.take_string().await.expect("body");
        assert!(body.contains("<h1>500</h1>"), "{body}");
    }
}
