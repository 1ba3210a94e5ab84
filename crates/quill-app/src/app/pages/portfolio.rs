use quill_core::constants::DEFAULT_PER_PAGE;
use quill_render::portfolio::{CaseStudyCard, render_portfolio_page};
use quill_service::content::{PageWindow, case_study};
use salvo::writing::Text;
use salvo::{Depot, Request, handler};

use super::PageResult;
use crate::config::{get_categories_from_depot, get_templates_from_depot};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

/// ## Summary
/// `GET /case-studies?category=`: the first page of cards. Later pages are
/// fetched by the page script from `/api/case-studies/paginated`.
#[handler]
pub async fn portfolio(req: &mut Request, depot: &mut Depot) -> PageResult<Text<String>> {
    let category = req
        .query::<String>("category")
        .filter(|c| !c.trim().is_empty());
    Ok(Text::Html(render(depot, category.as_deref()).await?))
}

async fn render(depot: &Depot, category: Option<&str>) -> AppResult<String> {
    let templates = get_templates_from_depot(depot)?;
    let categories = get_categories_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let window = PageWindow::new(1, DEFAULT_PER_PAGE)?;
    let page = case_study::list_published(&mut conn, &categories, window, category).await?;

    let cards: Vec<CaseStudyCard<'_>> = page
        .items
        .iter()
        .map(|record| CaseStudyCard {
            slug: &record.slug,
            preview: &record.preview,
            category: record.category.as_deref(),
        })
        .collect();

    Ok(render_portfolio_page(
        &templates,
        &categories,
        &cards,
        page.total_pages,
        category,
    ))
}
