use quill_db::model::case_study::CaseStudy;
use quill_render::case_study::{CaseStudyView, render_case_study_page};
use quill_service::content::case_study;
use salvo::writing::Text;
use salvo::{Depot, Request, handler};
use uuid::Uuid;

use super::PageResult;
use crate::app::api::path_id;
use crate::config::{get_categories_from_depot, get_templates_from_depot};
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};

/// `GET /case-study/{slug}`
#[handler]
pub async fn by_slug(req: &mut Request, depot: &mut Depot) -> PageResult<Text<String>> {
    let slug = req
        .param::<String>("slug")
        .ok_or_else(|| AppError::BadRequest("Missing slug".to_string()))?;
    Ok(Text::Html(render_slug(depot, &slug).await?))
}

/// `GET /case-study/id/{id}`
#[handler]
pub async fn by_id(req: &mut Request, depot: &mut Depot) -> PageResult<Text<String>> {
    let id = path_id(req)?;
    Ok(Text::Html(render_id(depot, id).await?))
}

async fn render_slug(depot: &Depot, slug: &str) -> AppResult<String> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let record = case_study::published_by_slug(&mut conn, slug).await?;

    render(depot, &record)
}

async fn render_id(depot: &Depot, id: Uuid) -> AppResult<String> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    let record = case_study::published_by_id(&mut conn, id).await?;

    render(depot, &record)
}

fn render(depot: &Depot, record: &CaseStudy) -> AppResult<String> {
    let templates = get_templates_from_depot(depot)?;
    let categories = get_categories_from_depot(depot)?;

    let view = CaseStudyView {
        content: &record.content,
        preview: &record.preview,
        category: record.category.as_deref(),
        pdf_url: record.pdf_url.as_deref(),
        date: record.display_date(),
    };
    Ok(render_case_study_page(&templates, &categories, &view))
}
