//! Case study endpoints: the public portfolio feed and the admin CRUD.

use chrono::Utc;
use quill_core::constants::DEFAULT_PER_PAGE;
use quill_core::types::ContentKind;
use quill_db::model::case_study::CaseStudy;
use quill_render::case_study::{CaseStudyView, render_case_study_page};
use quill_service::content::case_study as service;
use quill_service::content::document::{AdminDocument, ContentFields};
use quill_service::content::{PageWindow, Saved};
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde_json::{Value, json};

use super::{json_body, path_id, query_flag, success};
use crate::config::{get_categories_from_depot, get_config_from_depot, get_templates_from_depot};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

/// Admin view of a record.
fn to_json(record: &CaseStudy) -> Value {
    json!({
        "id": record.id,
        "content": record.content,
        "status": record.status,
        "content_type": record.content_type,
        "published_at": record.published_at,
        "keyword": record.keyword,
        "preview": record.preview,
        "slug": record.slug,
        "redirect_url": record.redirect_url,
        "pdf_url": record.pdf_url,
        "category": record.category,
        "editors_choice": record.editors_choice,
        "is_deleted": record.is_deleted(),
        "created_at": record.created_at,
        "updated_at": record.updated_at,
    })
}

/// ## Summary
/// `GET /api/case-studies/paginated?page=&per_page=&category=`
///
/// Feeds the client-side pager of the portfolio page.
#[handler]
async fn paginated(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let window = PageWindow::new(
        req.query::<i64>("page").unwrap_or(1),
        req.query::<i64>("per_page").unwrap_or(DEFAULT_PER_PAGE),
    )?;
    let category = req.query::<String>("category").filter(|c| !c.trim().is_empty());

    let categories = get_categories_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let page = service::list_published(&mut conn, &categories, window, category.as_deref())
        .await?
        .map(|record| {
            json!({
                "slug": record.slug,
                "preview": record.preview,
                "category": record
                    .category
                    .as_deref()
                    .map(|key| categories.display_name(key)),
            })
        });

    Ok(Json(success(json!({
        "case_studies": page.items,
        "page": page.page,
        "per_page": page.per_page,
        "total_count": page.total_count,
        "total_pages": page.total_pages,
        "has_next": page.has_next,
        "has_prev": page.has_prev,
    }))))
}

#[handler]
async fn editors_choice(depot: &mut Depot) -> AppResult<Json<Value>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let records = service::list_editors_choice(&mut conn).await?;
    let items: Vec<Value> = records.iter().map(to_json).collect();

    Ok(Json(success(json!({ "case_studies": items }))))
}

/// `GET /api/case-studies?include_deleted=true`
#[handler]
async fn list(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let include_deleted = query_flag(req, "include_deleted");
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let records = service::list_admin(&mut conn, include_deleted).await?;
    let items: Vec<Value> = records.iter().map(to_json).collect();

    Ok(Json(success(json!({ "count": items.len(), "case_studies": items }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<Json<Value>> {
    let fields: ContentFields = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = service::create_case_study(&mut conn, &fields).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(success(json!({
        "message": "Case study created successfully",
        "case_study": to_json(&record),
    }))))
}

/// `PUT` and `PATCH /api/case-studies/{id}`, both partial.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let fields: ContentFields = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = service::update_case_study(&mut conn, id, &fields).await?;

    Ok(Json(success(json!({
        "message": "Case study updated successfully",
        "case_study": to_json(&record),
    }))))
}

/// `DELETE /api/case-studies/{id}?permanent=true`
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn delete(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let permanent = query_flag(req, "permanent");
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    service::delete_case_study(&mut conn, id, permanent).await?;

    let message = if permanent {
        "Case study permanently deleted"
    } else {
        "Case study deleted successfully"
    };
    Ok(Json(success(json!({ "message": message }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn restore(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    service::restore_case_study(&mut conn, id).await?;

    Ok(Json(success(json!({ "message": "Case study restored successfully" }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn toggle_editors_choice(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = service::toggle_editors_choice(&mut conn, id).await?;
    let message = if record.editors_choice {
        "Case study marked as editor's choice"
    } else {
        "Case study removed from editor's choice"
    };

    Ok(Json(success(json!({
        "message": message,
        "editors_choice": record.editors_choice,
    }))))
}

fn save_message(saved: &Saved<CaseStudy>) -> &'static str {
    if saved.record.status.is_published() {
        "Case study published successfully"
    } else if saved.created {
        "Case study saved as draft successfully"
    } else {
        "Case study updated successfully"
    }
}

/// ## Summary
/// `POST /api/admin_save_case_study`: create or update from the editor.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn admin_save(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let document = AdminDocument::parse(json_body::<Value>(req).await?)?;
    let settings = get_config_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let saved = service::save_case_study(&mut conn, &document).await?;
    let url = format!(
        "{}{}",
        settings.public_origin(),
        ContentKind::CaseStudy.public_path(&saved.record.slug)
    );

    Ok(Json(success(json!({
        "message": save_message(&saved),
        "blog_id": saved.record.id,
        "slug": saved.record.slug,
        "url": url,
    }))))
}

/// ## Summary
/// `POST /api/admin_case_study_preview`: renders an unsaved document as the
/// public page would.
#[handler]
async fn admin_preview(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let document = AdminDocument::parse(json_body::<Value>(req).await?)?;
    let templates = get_templates_from_depot(depot)?;
    let categories = get_categories_from_depot(depot)?;

    let view = CaseStudyView {
        content: &document.content,
        preview: &document.preview,
        category: document.category.as_deref(),
        pdf_url: document.pdf_url.as_deref(),
        date: Utc::now(),
    };
    let html = render_case_study_page(&templates, &categories, &view);

    Ok(Json(success(json!({ "data": html }))))
}

/// Routes open to site visitors.
#[must_use]
pub fn public_routes() -> Router {
    Router::with_path("case-studies")
        .push(Router::with_path("paginated").get(paginated))
        .push(Router::with_path("editors-choice").get(editors_choice))
}

/// Routes for the admin panel.
#[must_use]
pub fn admin_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("case-studies")
                .get(list)
                .post(create)
                .push(
                    Router::with_path("{id}")
                        .put(update)
                        .patch(update)
                        .delete(delete)
                        .push(Router::with_path("restore").post(restore))
                        .push(Router::with_path("toggle-editors-choice").post(toggle_editors_choice)),
                ),
        )
        .push(Router::with_path("admin_save_case_study").post(admin_save))
        .push(Router::with_path("admin_case_study_preview").post(admin_preview))
}

#[cfg(test)]
#[path = "case_studies_tests.rs"]
mod tests;
