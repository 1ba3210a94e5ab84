//! Blog post admin endpoints.

use chrono::Utc;
use quill_core::types::ContentKind;
use quill_db::model::blog_post::BlogPost;
use quill_render::blog::{BlogView, render_blog_page};
use quill_service::content::Saved;
use quill_service::content::blog_post::{self as service, stored_content};
use quill_service::content::document::{AdminDocument, ContentFields};
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde_json::{Value, json};

use super::{json_body, path_id, query_flag, success};
use crate::config::{get_categories_from_depot, get_config_from_depot, get_templates_from_depot};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

/// Slug shown in rendered previews of unsaved posts.
const PREVIEW_SLUG: &str = "preview";

fn to_json(record: &BlogPost) -> Value {
    json!({
        "id": record.id,
        "content": record.content,
        "status": record.status,
        "published_at": record.published_at,
        "slug": record.slug,
        "category": record.category,
        "editors_choice": record.editors_choice,
        "is_deleted": record.is_deleted(),
        "created_at": record.created_at,
        "updated_at": record.updated_at,
    })
}

#[handler]
async fn list(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let include_deleted = query_flag(req, "include_deleted");
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let records = service::list_admin(&mut conn, include_deleted).await?;
    let items: Vec<Value> = records.iter().map(to_json).collect();

    Ok(Json(success(json!({ "count": items.len(), "blogs": items }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<Json<Value>> {
    let fields: ContentFields = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = service::create_blog(&mut conn, &fields).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(success(json!({
        "message": "Blog created successfully",
        "blog": to_json(&record),
    }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let fields: ContentFields = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = service::update_blog(&mut conn, id, &fields).await?;

    Ok(Json(success(json!({
        "message": "Blog updated successfully",
        "blog": to_json(&record),
    }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn delete(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let permanent = query_flag(req, "permanent");
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    service::delete_blog(&mut conn, id, permanent).await?;

    let message = if permanent {
        "Blog permanently deleted"
    } else {
        "Blog deleted successfully"
    };
    Ok(Json(success(json!({ "message": message }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn restore(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    service::restore_blog(&mut conn, id).await?;

    Ok(Json(success(json!({ "message": "Blog restored successfully" }))))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn toggle_editors_choice(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let id = path_id(req)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = service::toggle_editors_choice(&mut conn, id).await?;
    let message = if record.editors_choice {
        "Blog marked as editor's choice"
    } else {
        "Blog removed from editor's choice"
    };

    Ok(Json(success(json!({
        "message": message,
        "editors_choice": record.editors_choice,
    }))))
}

fn save_message(saved: &Saved<BlogPost>) -> &'static str {
    if saved.record.status.is_published() {
        "Blog published successfully"
    } else if saved.created {
        "Blog saved as draft successfully"
    } else {
        "Blog updated successfully"
    }
}

/// `POST /api/admin_save_blog`
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn admin_save(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let document = AdminDocument::parse(json_body::<Value>(req).await?)?;
    let settings = get_config_from_depot(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let saved = service::save_blog(&mut conn, &document).await?;
    let url = format!(
        "{}{}",
        settings.public_origin(),
        ContentKind::BlogPost.public_path(&saved.record.slug)
    );

    Ok(Json(success(json!({
        "message": save_message(&saved),
        "blog_id": saved.record.id,
        "slug": saved.record.slug,
        "url": url,
    }))))
}

/// `POST /api/admin_blog_preview`
#[handler]
async fn admin_preview(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let document = AdminDocument::parse(json_body::<Value>(req).await?)?;
    let templates = get_templates_from_depot(depot)?;
    let categories = get_categories_from_depot(depot)?;

    let content = stored_content(&document);
    let post = BlogView {
        slug: PREVIEW_SLUG,
        content: &content,
        date: Utc::now(),
    };
    let html = render_blog_page(&templates, &categories, &post, &[]);

    Ok(Json(success(json!({ "data": html }))))
}

#[must_use]
pub fn admin_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("blogs").get(list).post(create).push(
                Router::with_path("{id}")
                    .put(update)
                    .patch(update)
                    .delete(delete)
                    .push(Router::with_path("restore").post(restore))
                    .push(Router::with_path("toggle-editors-choice").post(toggle_editors_choice)),
            ),
        )
        .push(Router::with_path("admin_save_blog").post(admin_save))
        .push(Router::with_path("admin_blog_preview").post(admin_preview))
}
