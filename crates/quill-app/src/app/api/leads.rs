//! Lead capture forms and the admin downloads dashboard.

use quill_core::constants::DEFAULT_PER_PAGE;
use quill_db::model::lead::PdfDownload;
use quill_service::content::PageWindow;
use quill_service::leads::{self, ContactForm, PdfDownloadForm};
use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};
use serde_json::{Value, json};

use super::{json_body, success};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

fn download_json(download: &PdfDownload) -> Value {
    json!({
        "id": download.id,
        "first_name": download.first_name,
        "last_name": download.last_name,
        "email": download.email,
        "company_name": download.company_name,
        "mobile_number": download.mobile_number,
        "pdf_link": download.pdf_link,
        "created_at": download.created_at,
    })
}

/// `POST /api/pdf-download-form`
#[handler]
#[tracing::instrument(skip_all)]
async fn pdf_download_form(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Value>> {
    let form: PdfDownloadForm = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = leads::submit_pdf_download(&mut conn, &form).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(success(json!({
        "message": "Form submitted successfully",
        "id": record.id,
    }))))
}

/// `POST /api/contact`
#[handler]
#[tracing::instrument(skip_all)]
async fn contact(req: &mut Request, depot: &mut Depot, res: &mut Response) -> AppResult<Json<Value>> {
    let form: ContactForm = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let record = leads::submit_contact(&mut conn, &form).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(success(json!({
        "message": "Thank you, we will get back to you soon",
        "id": record.id,
    }))))
}

/// `GET /api/pdf-downloads?page=&per_page=`
#[handler]
async fn list_downloads(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Value>> {
    let window = PageWindow::new(
        req.query::<i64>("page").unwrap_or(1),
        req.query::<i64>("per_page").unwrap_or(DEFAULT_PER_PAGE),
    )?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let page = leads::list_pdf_downloads(&mut conn, window)
        .await?
        .map(|download| download_json(&download));

    Ok(Json(success(json!({ "downloads": page }))))
}

/// `GET /api/pdf-downloads-kpi`
#[handler]
async fn downloads_kpi(depot: &mut Depot) -> AppResult<Json<Value>> {
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let kpi = leads::pdf_download_kpi(&mut conn).await?;

    Ok(Json(success(json!({ "kpi": kpi }))))
}

#[must_use]
pub fn public_routes() -> Router {
    Router::new()
        .push(Router::with_path("pdf-download-form").post(pdf_download_form))
        .push(Router::with_path("contact").post(contact))
}

#[must_use]
pub fn admin_routes() -> Router {
    Router::new()
        .push(Router::with_path("pdf-downloads").get(list_downloads))
        .push(Router::with_path("pdf-downloads-kpi").get(downloads_kpi))
}
