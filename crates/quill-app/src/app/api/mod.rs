mod blogs;
mod case_studies;
mod healthcheck;
mod leads;

use salvo::{Request, Router};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMiddleware;

use quill_core::constants::API_ROUTE_COMPONENT;

/// ## Summary
/// Constructs the `/api` router. Public endpoints come first; everything
/// else sits behind [`AuthMiddleware`].
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(Router::with_path("app").push(healthcheck::routes()))
        .push(case_studies::public_routes())
        .push(leads::public_routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(case_studies::admin_routes())
                .push(blogs::admin_routes())
                .push(leads::admin_routes()),
        )
}

/// ## Summary
/// Wraps `fields` in the `{"status": "success", ...}` envelope.
#[must_use]
pub(crate) fn success(fields: Value) -> Value {
    let mut body = Map::new();
    body.insert("status".to_string(), Value::String("success".to_string()));
    if let Value::Object(fields) = fields {
        body.extend(fields);
    }
    Value::Object(body)
}

/// ## Errors
/// Returns `BadRequest` if the `id` path parameter is missing or not a UUID.
pub(crate) fn path_id(req: &Request) -> AppResult<Uuid> {
    let raw = req
        .param::<String>("id")
        .ok_or_else(|| AppError::BadRequest("Missing id".to_string()))?;
    Uuid::parse_str(&raw).map_err(|e| AppError::BadRequest(format!("Invalid id '{raw}': {e}")))
}

/// ## Errors
/// Returns `BadRequest` if the body is not valid JSON for `T`.
pub(crate) async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse request body");
        AppError::BadRequest("Invalid request body".to_string())
    })
}

/// Reads a boolean query flag such as `?permanent=true`.
pub(crate) fn query_flag(req: &Request, name: &str) -> bool {
    req.query::<String>(name)
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
}
