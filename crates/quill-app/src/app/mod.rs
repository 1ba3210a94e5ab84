//! Routers for the JSON API and the server-rendered pages.

pub mod api;
pub mod pages;

use salvo::Router;

/// ## Summary
/// Builds the full application router. `http` is the client used by the
/// download proxy.
#[must_use]
pub fn routes(http: reqwest::Client) -> Router {
    Router::new().push(api::routes()).push(pages::routes(http))
}
