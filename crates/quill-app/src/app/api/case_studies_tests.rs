use quill_render::template::PageTemplates;
use salvo::Router;
use salvo::http::StatusCode;
use salvo::test::{ResponseExt, TestClient};
use serde_json::{Value, json};

use crate::config::tests::test_settings;
use crate::config::{AuthConfig, AuthMethod, BasicAuthConfig, ConfigHandler};

const BASE: &str = "http://127.0.0.1:5800/api";

fn router(auth: AuthConfig) -> Router {
    Router::new()
        .hoop(ConfigHandler::new(test_settings(auth), PageTemplates::default()))
        .push(crate::app::api::routes())
}

fn open_router() -> Router {
    router(AuthConfig {
        method: AuthMethod::Disabled,
        basic: None,
    })
}

fn guarded_router() -> Router {
    router(AuthConfig {
        method: AuthMethod::BasicAuth,
        basic: Some(BasicAuthConfig {
            username: "admin".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        }),
    })
}

async fn json_response(res: &mut salvo::Response) -> Value {
    let body = res.take_string().await.expect("body");
    serde_json::from_str(&body).expect("json body")
}

#[test_log::test(tokio::test)]
async fn test_preview_renders_unsaved_document() {
    let mut res = TestClient::post(format!("{BASE}/admin_case_study_preview"))
        .json(&json!({
            "blogTitle": "Scaling a Founder Brand",
            "blogCategory": "linkedin-branding",
            "previewData": { "text": "Ten posts a month" },
            "pdfUrl": "https://cdn.example.com/deck.pdf",
        }))
        .send(open_router())
        .await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    let body = json_response(&mut res).await;
    assert_eq!(body["status"], "success");

    let html = body["data"].as_str().expect("html");
    assert!(html.contains("Scaling a Founder Brand"), "{html}");
    assert!(html.contains("LinkedIn Branding"), "{html}");
}

#[test_log::test(tokio::test)]
async fn test_preview_requires_a_title() {
    let mut res = TestClient::post(format!("{BASE}/admin_case_study_preview"))
        .json(&json!({ "blogTitle": "   " }))
        .send(open_router())
        .await;

    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    let body = json_response(&mut res).await;
    assert!(body["error"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_preview_rejects_malformed_json() {
    let res = TestClient::post(format!("{BASE}/admin_case_study_preview"))
        .raw_json("{not json")
        .send(open_router())
        .await;

    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
}

#[test_log::test(tokio::test)]
async fn test_paginated_without_database_is_a_server_error() {
    let mut res = TestClient::get(format!("{BASE}/case-studies/paginated?page=1&per_page=4"))
        .send(open_router())
        .await;

    assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    let body = json_response(&mut res).await;
    assert_eq!(body["error"], "Internal server error");
}

#[test_log::test(tokio::test)]
async fn test_paginated_validates_window_before_querying() {
    for query in ["page=0", "per_page=21", "per_page=0", "page=9223372036854775807"] {
        let res = TestClient::get(format!("{BASE}/case-studies/paginated?{query}"))
            .send(open_router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "{query}");
    }
}

#[test_log::test(tokio::test)]
async fn test_public_routes_skip_authentication() {
    let res = TestClient::get(format!("{BASE}/case-studies/paginated"))
        .send(guarded_router())
        .await;

    // Reaches the handler, which then has no database.
    assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[test_log::test(tokio::test)]
async fn test_admin_routes_require_authentication() {
    let requests = [
        TestClient::get(format!("{BASE}/case-studies")),
        TestClient::post(format!("{BASE}/admin_save_case_study")).json(&json!({ "blogTitle": "x" })),
        TestClient::delete(format!("{BASE}/case-studies/0196a0e4-7d1c-7000-8000-000000000001")),
        TestClient::post(format!("{BASE}/admin_blog_preview")).json(&json!({ "blogTitle": "x" })),
        TestClient::get(format!("{BASE}/pdf-downloads")),
    ];

    for request in requests {
        let res = request.send(guarded_router()).await;
        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }
}

#[test_log::test(tokio::test)]
async fn test_invalid_id_is_a_bad_request() {
    let mut res = TestClient::patch(format!("{BASE}/case-studies/not-a-uuid"))
        .json(&json!({ "status": "published" }))
        .send(open_router())
        .await;

    assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    let body = json_response(&mut res).await;
    assert!(
        body["error"].as_str().is_some_and(|e| e.contains("not-a-uuid")),
        "{body}"
    );
}

#[test_log::test(tokio::test)]
async fn test_blog_preview_renders_sections() {
    let mut res = TestClient::post(format!("{BASE}/admin_blog_preview"))
        .json(&json!({
            "blogTitle": "Writing Hooks",
            "dynamicSections": [
                { "type": "h2", "content": "Open strong" },
                { "type": "text", "content": "<p>First line matters.</p>" },
            ],
        }))
        .send(open_router())
        .await;

    assert_eq!(res.status_code, Some(StatusCode::OK));
    let body = json_response(&mut res).await;
    let html = body["data"].as_str().expect("html");
    assert!(html.contains("Writing Hooks"), "{html}");
    assert!(html.contains("Open strong"), "{html}");
}
