use std::collections::BTreeMap;

use salvo::test::{ResponseExt, TestClient};
use salvo::{Depot, Router, handler};

use super::*;

pub(crate) fn test_settings(auth: AuthConfig) -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgres://localhost/quill_test".to_string(),
            max_connections: 1,
        },
        auth,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8698,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        site: SiteConfig {
            base_url: Some("https://www.example.com/".to_string()),
            pages_dir: "pages".to_string(),
            categories: BTreeMap::new(),
            download_hosts: vec!["cdn.example.com".to_string()],
        },
    }
}

#[handler]
async fn describe(depot: &mut Depot) -> String {
    let settings = get_config_from_depot(depot).map(|s| s.public_origin());
    let categories = get_categories_from_depot(depot).map(|c| c.categories().len());
    let templates = get_templates_from_depot(depot).is_ok();
    format!("{settings:?} {categories:?} {templates}")
}

#[tokio::test]
async fn test_config_handler_injects_everything() {
    let settings = test_settings(AuthConfig {
        method: AuthMethod::Disabled,
        basic: None,
    });
    let router = Router::new()
        .hoop(ConfigHandler::new(settings, PageTemplates::default()))
        .get(describe);

    let body = TestClient::get("http://127.0.0.1:5800/")
        .send(router)
        .await
        .take_string()
        .await
        .expect("body");

    assert_eq!(body, "Ok(\"https://www.example.com\") Ok(4) true");
}

#[tokio::test]
async fn test_missing_config_is_an_error() {
    let router = Router::new().get(describe);

    let body = TestClient::get("http://127.0.0.1:5800/")
        .send(router)
        .await
        .take_string()
        .await
        .expect("body");

    assert!(body.starts_with("Err("), "{body}");
    assert!(body.ends_with("false"), "{body}");
}
