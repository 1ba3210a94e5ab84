//! Tests for configuration module.

use super::*;

fn test_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgresql://localhost/test".to_string(),
            max_connections: 4,
        },
        auth: AuthConfig {
            method: AuthMethod::Disabled,
            basic: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8698,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        site: SiteConfig {
            base_url: None,
            pages_dir: "pages".to_string(),
            categories: BTreeMap::new(),
            download_hosts: Vec::new(),
        },
    }
}

#[test_log::test]
fn test_auth_method_deserialization() {
    tracing::debug!("Testing auth method deserialization");

    let method: AuthMethod = serde_json::from_str("\"basic_auth\"").expect("valid method");
    assert_eq!(method, AuthMethod::BasicAuth);

    let method: AuthMethod = serde_json::from_str("\"disabled\"").expect("valid method");
    assert_eq!(method, AuthMethod::Disabled);

    assert!(serde_json::from_str::<AuthMethod>("\"proxy\"").is_err());
}

#[test]
fn test_server_origin_defaults_to_host_and_port() {
    let settings = test_settings();
    assert_eq!(settings.server.origin(), "http://127.0.0.1:8698");
}

#[test]
fn test_server_origin_override() {
    let mut settings = test_settings();
    settings.server.serve_origin = Some("https://cms.example.com".to_string());
    assert_eq!(settings.server.origin(), "https://cms.example.com");
}

#[test]
fn test_public_origin_prefers_site_base_url() {
    let mut settings = test_settings();
    assert_eq!(settings.public_origin(), "http://127.0.0.1:8698");

    settings.site.base_url = Some("https://www.example.com/".to_string());
    assert_eq!(settings.public_origin(), "https://www.example.com");
}

#[test]
fn test_basic_auth_debug_redacts_hash() {
    let config = BasicAuthConfig {
        username: "admin".to_string(),
        password_hash: "$argon2id$v=19$secret".to_string(),
    };

    let debug = format!("{config:?}");
    assert!(debug.contains("admin"));
    assert!(!debug.contains("secret"));
}

#[test]
fn test_site_config_categories_default_to_empty() {
    let site: SiteConfig =
        serde_json::from_str(r#"{"base_url": null, "pages_dir": "pages"}"#).expect("valid site");
    assert!(site.categories.is_empty());
    assert!(site.download_hosts.is_empty());
    assert_eq!(site.pages_dir, "pages");
}
