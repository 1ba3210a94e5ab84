use salvo::http::StatusCode;
use salvo::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use salvo::writing::Json;
use salvo::{Depot, FlowCtrl, Request, Response};
use tracing::error;

use crate::config::{AuthMethod, get_config_from_depot};
use crate::error::ErrorResponse;
use quill_service::auth::basic::authenticate_basic;
use quill_service::error::ServiceError;

/// Depot key holding the authenticated admin username.
pub const ADMIN_USER_KEY: &str = "admin_user";

const REALM_CHALLENGE: &str = "Basic realm=\"Quill admin\", charset=\"UTF-8\"";

/// ## Summary
/// Middleware guarding the admin API.
///
/// With `auth.method = "disabled"` every request passes. With
/// `basic_auth` the `Authorization` header is checked against the configured
/// admin user; failures end the request with 401 and a Basic challenge.
pub struct AuthMiddleware;

fn reject(res: &mut Response, ctrl: &mut FlowCtrl, status: StatusCode, message: &str) {
    res.status_code(status);
    if status == StatusCode::UNAUTHORIZED {
        res.headers_mut().insert(
            WWW_AUTHENTICATE,
            salvo::http::HeaderValue::from_static(REALM_CHALLENGE),
        );
    }
    res.render(Json(ErrorResponse {
        error: message.to_string(),
    }));
    ctrl.skip_rest();
}

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let config = match get_config_from_depot(depot) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!(error = ?e, "Failed to get config from depot");
                reject(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
                return;
            }
        };

        match config.auth.method {
            AuthMethod::Disabled => {
                tracing::trace!("Admin authentication disabled");
            }
            AuthMethod::BasicAuth => {
                let Some(basic) = config.auth.basic.as_ref() else {
                    error!("auth.method is basic_auth but auth.basic is not configured");
                    reject(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
                    return;
                };

                let Some(header) = req
                    .headers()
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                else {
                    tracing::debug!("Missing Authorization header");
                    reject(res, ctrl, StatusCode::UNAUTHORIZED, "Authentication required");
                    return;
                };

                match authenticate_basic(basic, header) {
                    Ok(username) => {
                        depot.insert(ADMIN_USER_KEY, username);
                    }
                    Err(ServiceError::NotAuthenticated) => {
                        reject(res, ctrl, StatusCode::UNAUTHORIZED, "Invalid credentials");
                    }
                    Err(e) => {
                        error!(error = ?e, "Authentication failed with error");
                        reject(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use salvo::test::{ResponseExt, TestClient};
    use salvo::{Router, handler};

    use super::*;
    use crate::config::tests::test_settings;
    use crate::config::{AuthConfig, BasicAuthConfig, ConfigHandler};
    use quill_render::template::PageTemplates;
    use quill_service::auth::password::hash_password;

    #[handler]
    async fn secret(depot: &mut Depot) -> String {
        depot
            .get::<String>(ADMIN_USER_KEY)
            .map_or_else(|_| "anonymous".to_string(), Clone::clone)
    }

    fn router(auth: AuthConfig) -> Router {
        Router::new()
            .hoop(ConfigHandler::new(test_settings(auth), PageTemplates::default()))
            .hoop(AuthMiddleware)
            .get(secret)
    }

    fn basic_router() -> Router {
        router(AuthConfig {
            method: AuthMethod::BasicAuth,
            basic: Some(BasicAuthConfig {
                username: "editor".to_string(),
                password_hash: hash_password("hunter2").expect("Failed to hash password"),
            }),
        })
    }

    #[test_log::test(tokio::test)]
    async fn test_disabled_auth_passes_through() {
        let router = router(AuthConfig {
            method: AuthMethod::Disabled,
            basic: None,
        });

        let mut res = TestClient::get("http://127.0.0.1:5800/").send(router).await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await.expect("body"), "anonymous");
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_header_is_challenged() {
        let res = TestClient::get("http://127.0.0.1:5800/")
            .send(basic_router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert!(res.headers().contains_key(WWW_AUTHENTICATE));
    }

    #[test_log::test(tokio::test)]
    async fn test_wrong_password_is_rejected() {
        let res = TestClient::get("http://127.0.0.1:5800/")
            .add_header(
                AUTHORIZATION,
                format!("Basic {}", STANDARD.encode("editor:wrong")),
                true,
            )
            .send(basic_router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[test_log::test(tokio::test)]
    async fn test_valid_credentials_reach_the_handler() {
        let mut res = TestClient::get("http://127.0.0.1:5800/")
            .add_header(
                AUTHORIZATION,
                format!("Basic {}", STANDARD.encode("editor:hunter2")),
                true,
            )
            .send(basic_router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await.expect("body"), "editor");
    }

    #[test_log::test(tokio::test)]
    async fn test_basic_auth_without_credentials_configured() {
        let router = router(AuthConfig {
            method: AuthMethod::BasicAuth,
            basic: None,
        });

        let res = TestClient::get("http://127.0.0.1:5800/").send(router).await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
