//! `/download_proxy?pdf=&filename=`: fetches a remote PDF and returns it as
//! an attachment, so the flipbook viewer can offer same-origin downloads.
//!
//! Only documents a case study links to, or documents on a configured
//! download host, are fetched. Hosts on loopback, private or link-local
//! addresses are refused outright, including as redirect targets.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use quill_core::constants::MAX_DOWNLOAD_BYTES;
use quill_service::content::case_study;
use quill_service::error::ServiceError;
use reqwest::Url;
use reqwest::redirect::Policy;
use salvo::http::HeaderValue;
use salvo::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use salvo::{Depot, FlowCtrl, Handler, Request, Response, Writer, async_trait};

use super::PageError;
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::{AppError, AppResult};

const DEFAULT_FILENAME: &str = "document.pdf";
const MAX_REDIRECTS: usize = 5;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DownloadProxy {
    client: reqwest::Client,
}

impl DownloadProxy {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, req: &Request, depot: &Depot, res: &mut Response) -> AppResult<()> {
        let requested = req.query::<String>("pdf");
        let url = pdf_url(requested.as_deref())?;
        let filename = attachment_name(req.query::<String>("filename").as_deref());

        ensure_known_document(depot, requested.as_deref().unwrap_or_default().trim(), &url).await?;

        let mut response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!(error = %e, %url, "PDF download request failed");
            AppError::Upstream(e.to_string())
        })?;
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        if let Some(length) = response.content_length() {
            check_size(length)?;
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            tracing::warn!(error = %e, %url, "Reading PDF body failed");
            AppError::Upstream(e.to_string())
        })? {
            check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }

        tracing::info!(%url, %filename, bytes = body.len(), "Proxied PDF download");
        write_pdf(res, body, &filename)
    }
}

#[async_trait]
impl Handler for DownloadProxy {
    #[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        _ctrl: &mut FlowCtrl,
    ) {
        if let Err(err) = self.fetch(req, depot, res).await {
            PageError::from(err).write(req, depot, res).await;
        }
    }
}

/// ## Summary
/// Builds the HTTP client the proxy fetches with.
///
/// ## Errors
/// Returns an error if the TLS backend cannot be initialised.
pub fn download_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .redirect(redirect_policy())
        .user_agent(concat!("quill/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// At most [`MAX_REDIRECTS`] hops, never onto an internal address.
fn redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.stop()
        } else if is_internal_host(attempt.url()) {
            tracing::warn!(url = %attempt.url(), "Refusing redirect to internal host");
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

/// Parses the `pdf` parameter; only absolute http(s) URLs on public hosts
/// are fetched.
fn pdf_url(raw: Option<&str>) -> AppResult<Url> {
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing pdf parameter".to_string()))?;
    let url = Url::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid pdf URL: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported URL scheme '{other}'"
            )));
        }
    }
    if is_internal_host(&url) {
        return Err(AppError::BadRequest(
            "pdf URL must point at a public host".to_string(),
        ));
    }
    Ok(url)
}

/// ## Summary
/// Passes when `url` is on a configured download host or is the stored
/// `pdf_url` of an active case study.
///
/// ## Errors
/// Returns `NotFound` for any other document.
async fn ensure_known_document(depot: &Depot, requested: &str, url: &Url) -> AppResult<()> {
    let settings = get_config_from_depot(depot)?;
    if is_allowed_host(url, &settings.site.download_hosts) {
        return Ok(());
    }

    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;
    if case_study::offers_pdf(&mut conn, requested, url.as_str()).await? {
        return Ok(());
    }

    tracing::warn!(%url, "Refusing to proxy unknown document");
    Err(ServiceError::NotFound("Unknown document".to_string()).into())
}

/// Matches the URL host against `hosts`; an entry starting with `.` also
/// matches any subdomain.
fn is_allowed_host(url: &Url, hosts: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    hosts.iter().any(|allowed| {
        let allowed = allowed.trim().to_ascii_lowercase();
        match allowed.strip_prefix('.') {
            Some(domain) => host == domain || host.ends_with(&allowed),
            None => !allowed.is_empty() && host == allowed,
        }
    })
}

fn is_internal_host(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return true;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let lower = host.to_ascii_lowercase();
    if lower == "localhost" || lower.ends_with(".localhost") {
        return true;
    }

    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(ip)) => is_internal_v4(ip),
        Ok(IpAddr::V6(ip)) => is_internal_v6(ip),
        Err(_) => false,
    }
}

const fn is_internal_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
}

fn is_internal_v6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_internal_v4(mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local, fe80::/10 link local
        || (first & 0xfe00) == 0xfc00
        || (first & 0xffc0) == 0xfe80
}

fn check_size(bytes: u64) -> AppResult<()> {
    if bytes > MAX_DOWNLOAD_BYTES {
        return Err(AppError::Upstream(format!(
            "document is larger than {MAX_DOWNLOAD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Writes the PDF body, then the attachment headers.
fn write_pdf(res: &mut Response, body: Vec<u8>, filename: &str) -> AppResult<()> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::BadRequest(format!("Invalid filename: {e}")))?;

    res.write_body(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to write PDF body");
        AppError::ResponseWrite(e.to_string())
    })?;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    res.headers_mut().insert(CONTENT_DISPOSITION, disposition);
    Ok(())
}

/// ## Summary
/// Reduces a requested filename to a safe `Content-Disposition` value:
/// ASCII letters, digits, `-`, `_` and `.` only, with a `.pdf` extension.
fn attachment_name(raw: Option<&str>) -> String {
    let mut name: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    name = name.trim_matches('.').to_string();

    if name.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    if !name.to_ascii_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }
    name
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use salvo::test::TestClient;

    use super::*;
    use crate::app::pages::tests::{BASE, router};

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("valid url")
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(attachment_name(None), "document.pdf");
        assert_eq!(attachment_name(Some("  ")), "document.pdf");
        assert_eq!(attachment_name(Some("Growth Report")), "Growth_Report.pdf");
        assert_eq!(attachment_name(Some("deck.PDF")), "deck.PDF");
        assert_eq!(attachment_name(Some("../../etc/passwd")), "etcpasswd.pdf");
        assert_eq!(attachment_name(Some("a\"b\r\n.pdf")), "ab__.pdf");
    }

    #[test]
    fn test_pdf_url_accepts_only_public_http() {
        assert!(pdf_url(Some("https://cdn.example.com/a.pdf")).is_ok());
        assert!(pdf_url(Some(" http://cdn.example.com/a.pdf ")).is_ok());
        assert!(pdf_url(None).is_err());
        assert!(pdf_url(Some("file:///etc/passwd")).is_err());
        assert!(pdf_url(Some("not a url")).is_err());

        for internal in [
            "http://127.0.0.1:8698/api/case-studies",
            "http://localhost/a.pdf",
            "http://169.254.169.254/latest/meta-data/",
            "http://10.0.0.5/a.pdf",
            "http://192.168.1.1/a.pdf",
            "http://0.0.0.0/a.pdf",
            "http://[::1]/a.pdf",
            "http://[::ffff:127.0.0.1]/a.pdf",
            "http://[fd00::1]/a.pdf",
            "http://[fe80::1]/a.pdf",
        ] {
            assert!(pdf_url(Some(internal)).is_err(), "{internal}");
        }
    }

    #[test]
    fn test_allowed_hosts() {
        let hosts = vec!["cdn.example.com".to_string(), ".assets.example.org".to_string()];

        assert!(is_allowed_host(&url("https://cdn.example.com/a.pdf"), &hosts));
        assert!(is_allowed_host(&url("https://CDN.example.com/a.pdf"), &hosts));
        assert!(is_allowed_host(&url("https://assets.example.org/a.pdf"), &hosts));
        assert!(is_allowed_host(&url("https://eu.assets.example.org/a.pdf"), &hosts));
        assert!(!is_allowed_host(&url("https://evil-cdn.example.com/a.pdf"), &hosts));
        assert!(!is_allowed_host(&url("https://cdn.example.com.evil.net/a.pdf"), &hosts));
        assert!(!is_allowed_host(&url("https://fakeassets.example.org/a.pdf"), &hosts));
        assert!(!is_allowed_host(&url("https://cdn.example.com/a.pdf"), &[String::new()]));
    }

    #[test]
    fn test_size_limit() {
        assert!(check_size(MAX_DOWNLOAD_BYTES).is_ok());
        assert!(matches!(
            check_size(MAX_DOWNLOAD_BYTES + 1),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn test_write_pdf_sets_attachment_headers() {
        let mut res = Response::new();
        write_pdf(&mut res, b"%PDF-1.7".to_vec(), "deck.pdf").expect("written");

        assert_eq!(
            res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );
        assert_eq!(
            res.headers().get(CONTENT_DISPOSITION).and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"deck.pdf\"")
        );
    }

    #[test]
    fn test_write_pdf_failure_is_an_error() {
        let mut res = Response::new();
        let _sender = res.channel();

        let err = write_pdf(&mut res, b"%PDF-1.7".to_vec(), "deck.pdf").expect_err("channel body");

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.headers().get(CONTENT_DISPOSITION).is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_pdf_parameter() {
        let res = TestClient::get(format!("{BASE}/download_proxy"))
            .send(router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[test_log::test(tokio::test)]
    async fn test_unsupported_scheme() {
        let res = TestClient::get(format!("{BASE}/download_proxy?pdf=ftp%3A%2F%2Fexample.com%2Fa.pdf"))
            .send(router())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[test_log::test(tokio::test)]
    async fn test_loopback_url_is_refused() {
        let res = TestClient::get(format!(
            "{BASE}/download_proxy?pdf=http%3A%2F%2F127.0.0.1%3A8698%2Fapi%2Fcase-studies"
        ))
        .send(router())
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[test_log::test(tokio::test)]
    async fn test_unknown_url_is_checked_against_case_studies() {
        // Not on a configured download host, so the stored case studies are
        // consulted; without a database that lookup fails before any fetch.
        let res = TestClient::get(format!(
            "{BASE}/download_proxy?pdf=https%3A%2F%2Ffiles.example.net%2Fa.pdf"
        ))
        .send(router())
        .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
