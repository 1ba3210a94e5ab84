//! Lead capture: the PDF download form shown over case studies and the
//! contact form.

use chrono::{Duration, Utc};
use diesel_async::AsyncPgConnection;
use quill_db::db::query::lead::{self, PdfDownloadKpi};
use quill_db::model::lead::{ContactLead, NewContactLead, NewPdfDownload, PdfDownload};
use serde::Deserialize;
use uuid::Uuid;

use crate::content::{PageWindow, Paginated};
use crate::error::{ServiceError, ServiceResult};

/// Window of the "recent downloads" KPI.
pub const RECENT_DOWNLOADS_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PdfDownloadForm {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub pdf_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn required<'a>(value: &'a str, field: &str) -> ServiceResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::ValidationError(format!("{field} is required")));
    }
    Ok(value)
}

fn optional(value: Option<&str>) -> &str {
    value.map_or("", str::trim)
}

fn email(value: &str) -> ServiceResult<&str> {
    let value = required(value, "email")?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(value),
        _ => Err(ServiceError::ValidationError(format!(
            "'{value}' is not a valid email address"
        ))),
    }
}

impl PdfDownloadForm {
    /// ## Summary
    /// Trims every field and checks the required ones.
    ///
    /// ## Errors
    /// Returns `ValidationError` when `first_name`, `email` or `pdf_link` is
    /// blank, or the email has no `@` and domain.
    pub fn validate(&self) -> ServiceResult<NewPdfDownload<'_>> {
        Ok(NewPdfDownload {
            id: Uuid::now_v7(),
            first_name: required(&self.first_name, "first_name")?,
            last_name: optional(self.last_name.as_deref()),
            email: email(&self.email)?,
            company_name: optional(self.company_name.as_deref()),
            mobile_number: optional(self.mobile_number.as_deref()),
            pdf_link: required(&self.pdf_link, "pdf_link")?,
        })
    }
}

impl ContactForm {
    /// ## Errors
    /// Returns `ValidationError` when `name` or `email` is blank or the email
    /// is malformed.
    pub fn validate(&self) -> ServiceResult<NewContactLead<'_>> {
        Ok(NewContactLead {
            id: Uuid::now_v7(),
            name: required(&self.name, "name")?,
            email: email(&self.email)?,
            phone: optional(self.phone.as_deref()),
            service: optional(self.service.as_deref()),
            message: optional(self.message.as_deref()),
        })
    }
}

/// ## Summary
/// Stores a PDF download form submission.
///
/// ## Errors
/// Returns `ValidationError` for invalid input or a database error.
#[tracing::instrument(skip(conn, form), fields(pdf_link = %form.pdf_link))]
pub async fn submit_pdf_download(
    conn: &mut AsyncPgConnection,
    form: &PdfDownloadForm,
) -> ServiceResult<PdfDownload> {
    let new_download = form.validate()?;
    let record = lead::insert_pdf_download(conn, &new_download).await?;

    tracing::info!(id = %record.id, "PDF download form submitted");
    Ok(record)
}

/// ## Summary
/// Stores a contact form submission.
///
/// ## Errors
/// Returns `ValidationError` for invalid input or a database error.
#[tracing::instrument(skip(conn, form))]
pub async fn submit_contact(
    conn: &mut AsyncPgConnection,
    form: &ContactForm,
) -> ServiceResult<ContactLead> {
    let new_lead = form.validate()?;
    let record = lead::insert_contact_lead(conn, &new_lead).await?;

    tracing::info!(id = %record.id, "Contact form submitted");
    Ok(record)
}

/// ## Errors
/// Returns a database error if a query fails.
#[tracing::instrument(skip(conn))]
pub async fn list_pdf_downloads(
    conn: &mut AsyncPgConnection,
    window: PageWindow,
) -> ServiceResult<Paginated<PdfDownload>> {
    let total_count = lead::count_pdf_downloads(conn).await?;
    let items = lead::list_pdf_downloads(conn, window.per_page, window.offset()).await?;

    Ok(Paginated::new(items, window, total_count))
}

/// ## Summary
/// Totals for the leads dashboard; "recent" covers the last
/// [`RECENT_DOWNLOADS_DAYS`] days.
///
/// ## Errors
/// Returns a database error if a query fails.
#[tracing::instrument(skip(conn))]
pub async fn pdf_download_kpi(conn: &mut AsyncPgConnection) -> ServiceResult<PdfDownloadKpi> {
    let since = Utc::now() - Duration::days(RECENT_DOWNLOADS_DAYS);
    Ok(lead::pdf_download_kpi(conn, since).await?)
}
