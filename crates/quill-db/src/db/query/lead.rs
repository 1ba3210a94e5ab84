//! Statements for captured leads (PDF download form and contact form).

use chrono::{DateTime, Utc};
use diesel::expression_methods::AggregateExpressionMethods;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::db::schema::{contact_lead, pdf_download};
use crate::model::lead::{ContactLead, NewContactLead, NewPdfDownload, PdfDownload};

/// Headline numbers for the admin leads dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PdfDownloadKpi {
    pub total: i64,
    pub recent: i64,
    pub unique_emails: i64,
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert_pdf_download(
    conn: &mut AsyncPgConnection,
    new_download: &NewPdfDownload<'_>,
) -> diesel::QueryResult<PdfDownload> {
    diesel::insert_into(pdf_download::table)
        .values(new_download)
        .returning(PdfDownload::as_returning())
        .get_result(conn)
        .await
}

/// ## Errors
/// Returns a database error if the insert fails.
pub async fn insert_contact_lead(
    conn: &mut AsyncPgConnection,
    new_lead: &NewContactLead<'_>,
) -> diesel::QueryResult<ContactLead> {
    diesel::insert_into(contact_lead::table)
        .values(new_lead)
        .returning(ContactLead::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads one page of PDF download submissions, newest first.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_pdf_downloads(
    conn: &mut AsyncPgConnection,
    limit: i64,
    offset: i64,
) -> diesel::QueryResult<Vec<PdfDownload>> {
    pdf_download::table
        .order(pdf_download::created_at.desc())
        .limit(limit)
        .offset(offset)
        .select(PdfDownload::as_select())
        .load(conn)
        .await
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn count_pdf_downloads(conn: &mut AsyncPgConnection) -> diesel::QueryResult<i64> {
    pdf_download::table.count().get_result(conn).await
}

/// ## Summary
/// Returns a query counting distinct email addresses among PDF downloads.
#[must_use]
pub fn unique_email_count() -> pdf_download::BoxedQuery<'static, diesel::pg::Pg, BigInt> {
    pdf_download::table
        .select(diesel::dsl::count(pdf_download::email).aggregate_distinct())
        .into_boxed()
}

/// ## Summary
/// Computes the total number of submissions, the number since `since`, and
/// the number of distinct email addresses.
///
/// ## Errors
/// Returns a database error if any of the queries fail.
pub async fn pdf_download_kpi(
    conn: &mut AsyncPgConnection,
    since: DateTime<Utc>,
) -> diesel::QueryResult<PdfDownloadKpi> {
    let total = count_pdf_downloads(conn).await?;

    let recent: i64 = pdf_download::table
        .filter(pdf_download::created_at.ge(since))
        .count()
        .get_result(conn)
        .await?;

    let unique_emails: i64 = unique_email_count().get_result(conn).await?;

    Ok(PdfDownloadKpi {
        total,
        recent,
        unique_emails,
    })
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;

    use super::*;

    #[test_log::test]
    fn test_unique_email_count_is_distinct() {
        let sql = debug_query::<Pg, _>(&unique_email_count()).to_string();

        assert!(sql.contains("DISTINCT"), "{sql}");
        assert!(sql.contains("\"pdf_download\".\"email\""), "{sql}");
    }
}
