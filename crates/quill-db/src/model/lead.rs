use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Submission of the "download this PDF" form.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::pdf_download)]
#[diesel(check_for_backend(Pg))]
pub struct PdfDownload {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_name: String,
    pub mobile_number: String,
    pub pdf_link: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::pdf_download)]
pub struct NewPdfDownload<'a> {
    pub id: uuid::Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub company_name: &'a str,
    pub mobile_number: &'a str,
    pub pdf_link: &'a str,
}

/// Submission of the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::contact_lead)]
#[diesel(check_for_backend(Pg))]
pub struct ContactLead {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::contact_lead)]
pub struct NewContactLead<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub service: &'a str,
    pub message: &'a str,
}
