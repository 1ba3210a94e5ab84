//! Request documents sent by the admin panel.
//!
//! The editor posts the whole page as one JSON object (`blogTitle`,
//! `blogStatus`, `previewData`, ...). [`AdminDocument::parse`] pulls the
//! columns out of it; the rest is stored as the record's content.

use quill_core::error::CoreError;
use quill_core::types::ContentStatus;
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

pub const TITLE_FIELD: &str = "blogTitle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update(Uuid),
}

/// An admin "save" request, split into columns and stored content.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDocument {
    pub mode: SaveMode,
    pub title: String,
    pub status: ContentStatus,
    pub category: Option<String>,
    pub content_type: Option<String>,
    pub editors_choice: bool,
    pub pdf_url: Option<String>,
    /// `previewData` with `blogTitle` merged in.
    pub preview: Value,
    /// Everything else, minus the request metadata (`reason`, `blog_id`).
    pub content: Value,
}

impl AdminDocument {
    /// ## Summary
    /// Splits an admin document into its columns.
    ///
    /// `reason: "update"` together with a `blog_id` selects the update mode;
    /// anything else creates a new record.
    ///
    /// ## Errors
    /// Returns `InvalidInput` when `blogTitle` is missing or blank, and
    /// `ValidationError` when the document is not an object or `blog_id` is
    /// not a UUID.
    pub fn parse(document: Value) -> ServiceResult<Self> {
        let Value::Object(mut fields) = document else {
            return Err(ServiceError::ValidationError(
                "Expected a JSON object".to_string(),
            ));
        };

        let title = text_field(&fields, TITLE_FIELD)
            .ok_or_else(|| CoreError::InvalidInput("title is required".to_string()))?;

        let is_update = text_field(&fields, "reason")
            .is_some_and(|reason| reason.eq_ignore_ascii_case("update"));
        let mode = match (is_update, text_field(&fields, "blog_id")) {
            (true, Some(id)) => SaveMode::Update(parse_id(&id)?),
            (true, None) => {
                return Err(ServiceError::ValidationError(
                    "blog_id is required for updates".to_string(),
                ));
            }
            (false, _) => SaveMode::Create,
        };
        fields.remove("reason");
        fields.remove("blog_id");

        let status = text_field(&fields, "blogStatus")
            .map_or(ContentStatus::Draft, |status| ContentStatus::from_admin(&status));
        let category = text_field(&fields, "blogCategory");
        let content_type = text_field(&fields, "contentType");
        let editors_choice = fields.get("editors_choice").is_some_and(parse_flag);

        let pdf_url = fields
            .remove("pdfUrl")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToString::to_string);

        let mut preview = match fields.remove("previewData") {
            Some(Value::Object(preview)) => preview,
            _ => Map::new(),
        };
        preview.insert(TITLE_FIELD.to_string(), Value::String(title.clone()));

        Ok(Self {
            mode,
            title,
            status,
            category,
            content_type,
            editors_choice,
            pdf_url,
            preview: Value::Object(preview),
            content: Value::Object(fields),
        })
    }

    #[must_use]
    pub const fn is_update(&self) -> bool {
        matches!(self.mode, SaveMode::Update(_))
    }
}

/// Fields accepted by the JSON create and partial update endpoints.
///
/// Blog posts ignore the case study only columns (`keyword`,
/// `redirect_url`, `pdf_url`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContentFields {
    #[serde(rename = "blogContent", alias = "blog")]
    pub content: Option<Value>,
    pub status: Option<String>,
    pub keyword: Option<Value>,
    pub preview: Option<Value>,
    pub editors_choice: Option<Value>,
    pub slug: Option<String>,
    pub redirect_url: Option<String>,
    pub pdf_url: Option<String>,
    pub category: Option<String>,
}

impl ContentFields {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.status.is_none()
            && self.keyword.is_none()
            && self.preview.is_none()
            && self.editors_choice.is_none()
            && self.slug.is_none()
            && self.redirect_url.is_none()
            && self.pdf_url.is_none()
            && self.category.is_none()
    }

    /// Title from the content document, falling back to the preview.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        [self.content.as_ref(), self.preview.as_ref()]
            .into_iter()
            .flatten()
            .find_map(document_title)
    }

    /// Returns the new title when it differs from the one stored in `current`.
    #[must_use]
    pub fn renamed_title(&self, current: &Value) -> Option<String> {
        self.title()
            .filter(|title| document_title(current).as_deref() != Some(title.as_str()))
    }

    /// Returns the requested slug, if it is not blank.
    #[must_use]
    pub fn requested_slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
    }

    #[must_use]
    pub fn status(&self) -> Option<ContentStatus> {
        self.status.as_deref().map(ContentStatus::from_admin)
    }

    #[must_use]
    pub fn editors_choice(&self) -> Option<bool> {
        self.editors_choice.as_ref().map(parse_flag)
    }

    /// Preview with the document title merged in.
    #[must_use]
    pub fn preview_with_title(&self) -> Option<Value> {
        let mut preview = self.preview.clone()?;
        if let (Value::Object(fields), Some(title)) = (&mut preview, self.title()) {
            fields.insert(TITLE_FIELD.to_string(), Value::String(title));
        }
        Some(preview)
    }

    /// The content document, if it is a non-empty object.
    #[must_use]
    pub fn content(&self) -> Option<&Value> {
        self.content
            .as_ref()
            .filter(|content| matches!(content, Value::Object(fields) if !fields.is_empty()))
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
    }
}

/// ## Summary
/// Reads an editor's choice flag. The admin panel has sent booleans, `"Y"`
/// and `"N"` over time; anything unrecognised is `false`.
#[must_use]
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(flag) => matches!(
            flag.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "true" | "1"
        ),
        Value::Number(flag) => flag.as_i64() == Some(1),
        _ => false,
    }
}

/// Reads `blogTitle` from a stored document.
#[must_use]
pub fn document_title(document: &Value) -> Option<String> {
    document
        .as_object()
        .and_then(|fields| text_field(fields, TITLE_FIELD))
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn parse_id(value: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| ServiceError::ValidationError(format!("Invalid id '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test_log::test]
    fn test_create_document() {
        let document = AdminDocument::parse(json!({
            "blogTitle": "  Scaling Ghostwriting ",
            "blogStatus": "Published",
            "blogCategory": "ghostwriting",
            "previewData": { "imageURL": "/img/a.png" },
            "pdfUrl": "https://cdn.example.com/a.pdf",
            "reason": "create",
            "summary": "Hello",
        }))
        .expect("valid document");

        assert_eq!(document.mode, SaveMode::Create);
        assert_eq!(document.title, "Scaling Ghostwriting");
        assert_eq!(document.status, ContentStatus::Published);
        assert_eq!(document.category.as_deref(), Some("ghostwriting"));
        assert_eq!(document.pdf_url.as_deref(), Some("https://cdn.example.com/a.pdf"));
        assert!(!document.editors_choice);
        assert_eq!(
            document.preview,
            json!({ "imageURL": "/img/a.png", "blogTitle": "Scaling Ghostwriting" })
        );

        let content = document.content.as_object().expect("object");
        assert!(content.contains_key("summary"));
        assert!(!content.contains_key("previewData"));
        assert!(!content.contains_key("pdfUrl"));
        assert!(!content.contains_key("reason"));
    }

    #[test_log::test]
    fn test_update_document() {
        let id = Uuid::now_v7();
        let document = AdminDocument::parse(json!({
            "blogTitle": "Renamed",
            "reason": "update",
            "blog_id": id.to_string(),
            "editors_choice": "Y",
        }))
        .expect("valid document");

        assert_eq!(document.mode, SaveMode::Update(id));
        assert!(document.is_update());
        assert!(document.editors_choice);
        assert_eq!(document.status, ContentStatus::Draft);
        assert_eq!(document.preview, json!({ "blogTitle": "Renamed" }));
    }

    #[test_log::test]
    fn test_missing_title_is_invalid_input() {
        let err = AdminDocument::parse(json!({ "blogTitle": "   " })).expect_err("blank title");
        assert!(matches!(err, ServiceError::CoreError(CoreError::InvalidInput(_))));

        let err = AdminDocument::parse(json!({ "summary": "x" })).expect_err("missing title");
        assert!(err.is_client_error());
    }

    #[test_log::test]
    fn test_update_requires_valid_id() {
        let err = AdminDocument::parse(json!({ "blogTitle": "A", "reason": "update" }))
            .expect_err("missing id");
        assert!(matches!(err, ServiceError::ValidationError(_)));

        let err = AdminDocument::parse(json!({
            "blogTitle": "A",
            "reason": "update",
            "blog_id": "not-a-uuid",
        }))
        .expect_err("bad id");
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test_log::test]
    fn test_non_object_document() {
        assert!(AdminDocument::parse(json!(["blogTitle"])).is_err());
    }

    #[test_log::test]
    fn test_parse_flag() {
        for yes in [json!(true), json!("Y"), json!("yes"), json!("1"), json!(1)] {
            assert!(parse_flag(&yes), "{yes}");
        }
        for no in [json!(false), json!("N"), json!(""), json!(0), json!(null)] {
            assert!(!parse_flag(&no), "{no}");
        }
    }

    #[test_log::test]
    fn test_content_fields() {
        let fields: ContentFields = serde_json::from_value(json!({
            "blog": { "blogTitle": "New Title", "body": "..." },
            "preview": { "imageURL": "/x.png" },
            "status": "published",
            "editors_choice": "N",
        }))
        .expect("valid fields");

        assert!(!fields.is_empty());
        assert!(fields.content().is_some());
        assert_eq!(fields.title().as_deref(), Some("New Title"));
        assert_eq!(fields.status(), Some(ContentStatus::Published));
        assert_eq!(fields.editors_choice(), Some(false));
        assert_eq!(
            fields.preview_with_title(),
            Some(json!({ "imageURL": "/x.png", "blogTitle": "New Title" }))
        );

        assert_eq!(fields.renamed_title(&json!({ "blogTitle": "New Title" })), None);
        assert_eq!(
            fields.renamed_title(&json!({ "blogTitle": "Old Title" })).as_deref(),
            Some("New Title")
        );
    }

    #[test_log::test]
    fn test_empty_fields() {
        let fields: ContentFields = serde_json::from_value(json!({})).expect("valid fields");
        assert!(fields.is_empty());
        assert!(fields.content().is_none());
        assert_eq!(fields.requested_slug(), None);

        let fields = ContentFields {
            slug: Some("  ".to_string()),
            ..ContentFields::default()
        };
        assert_eq!(fields.requested_slug(), None);
    }
}
