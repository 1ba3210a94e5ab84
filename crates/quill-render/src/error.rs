use quill_core::error::CoreError;
use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("XML serialization error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Rendered document is not valid UTF-8: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    #[error("Template '{name}' could not be read: {source}")]
    TemplateRead {
        name: &'static str,
        source: std::io::Error,
    },

    #[error("Core error: {0}")]
    CoreError(#[from] CoreError),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;
