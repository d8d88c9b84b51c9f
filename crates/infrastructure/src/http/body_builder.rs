//! HTTP request body builder.
//!
//! Turns the domain [`RequestBody`] into something reqwest can send. File
//! parts are read from disk here, after locator normalization.

use std::path::PathBuf;

use reqwest::multipart::{Form, Part};
use vendorlink_application::TransportError;
use vendorlink_domain::{
    NormalizedFile, RequestBody,
    request::{FILE_SCHEME, MultipartForm, MultipartValue},
};

/// Result of building a body.
#[derive(Debug)]
pub enum BuiltBody {
    /// No body.
    None,
    /// Serialized JSON.
    Json(String),
    /// Multipart form data; reqwest derives the boundary.
    Multipart(Form),
}

/// Build an HTTP body from a request body.
///
/// # Errors
///
/// Returns `TransportError::Upload` if a file part cannot be read, and
/// `TransportError::Other` if the JSON cannot be serialized.
pub async fn build_body(body: &RequestBody) -> Result<BuiltBody, TransportError> {
    match body {
        RequestBody::None => Ok(BuiltBody::None),
        RequestBody::Json(value) => serde_json::to_string(value)
            .map(BuiltBody::Json)
            .map_err(|e| TransportError::Other(format!("Serialization error: {e}"))),
        RequestBody::Multipart(form) => build_multipart_form(form).await.map(BuiltBody::Multipart),
    }
}

/// Build a multipart form from its fields.
async fn build_multipart_form(form: &MultipartForm) -> Result<Form, TransportError> {
    let mut multipart = Form::new();

    for field in &form.fields {
        let part = match &field.value {
            MultipartValue::Text { value } => {
                multipart = multipart.text(field.name.clone(), value.clone());
                continue;
            }
            MultipartValue::Upload { file } => file_part(file).await?,
            MultipartValue::File { part } => {
                file_part(&NormalizedFile::from_part(part, part.locator.clone())).await?
            }
        };
        multipart = multipart.part(field.name.clone(), part);
    }

    Ok(multipart)
}

async fn file_part(file: &NormalizedFile) -> Result<Part, TransportError> {
    let path = local_path(&file.locator);
    let content = tokio::fs::read(&path)
        .await
        .map_err(|e| TransportError::Upload {
            locator: file.locator.clone(),
            message: e.to_string(),
        })?;

    let mime_type = file
        .media_type
        .parse::<mime::Mime>()
        .map_or_else(|_| mime::IMAGE_JPEG.to_string(), |m| m.to_string());

    Part::bytes(content)
        .file_name(file.file_name.clone())
        .mime_str(&mime_type)
        .map_err(|e| TransportError::Other(format!("Invalid MIME type: {e}")))
}

/// Resolves a locator to a filesystem path.
fn local_path(locator: &str) -> PathBuf {
    PathBuf::from(locator.strip_prefix(FILE_SCHEME).unwrap_or(locator))
}
