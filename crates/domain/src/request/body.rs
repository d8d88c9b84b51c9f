//! Request body normalization.
//!
//! A payload with any file part becomes a multipart form; anything else is
//! sent as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FilePart, NormalizedFile, Payload, PayloadValue};

/// Content type declared for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Value carried by a single multipart field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MultipartValue {
    /// Scalar field, already stringified.
    Text {
        /// Field value.
        value: String,
    },
    /// File part whose locator has not been normalized yet.
    File {
        /// The file as provided by the caller.
        part: FilePart,
    },
    /// File part ready for upload.
    Upload {
        /// The normalized file.
        file: NormalizedFile,
    },
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipartField {
    /// Field name, including any `[index]` suffixes.
    pub name: String,
    /// Field content.
    pub value: MultipartValue,
}

impl MultipartField {
    /// Creates a text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: MultipartValue::Text {
                value: value.into(),
            },
        }
    }
}

/// A multipart form: ordered text fields and file parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultipartForm {
    /// Fields in encoding order.
    pub fields: Vec<MultipartField>,
}

impl MultipartForm {
    /// Flattens a payload into multipart fields.
    ///
    /// Booleans become `"1"`/`"0"`, lists become `name[0]`, `name[1]`, ...,
    /// nested objects become `name[key]`, and nulls are omitted.
    #[must_use]
    pub fn from_payload(payload: &Payload) -> Self {
        let mut fields = Vec::new();
        for (key, value) in payload.iter() {
            flatten(key.to_string(), value, &mut fields);
        }
        Self { fields }
    }

    /// Looks up the text value of a field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            MultipartValue::Text { value } if f.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Returns true if any file part still needs locator normalization.
    #[must_use]
    pub fn has_pending_files(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.value, MultipartValue::File { .. }))
    }

    /// Number of file parts, pending or ready.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| !matches!(f.value, MultipartValue::Text { .. }))
            .count()
    }
}

fn flatten(name: String, value: &PayloadValue, out: &mut Vec<MultipartField>) {
    match value {
        PayloadValue::Null => {}
        PayloadValue::Bool(b) => {
            out.push(MultipartField::text(name, if *b { "1" } else { "0" }));
        }
        PayloadValue::Number(n) => out.push(MultipartField::text(name, n.to_string())),
        PayloadValue::Text(s) => out.push(MultipartField::text(name, s.clone())),
        PayloadValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(format!("{name}[{index}]"), item, out);
            }
        }
        PayloadValue::Object(entries) => {
            for (key, item) in entries {
                flatten(format!("{name}[{key}]"), item, out);
            }
        }
        PayloadValue::File(part) => out.push(MultipartField {
            name,
            value: MultipartValue::File { part: part.clone() },
        }),
    }
}

/// The single active body representation of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// JSON document.
    Json(Value),
    /// Multipart form; the transport derives the boundary.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Picks the body representation for a payload.
    #[must_use]
    pub fn from_payload(payload: &Payload) -> Self {
        if payload.has_files() {
            Self::Multipart(MultipartForm::from_payload(payload))
        } else {
            Self::Json(payload.to_json())
        }
    }

    /// Content type the pipeline declares for this body.
    ///
    /// Multipart bodies return `None`: their content type carries a boundary
    /// that only the transport knows.
    #[must_use]
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Json(_) => Some(JSON_CONTENT_TYPE),
            Self::None | Self::Multipart(_) => None,
        }
    }

    /// Returns true if this is a multipart form.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Returns true if there is no body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
