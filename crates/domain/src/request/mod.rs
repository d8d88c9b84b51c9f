//! Request-side types: methods, payloads, file parts, bodies and descriptors.

mod body;
mod file;
mod method;
mod payload;
mod spec;

pub use body::{JSON_CONTENT_TYPE, MultipartField, MultipartForm, MultipartValue, RequestBody};
pub use file::{
    CONTENT_SCHEME, FALLBACK_MEDIA_TYPE, FILE_SCHEME, FilePart, NormalizedFile, extension_of,
    media_type_for_extension,
};
pub use method::HttpMethod;
pub use payload::{Payload, PayloadValue};
pub use spec::{Header, RequestDescriptor};
