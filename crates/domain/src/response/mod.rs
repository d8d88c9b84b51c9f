//! Response-side types: the raw response and envelope normalization.

mod envelope;
mod spec;

pub use envelope::{
    EXTRACTORS, EnvelopeExtractor, find_records, normalize_record, normalize_records,
};
pub use spec::{ResponseSpec, StatusCode};
