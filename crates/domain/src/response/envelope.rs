//! Response envelope normalization.
//!
//! Endpoints wrap their record lists in different shapes: a bare array,
//! `{data: [...]}`, `{data: {data: [...]}}`, `{items: [...]}` and so on.
//! [`EXTRACTORS`] lists the known shapes in priority order; the first one
//! that matches wins. New shapes are added to the table, not to the control
//! flow.

use serde_json::Value;

/// A named strategy that pulls a record list out of an envelope.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeExtractor {
    /// Shape name, for logs.
    pub name: &'static str,
    /// Pure extraction function.
    pub extract: fn(&Value) -> Option<&Vec<Value>>,
}

/// Known envelope shapes, highest priority first.
pub const EXTRACTORS: &[EnvelopeExtractor] = &[
    EnvelopeExtractor {
        name: "array",
        extract: Value::as_array,
    },
    EnvelopeExtractor {
        name: "data",
        extract: |v| v.get("data")?.as_array(),
    },
    EnvelopeExtractor {
        name: "data.data",
        extract: |v| v.get("data")?.get("data")?.as_array(),
    },
    EnvelopeExtractor {
        name: "items",
        extract: |v| v.get("items")?.as_array(),
    },
    EnvelopeExtractor {
        name: "coupons",
        extract: |v| v.get("coupons")?.as_array(),
    },
    EnvelopeExtractor {
        name: "results",
        extract: |v| v.get("results")?.as_array(),
    },
    EnvelopeExtractor {
        name: "data.items",
        extract: |v| v.get("data")?.get("items")?.as_array(),
    },
    EnvelopeExtractor {
        name: "data.coupons",
        extract: |v| v.get("data")?.get("coupons")?.as_array(),
    },
    EnvelopeExtractor {
        name: "data.results",
        extract: |v| v.get("data")?.get("results")?.as_array(),
    },
];

/// Finds the first extractor in `extractors` matching `envelope`.
#[must_use]
pub fn find_records<'a>(
    envelope: &'a Value,
    extractors: &[EnvelopeExtractor],
) -> Option<(&'static str, &'a Vec<Value>)> {
    extractors
        .iter()
        .find_map(|e| (e.extract)(envelope).map(|records| (e.name, records)))
}

/// Normalizes an envelope into an ordered list of records.
///
/// Never fails: an envelope with no recognizable list yields an empty vector.
#[must_use]
pub fn normalize_records(envelope: &Value) -> Vec<Value> {
    find_records(envelope, EXTRACTORS)
        .map(|(_, records)| records.clone())
        .unwrap_or_default()
}

/// Unwraps a single-record envelope.
///
/// `{data: {...}}` yields the inner object; anything else is returned as is.
#[must_use]
pub fn normalize_record(envelope: Value) -> Value {
    match envelope {
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_known_shapes_normalize_to_same_sequence() {
        let expected = vec![json!(1), json!(2), json!(3)];
        for envelope in [
            json!([1, 2, 3]),
            json!({"data": [1, 2, 3]}),
            json!({"data": {"data": [1, 2, 3]}}),
            json!({"items": [1, 2, 3]}),
            json!({"coupons": [1, 2, 3]}),
            json!({"results": [1, 2, 3]}),
            json!({"data": {"items": [1, 2, 3]}}),
            json!({"data": {"coupons": [1, 2, 3]}}),
        ] {
            assert_eq!(normalize_records(&envelope), expected, "{envelope}");
        }
    }

    #[test]
    fn test_unknown_shapes_yield_empty() {
        assert!(normalize_records(&json!({})).is_empty());
        assert!(normalize_records(&json!(null)).is_empty());
        assert!(normalize_records(&json!({"data": "nope"})).is_empty());
        assert!(normalize_records(&json!("text")).is_empty());
    }

    #[test]
    fn test_priority_order() {
        let envelope = json!({"items": [9], "data": [1]});
        assert_eq!(find_records(&envelope, EXTRACTORS).map(|(n, _)| n), Some("data"));

        let envelope = json!({"items": [9], "data": {"data": [1]}});
        assert_eq!(normalize_records(&envelope), vec![json!(1)]);

        let envelope = json!({"coupons": [5], "items": [9]});
        assert_eq!(normalize_records(&envelope), vec![json!(9)]);
    }

    #[test]
    fn test_custom_extractor_list() {
        let extractors = [EnvelopeExtractor {
            name: "orders",
            extract: |v| v.get("orders")?.as_array(),
        }];
        let envelope = json!({"orders": [{"id": 1}]});
        assert_eq!(
            find_records(&envelope, &extractors).map(|(_, r)| r.len()),
            Some(1)
        );
    }

    #[test]
    fn test_normalize_record() {
        assert_eq!(normalize_record(json!({"data": {"id": 7}})), json!({"id": 7}));
        assert_eq!(normalize_record(json!({"id": 7})), json!({"id": 7}));
        assert_eq!(normalize_record(json!({"data": [1]})), json!({"data": [1]}));
    }
}
