use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Parsed webhook payload, classified by shape.
///
/// Listing feeds deliver either a wrapped collection, a bare array, or a
/// single object. Classification happens once, up front, so the rest of
/// the pipeline only ever sees a flat record sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookPayload {
    /// Object carrying a `properties` array.
    Wrapped(Vec<Value>),
    /// Single listing object, recognized by a usable `title`.
    Single(Value),
    /// Top-level array of records.
    List(Vec<Value>),
    /// Any other non-null value, carried as one candidate record.
    Other(Value),
    /// Null payload; nothing to process.
    Empty,
}

impl WebhookPayload {
    /// Classify a parsed payload. Rules apply in order: wrapped
    /// collection, titled single object, bare array, fallback.
    pub fn classify(payload: Value) -> Self {
        match payload {
            Value::Null => WebhookPayload::Empty,
            Value::Array(items) => WebhookPayload::List(items),
            Value::Object(mut fields) => match fields.remove("properties") {
                Some(Value::Array(items)) => WebhookPayload::Wrapped(items),
                not_a_collection => {
                    if let Some(value) = not_a_collection {
                        fields.insert("properties".to_string(), value);
                    }
                    if is_present(fields.get("title")) {
                        WebhookPayload::Single(Value::Object(fields))
                    } else {
                        WebhookPayload::Other(Value::Object(fields))
                    }
                }
            },
            other => WebhookPayload::Other(other),
        }
    }

    /// Flatten into the candidate record sequence.
    pub fn into_records(self) -> Vec<Value> {
        match self {
            WebhookPayload::Wrapped(items) | WebhookPayload::List(items) => items,
            WebhookPayload::Single(value) | WebhookPayload::Other(value) => vec![value],
            WebhookPayload::Empty => Vec::new(),
        }
    }
}

/// Field presence in the loose sense listing feeds use: missing, null,
/// false, zero and the empty string all count as absent.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// A property listing row as written to the row-store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRow {
    pub title: String,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub size: String,
    pub price: String,
    pub image_url: String,
    pub description: String,
    pub featured: bool,
    pub mls: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl PropertyRow {
    /// Build a row from a candidate record, or reject it.
    ///
    /// A record is accepted when it carries a non-empty `title` or a
    /// non-empty `address`. Everything else is defaulted, never
    /// validated: `type` falls back to `"Other"`, `featured` is true
    /// unless the record carries an explicit boolean false, `mls` is null
    /// unless a non-empty value is supplied, and the remaining string
    /// fields fall back to the empty string.
    pub fn from_record(record: &Value) -> Option<Self> {
        let title = text_field(record, "title");
        let address = text_field(record, "address");
        if title.is_empty() && address.is_empty() {
            return None;
        }

        let property_type = match text_field(record, "type") {
            t if t.is_empty() => "Other".to_string(),
            t => t,
        };

        Some(Self {
            title,
            address,
            property_type,
            size: text_field(record, "size"),
            price: text_field(record, "price"),
            image_url: text_field(record, "image_url"),
            description: text_field(record, "description"),
            featured: !matches!(record.get("featured"), Some(Value::Bool(false))),
            mls: match text_field(record, "mls") {
                m if m.is_empty() => None,
                m => Some(m),
            },
            received_at: Utc::now(),
        })
    }
}

/// String field access with the empty string standing in for anything
/// missing or non-string.
fn text_field(record: &Value, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Acknowledgment returned to the webhook caller.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
}

/// Outcome counts for one webhook delivery.
///
/// The wire response collapses this to a boolean; the counts exist for
/// the logs and for tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub received: usize,
    pub stored: usize,
    pub rejected: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_wrapped_collection() {
        let payload = json!({
            "source": "partner-feed",
            "properties": [
                {"title": "Unit A"},
                {"address": "1 Oak St"}
            ]
        });

        let records = WebhookPayload::classify(payload).into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], json!({"title": "Unit A"}));
        assert_eq!(records[1], json!({"address": "1 Oak St"}));
    }

    #[test]
    fn test_classify_titled_object_as_single_record() {
        let payload = json!({"title": "Unit A", "price": "250000"});

        let classified = WebhookPayload::classify(payload.clone());
        assert_eq!(classified, WebhookPayload::Single(payload.clone()));
        assert_eq!(classified.into_records(), vec![payload]);
    }

    #[test]
    fn test_classify_top_level_array() {
        let payload = json!([{"address": "1 Oak St"}, {"address": "2 Elm St"}]);

        let records = WebhookPayload::classify(payload).into_records();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_classify_null_payload_is_empty() {
        let records = WebhookPayload::classify(Value::Null).into_records();
        assert!(records.is_empty());
    }

    #[test]
    fn test_classify_untitled_object_wraps_as_one_record() {
        let payload = json!({"address": "1 Oak St"});

        let records = WebhookPayload::classify(payload.clone()).into_records();
        assert_eq!(records, vec![payload]);
    }

    #[test]
    fn test_classify_ignores_non_array_properties_field() {
        // A scalar `properties` field is not a collection; the object is
        // still a candidate in its own right, field intact.
        let payload = json!({"title": "Unit A", "properties": "not-a-list"});

        let records = WebhookPayload::classify(payload.clone()).into_records();
        assert_eq!(records, vec![payload]);
    }

    #[test]
    fn test_classify_empty_title_does_not_mark_single() {
        let payload = json!({"title": ""});

        match WebhookPayload::classify(payload) {
            WebhookPayload::Other(_) => {}
            other => panic!("expected Other, got {:?}", other),
        }
    }

    #[test]
    fn test_row_requires_title_or_address() {
        assert!(PropertyRow::from_record(&json!({})).is_none());
        assert!(PropertyRow::from_record(&json!({"title": "", "address": ""})).is_none());
        assert!(PropertyRow::from_record(&json!({"price": "100"})).is_none());

        assert!(PropertyRow::from_record(&json!({"title": "Unit A"})).is_some());
        assert!(PropertyRow::from_record(&json!({"address": "1 Oak St"})).is_some());
    }

    #[test]
    fn test_row_defaults() {
        let row = PropertyRow::from_record(&json!({"title": "Unit A"})).unwrap();

        assert_eq!(row.title, "Unit A");
        assert_eq!(row.address, "");
        assert_eq!(row.property_type, "Other");
        assert_eq!(row.size, "");
        assert_eq!(row.price, "");
        assert_eq!(row.image_url, "");
        assert_eq!(row.description, "");
        assert!(row.featured);
        assert_eq!(row.mls, None);
    }

    #[test]
    fn test_row_keeps_supplied_type() {
        let row =
            PropertyRow::from_record(&json!({"title": "Unit A", "type": "Office"})).unwrap();
        assert_eq!(row.property_type, "Office");

        let row = PropertyRow::from_record(&json!({"title": "Unit A", "type": ""})).unwrap();
        assert_eq!(row.property_type, "Other");
    }

    #[test]
    fn test_featured_only_disabled_by_explicit_false() {
        let row =
            PropertyRow::from_record(&json!({"title": "Unit A", "featured": false})).unwrap();
        assert!(!row.featured);

        let row =
            PropertyRow::from_record(&json!({"title": "Unit A", "featured": true})).unwrap();
        assert!(row.featured);

        let row =
            PropertyRow::from_record(&json!({"title": "Unit A", "featured": "no"})).unwrap();
        assert!(row.featured);

        let row = PropertyRow::from_record(&json!({"title": "Unit A"})).unwrap();
        assert!(row.featured);
    }

    #[test]
    fn test_mls_nullable() {
        let row = PropertyRow::from_record(&json!({"title": "Unit A"})).unwrap();
        assert_eq!(row.mls, None);

        let row = PropertyRow::from_record(&json!({"title": "Unit A", "mls": ""})).unwrap();
        assert_eq!(row.mls, None);

        let row =
            PropertyRow::from_record(&json!({"title": "Unit A", "mls": "MLS-42"})).unwrap();
        assert_eq!(row.mls, Some("MLS-42".to_string()));
    }

    #[test]
    fn test_row_serializes_type_column_name() {
        let row = PropertyRow::from_record(&json!({"title": "Unit A"})).unwrap();
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["type"], "Other");
        assert!(value.get("property_type").is_none());
        assert!(value["received_at"].is_string());
    }
}
