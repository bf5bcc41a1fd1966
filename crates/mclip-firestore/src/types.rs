//! Firestore REST API types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Firestore document value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(String), // integers travel as strings
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<HashMap<String, Value>>,
}

/// Firestore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Create a new document with the given fields.
    pub fn new(fields: HashMap<String, Value>) -> Self {
        Self {
            name: None,
            fields: Some(fields),
            create_time: None,
            update_time: None,
        }
    }

    /// Last path segment of the resource name.
    pub fn id(&self) -> Option<&str> {
        self.name.as_deref().and_then(|n| n.rsplit('/').next())
    }

    /// Typed field lookup.
    pub fn get<T: FromFirestoreValue>(&self, key: &str) -> Option<T> {
        self.fields
            .as_ref()
            .and_then(|f| f.get(key))
            .and_then(T::from_firestore_value)
    }
}

// ============================================================================
// Structured queries
// ============================================================================

/// Body of a `:runQuery` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

/// One element of the `:runQuery` response stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponse {
    pub document: Option<Document>,
    pub read_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl StructuredQuery {
    /// Query over a single collection.
    pub fn collection(collection_id: impl Into<String>) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: collection_id.into(),
            }],
            filter: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Require `field == value`.
    pub fn where_eq(mut self, field: &str, value: Value) -> Self {
        self.filter = Some(Filter {
            field_filter: FieldFilter {
                field: FieldReference::new(field),
                op: FieldOperator::Equal,
                value,
            },
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push(Order {
            field: FieldReference::new(field),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: FieldOperator,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldOperator {
    Equal,
    ArrayContains,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

impl FieldReference {
    pub fn new(path: &str) -> Self {
        Self {
            field_path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Ascending,
    Descending,
}

// ============================================================================
// Value conversions
// ============================================================================

/// Convert a Rust value to Firestore Value.
pub trait ToFirestoreValue {
    fn to_firestore_value(&self) -> Value;
}

impl ToFirestoreValue for String {
    fn to_firestore_value(&self) -> Value {
        Value::StringValue(self.clone())
    }
}

impl ToFirestoreValue for &str {
    fn to_firestore_value(&self) -> Value {
        Value::StringValue(self.to_string())
    }
}

impl ToFirestoreValue for i64 {
    fn to_firestore_value(&self) -> Value {
        Value::IntegerValue(self.to_string())
    }
}

impl ToFirestoreValue for u8 {
    fn to_firestore_value(&self) -> Value {
        Value::IntegerValue(self.to_string())
    }
}

impl ToFirestoreValue for bool {
    fn to_firestore_value(&self) -> Value {
        Value::BooleanValue(*self)
    }
}

impl ToFirestoreValue for DateTime<Utc> {
    fn to_firestore_value(&self) -> Value {
        Value::TimestampValue(self.to_rfc3339())
    }
}

impl<T: ToFirestoreValue> ToFirestoreValue for Option<T> {
    fn to_firestore_value(&self) -> Value {
        match self {
            Some(v) => v.to_firestore_value(),
            None => Value::NullValue(()),
        }
    }
}

impl<T: ToFirestoreValue> ToFirestoreValue for Vec<T> {
    fn to_firestore_value(&self) -> Value {
        Value::ArrayValue(ArrayValue {
            values: Some(self.iter().map(|v| v.to_firestore_value()).collect()),
        })
    }
}

/// Convert Firestore Value to Rust type.
pub trait FromFirestoreValue: Sized {
    fn from_firestore_value(value: &Value) -> Option<Self>;
}

impl FromFirestoreValue for String {
    fn from_firestore_value(value: &Value) -> Option<Self> {
        match value {
            Value::StringValue(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromFirestoreValue for i64 {
    fn from_firestore_value(value: &Value) -> Option<Self> {
        match value {
            Value::IntegerValue(s) => s.parse().ok(),
            Value::DoubleValue(f) => Some(*f as i64),
            _ => None,
        }
    }
}

impl FromFirestoreValue for u8 {
    fn from_firestore_value(value: &Value) -> Option<Self> {
        i64::from_firestore_value(value).and_then(|v| u8::try_from(v).ok())
    }
}

impl FromFirestoreValue for bool {
    fn from_firestore_value(value: &Value) -> Option<Self> {
        match value {
            Value::BooleanValue(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromFirestoreValue for DateTime<Utc> {
    fn from_firestore_value(value: &Value) -> Option<Self> {
        match value {
            Value::TimestampValue(s) => DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.into()),
            _ => None,
        }
    }
}

impl<T: FromFirestoreValue> FromFirestoreValue for Vec<T> {
    fn from_firestore_value(value: &Value) -> Option<Self> {
        match value {
            Value::ArrayValue(array) => Some(
                array
                    .values
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(T::from_firestore_value)
                    .collect(),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_wire_format() {
        let value = vec!["a".to_string(), "b".to_string()].to_firestore_value();
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({ "arrayValue": { "values": [{ "stringValue": "a" }, { "stringValue": "b" }] } })
        );
        assert_eq!(
            serde_json::to_value(7u8.to_firestore_value()).unwrap(),
            json!({ "integerValue": "7" })
        );
        assert_eq!(
            serde_json::to_value(None::<String>.to_firestore_value()).unwrap(),
            json!({ "nullValue": null })
        );
    }

    #[test]
    fn test_empty_array_reads_as_empty_vec() {
        let value: Value = serde_json::from_value(json!({ "arrayValue": {} })).unwrap();
        assert_eq!(Vec::<String>::from_firestore_value(&value), Some(vec![]));
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let value: Value =
            serde_json::from_value(json!({ "timestampValue": "2024-05-01T10:00:00.123456Z" })).unwrap();
        let parsed = DateTime::<Utc>::from_firestore_value(&value).unwrap();
        assert_eq!(parsed.timestamp(), 1714557600);
    }

    #[test]
    fn test_structured_query_shape() {
        let query = StructuredQuery::collection("videoProjects")
            .where_eq("userId", "u1".to_firestore_value())
            .order_by("createdAt", Direction::Descending)
            .limit(10);
        assert_eq!(
            serde_json::to_value(RunQueryRequest { structured_query: query }).unwrap(),
            json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "videoProjects" }],
                    "where": { "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": "u1" }
                    } },
                    "orderBy": [{ "field": { "fieldPath": "createdAt" }, "direction": "DESCENDING" }],
                    "limit": 10
                }
            })
        );
    }

    #[test]
    fn test_document_id_and_get() {
        let doc: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/videoProjects/abc",
            "fields": { "prompt": { "stringValue": "wave" } }
        }))
        .unwrap();
        assert_eq!(doc.id(), Some("abc"));
        assert_eq!(doc.get::<String>("prompt").as_deref(), Some("wave"));
        assert_eq!(doc.get::<String>("missing"), None);
    }
}
