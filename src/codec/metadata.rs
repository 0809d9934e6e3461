//! Transaction metadata: label → value documents attached to a transaction.
//!
//! Wire form (detailed schema):
//!
//! ```text
//! { "<label>": { "<kind>": <value> }, ... }
//!
//! kind  = int    → JSON integer
//!       | bytes  → hex string
//!       | string → UTF-8 string
//!       | list   → [ value, ... ]
//!       | map    → [ { "k": value, "v": value }, ... ]
//! ```
//!
//! Strings and byte strings are capped at 64 bytes and the whole encoded
//! document at [`MAX_METADATA_BYTES`]. Violations fail at construction or
//! encoding time, before anything is handed to a transport.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// Longest string or byte string a single metadata value may hold.
pub const MAX_VALUE_BYTES: usize = 64;
/// Ceiling for the encoded metadata document.
pub const MAX_METADATA_BYTES: usize = 16 * 1024;
/// Integers are carried as plain JSON numbers, so they must fit i64 or u64.
pub const MIN_INT: i128 = i64::MIN as i128;
pub const MAX_INT: i128 = u64::MAX as i128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Int(i128),
    Bytes(Vec<u8>),
    String(String),
    List(Vec<MetadataValue>),
    Map(Vec<(MetadataValue, MetadataValue)>),
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self { MetadataValue::String(s.to_string()) }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self { MetadataValue::String(s) }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self { MetadataValue::Int(n as i128) }
}

impl From<u64> for MetadataValue {
    fn from(n: u64) -> Self { MetadataValue::Int(n as i128) }
}

impl From<Vec<u8>> for MetadataValue {
    fn from(b: Vec<u8>) -> Self { MetadataValue::Bytes(b) }
}

impl MetadataValue {
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataValue::Int(_) => "int",
            MetadataValue::Bytes(_) => "bytes",
            MetadataValue::String(_) => "string",
            MetadataValue::List(_) => "list",
            MetadataValue::Map(_) => "map",
        }
    }

    /// Check size and range constraints, recursing into lists and maps.
    pub fn validate(&self) -> Result<(), ApiError> {
        match self {
            MetadataValue::Int(n) if !(MIN_INT..=MAX_INT).contains(n) => {
                Err(ApiError::InvalidMetadata(format!("integer {n} is out of range")))
            }
            MetadataValue::Int(_) => Ok(()),
            MetadataValue::Bytes(b) if b.len() > MAX_VALUE_BYTES => Err(ApiError::InvalidMetadata(format!(
                "byte string is {} bytes, limit is {MAX_VALUE_BYTES}",
                b.len()
            ))),
            MetadataValue::String(s) if s.len() > MAX_VALUE_BYTES => Err(ApiError::InvalidMetadata(format!(
                "string is {} bytes, limit is {MAX_VALUE_BYTES}",
                s.len()
            ))),
            MetadataValue::Bytes(_) | MetadataValue::String(_) => Ok(()),
            MetadataValue::List(items) => items.iter().try_for_each(MetadataValue::validate),
            MetadataValue::Map(entries) => entries.iter().try_for_each(|(k, v)| {
                k.validate()?;
                v.validate()
            }),
        }
    }

    /// Wire form of a value. The value must already have passed [`MetadataValue::validate`].
    pub(crate) fn to_wire(&self) -> Value {
        match self {
            MetadataValue::Int(n) => {
                debug_assert!((MIN_INT..=MAX_INT).contains(n), "metadata integer {n} was never validated");
                let number = if *n >= 0 { json!(*n as u64) } else { json!(*n as i64) };
                json!({ "int": number })
            }
            MetadataValue::Bytes(b) => json!({ "bytes": hex::encode(b) }),
            MetadataValue::String(s) => json!({ "string": s }),
            MetadataValue::List(items) => json!({ "list": items.iter().map(MetadataValue::to_wire).collect::<Vec<_>>() }),
            MetadataValue::Map(entries) => json!({
                "map": entries.iter().map(|(k, v)| json!({"k": k.to_wire(), "v": v.to_wire()})).collect::<Vec<_>>()
            }),
        }
    }

    pub fn from_wire(value: &Value) -> Result<Self, String> {
        let obj = value.as_object().ok_or_else(|| format!("metadata value must be an object, got {value}"))?;
        if obj.len() != 1 {
            return Err(format!("metadata value must have exactly one kind tag, got {}", obj.len()));
        }
        let (kind, inner) = obj.iter().next().ok_or("empty metadata value")?;
        let parsed = match kind.as_str() {
            "int" => {
                let n = inner
                    .as_u64()
                    .map(|n| n as i128)
                    .or_else(|| inner.as_i64().map(|n| n as i128))
                    .ok_or_else(|| format!("'int' must be an integer, got {inner}"))?;
                MetadataValue::Int(n)
            }
            "bytes" => {
                let s = inner.as_str().ok_or("'bytes' must be a hex string")?;
                MetadataValue::Bytes(hex::decode(s).map_err(|e| format!("'bytes' is not hex: {e}"))?)
            }
            "string" => MetadataValue::String(inner.as_str().ok_or("'string' must be a string")?.to_string()),
            "list" => {
                let items = inner.as_array().ok_or("'list' must be an array")?;
                MetadataValue::List(items.iter().map(MetadataValue::from_wire).collect::<Result<_, _>>()?)
            }
            "map" => {
                let entries = inner.as_array().ok_or("'map' must be an array")?;
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    let k = entry.get("k").ok_or("map entry is missing 'k'")?;
                    let v = entry.get("v").ok_or("map entry is missing 'v'")?;
                    pairs.push((MetadataValue::from_wire(k)?, MetadataValue::from_wire(v)?));
                }
                MetadataValue::Map(pairs)
            }
            other => return Err(format!("unknown metadata kind '{other}'")),
        };
        parsed.validate().map_err(|e| e.message())?;
        Ok(parsed)
    }
}

/// Label → value mapping. Labels iterate in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap(BTreeMap<u64, MetadataValue>);

impl MetadataMap {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, label: u64, value: impl Into<MetadataValue>) -> Result<(), ApiError> {
        let value = value.into();
        value.validate()?;
        self.0.insert(label, value);
        Ok(())
    }

    pub fn with(mut self, label: u64, value: impl Into<MetadataValue>) -> Result<Self, ApiError> {
        self.insert(label, value)?;
        Ok(self)
    }

    pub fn get(&self, label: u64) -> Option<&MetadataValue> { self.0.get(&label) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &MetadataValue)> { self.0.iter() }

    pub fn to_wire(&self) -> Value {
        Value::Object(self.0.iter().map(|(label, v)| (label.to_string(), v.to_wire())).collect::<Map<_, _>>())
    }

    pub fn from_wire(value: &Value) -> Result<Self, String> {
        let obj = value.as_object().ok_or_else(|| format!("metadata must be an object, got {value}"))?;
        let mut map = BTreeMap::new();
        for (key, v) in obj {
            let label: u64 = key.parse().map_err(|_| format!("metadata label '{key}' is not an unsigned 64-bit integer"))?;
            // only the canonical decimal spelling; "+1" or "01" would alias label 1
            if label.to_string() != *key {
                return Err(format!("metadata label '{key}' must be written as '{label}'"));
            }
            map.insert(label, MetadataValue::from_wire(v).map_err(|e| format!("label {label}: {e}"))?);
        }
        Ok(Self(map))
    }
}

/// Collects without per-entry checks; [`TxMetadata::encode`] validates before transmission.
impl FromIterator<(u64, MetadataValue)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (u64, MetadataValue)>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

impl Serialize for MetadataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> { self.to_wire().serialize(serializer) }
}

impl<'de> Deserialize<'de> for MetadataMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        MetadataMap::from_wire(&raw).map_err(serde::de::Error::custom)
    }
}

/// A caller-supplied JSON document already in wire form, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonMetadata(Value);

impl JsonMetadata {
    pub fn new(document: Value) -> Result<Self, ApiError> {
        MetadataMap::from_wire(&document).map_err(ApiError::InvalidMetadata)?;
        Ok(Self(document))
    }

    pub fn parse(document: &str) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| ApiError::InvalidMetadata(format!("not valid JSON: {e}")))?;
        Self::new(value)
    }

    pub fn as_value(&self) -> &Value { &self.0 }
}

/// Metadata attached to an outgoing transaction or fee estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum TxMetadata {
    Json(JsonMetadata),
    Map(MetadataMap),
}

impl From<MetadataMap> for TxMetadata {
    fn from(m: MetadataMap) -> Self { TxMetadata::Map(m) }
}

impl From<JsonMetadata> for TxMetadata {
    fn from(j: JsonMetadata) -> Self { TxMetadata::Json(j) }
}

impl TxMetadata {
    /// Encode for transmission, enforcing every constraint including the document ceiling.
    pub fn encode(&self) -> Result<Value, ApiError> {
        let wire = match self {
            TxMetadata::Json(doc) => {
                MetadataMap::from_wire(doc.as_value()).map_err(ApiError::InvalidMetadata)?;
                doc.as_value().clone()
            }
            TxMetadata::Map(map) => {
                map.iter().try_for_each(|(_, v)| v.validate())?;
                map.to_wire()
            }
        };
        let size = serde_json::to_vec(&wire)
            .map_err(|e| ApiError::InvalidMetadata(e.to_string()))?
            .len();
        if size > MAX_METADATA_BYTES {
            return Err(ApiError::InvalidMetadata(format!(
                "encoded metadata is {size} bytes, limit is {MAX_METADATA_BYTES}"
            )));
        }
        Ok(wire)
    }
}

/// Convenience constructors for [`TxMetadata`].
pub struct MetadataBuilder;

impl MetadataBuilder {
    pub fn with_json(document: Value) -> Result<TxMetadata, ApiError> { Ok(JsonMetadata::new(document)?.into()) }

    pub fn with_json_string(document: &str) -> Result<TxMetadata, ApiError> { Ok(JsonMetadata::parse(document)?.into()) }

    pub fn with_map(entries: HashMap<u64, String>) -> Result<TxMetadata, ApiError> {
        let mut map = MetadataMap::new();
        for (label, text) in entries {
            map.insert(label, text)?;
        }
        Ok(map.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_over_64_bytes_rejected() {
        let long = "x".repeat(65);
        let err = MetadataMap::new().with(1, long.as_str()).unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_METADATA);
        assert!(MetadataMap::new().with(1, "x".repeat(64)).is_ok());
    }

    #[test]
    fn test_multibyte_string_counted_in_bytes() {
        // 22 three-byte characters = 66 bytes
        let text = "€".repeat(22);
        assert!(MetadataMap::new().with(7, text).is_err());
    }

    #[test]
    fn test_bytes_over_64_rejected() {
        assert!(MetadataMap::new().with(2, vec![0u8; 65]).is_err());
        assert!(MetadataMap::new().with(2, vec![0u8; 64]).is_ok());
    }

    #[test]
    fn test_wire_shape() {
        let map = MetadataMap::new()
            .with(u64::MAX, "hello world").unwrap()
            .with(0, 42u64).unwrap()
            .with(5, vec![0xde, 0xad]).unwrap();
        let wire = TxMetadata::from(map).encode().unwrap();
        assert_eq!(
            wire,
            json!({
                "0": {"int": 42},
                "5": {"bytes": "dead"},
                "18446744073709551615": {"string": "hello world"}
            })
        );
    }

    #[test]
    fn test_nested_round_trip() {
        let nested = MetadataValue::Map(vec![
            (MetadataValue::from("k"), MetadataValue::List(vec![MetadataValue::from(-3i64), MetadataValue::from("v")])),
        ]);
        let map = MetadataMap::new().with(674, nested).unwrap();
        let wire = map.to_wire();
        assert_eq!(MetadataMap::from_wire(&wire).unwrap(), map);
    }

    #[test]
    fn test_bytes_round_trip_nested() {
        let nested = MetadataValue::List(vec![
            MetadataValue::Bytes(Vec::new()),
            MetadataValue::Map(vec![(MetadataValue::from(1u64), MetadataValue::Bytes((0..64).collect()))]),
        ]);
        let map = MetadataMap::new().with(3, nested).unwrap();
        let wire = map.to_wire();
        assert_eq!(wire["3"]["list"][0], json!({"bytes": ""}));
        assert_eq!(MetadataMap::from_wire(&wire).unwrap(), map);
    }

    #[test]
    fn test_non_canonical_labels_rejected() {
        for doc in [r#"{"+1": {"string": "a"}}"#, r#"{"007": {"int": 1}}"#, r#"{"1": {"int": 1}, "01": {"int": 2}}"#] {
            let err = MetadataBuilder::with_json_string(doc).unwrap_err();
            assert_eq!(err.code(), crate::error::INVALID_METADATA, "{doc}");
        }
        assert!(MetadataBuilder::with_json_string(r#"{"0": {"int": 1}, "10": {"int": 2}}"#).is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "never validated")]
    fn test_unvalidated_int_caught_on_wire() {
        let map: MetadataMap = [(1u64, MetadataValue::Int(MAX_INT + 1))].into_iter().collect();
        let _ = map.to_wire();
    }

    #[test]
    fn test_nested_violation_rejected() {
        let nested = MetadataValue::List(vec![MetadataValue::String("y".repeat(65))]);
        assert!(MetadataMap::new().with(1, nested).is_err());
    }

    #[test]
    fn test_json_document_validation() {
        assert!(MetadataBuilder::with_json_string(r#"{"1": {"string": "ok"}}"#).is_ok());
        assert!(MetadataBuilder::with_json_string(r#"{"abc": {"string": "ok"}}"#).is_err());
        assert!(MetadataBuilder::with_json_string(r#"{"1": {"float": 1.5}}"#).is_err());
        assert!(MetadataBuilder::with_json_string("not json").is_err());
        assert!(MetadataBuilder::with_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_document_ceiling() {
        let mut map = MetadataMap::new();
        for label in 0..400u64 {
            map.insert(label, "z".repeat(64)).unwrap();
        }
        let err = TxMetadata::from(map).encode().unwrap_err();
        assert!(err.message().contains("limit"));
    }

    #[test]
    fn test_collected_map_checked_on_encode() {
        let map: MetadataMap = [(1u64, MetadataValue::from("q".repeat(65)))].into_iter().collect();
        assert_eq!(map.len(), 1);
        let err = TxMetadata::from(map).encode().unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_METADATA);
    }

    #[test]
    fn test_int_range() {
        assert!(MetadataValue::Int(MAX_INT + 1).validate().is_err());
        assert!(MetadataValue::Int(MIN_INT - 1).validate().is_err());
        assert!(MetadataValue::Int(MIN_INT).validate().is_ok());
    }

    #[test]
    fn test_with_map_builder() {
        let mut entries = HashMap::new();
        entries.insert(9_223_372_036_854_775_807u64, "hello world".to_string());
        let TxMetadata::Map(map) = MetadataBuilder::with_map(entries).unwrap() else { panic!("expected map") };
        assert_eq!(map.get(9_223_372_036_854_775_807), Some(&MetadataValue::from("hello world")));
    }
}
