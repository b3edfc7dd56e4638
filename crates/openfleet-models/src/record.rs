//! Attribute-tracked records.
//!
//! [`Record`] is the base abstraction shared by every wire-facing resource
//! (jobs, items, vehicles). It holds a fixed, schema-shaped map of field
//! values and remembers which fields have been explicitly assigned since
//! construction or the last [`reset_dirty`](Record::reset_dirty).
//!
//! That bookkeeping exists because of the API's wire convention: a key that
//! is **absent** from a payload means "leave this field unchanged", while a
//! key that is **present with value `null`** means "clear this field". A
//! record therefore serializes only the fields it can justify sending:
//!
//! - fields whose current value is non-null, or
//! - fields explicitly assigned since the last clean point (even to null), or
//! - fields the schema marks as always-required.
//!
//! Everything else is omitted, so two independently-fetched records for the
//! same remote resource can each be mutated with disjoint field sets and
//! saved without clobbering each other's untouched fields.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::schema::Schema;

/// Treat `null`, `""` and `[]` as "not provided" when populating a record
/// from an input mapping or a server response.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// One domain object as it appears both locally and on the remote system.
///
/// A `Record` always contains exactly the fields of its [`Schema`] — no
/// extraneous keys, no missing keys. Values are JSON values; the remote API
/// performs any type coercion server-side.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static Schema,
    values: Map<String, Value>,
    dirty: BTreeSet<&'static str>,
}

impl Record {
    /// Create a record with every field at its schema default.
    pub fn new(schema: &'static Schema) -> Self {
        let mut values = Map::new();
        for &field in schema.fields {
            let value = schema
                .default_for(field)
                .map_or(Value::Null, |d| Value::String(d.to_string()));
            values.insert(field.to_string(), value);
        }
        Self {
            schema,
            values,
            dirty: BTreeSet::new(),
        }
    }

    /// Create a record from a (possibly sparse) input mapping.
    ///
    /// Keys not in the schema are ignored; null and empty inputs keep the
    /// schema default. Constructor-populated fields are **not** marked
    /// dirty: non-null values are serialized regardless of dirtiness, and a
    /// clean baseline lets server responses hydrate records without extra
    /// bookkeeping.
    pub fn from_value(schema: &'static Schema, input: &Value) -> Self {
        let mut record = Self::new(schema);
        record.populate(input);
        record
    }

    fn populate(&mut self, input: &Value) {
        if let Value::Object(map) = input {
            for (key, value) in map {
                if is_unset(value) {
                    continue;
                }
                if let Some(field) = self.schema.canonical(key) {
                    self.values.insert(field.to_string(), value.clone());
                }
            }
        }
    }

    /// The schema this record is shaped by.
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Read the current value of `field`.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] if `field` is not in the schema.
    pub fn get(&self, field: &str) -> Result<&Value, ModelError> {
        self.values.get(field).ok_or_else(|| self.unknown(field))
    }

    /// Assign `value` to `field` and mark it dirty.
    ///
    /// Assigning `null` is meaningful: it requests that the remote side
    /// clear the field on the next save.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] if `field` is not in the schema.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        let canonical = self
            .schema
            .canonical(field)
            .ok_or_else(|| self.unknown(field))?;
        self.values.insert(canonical.to_string(), value.into());
        self.dirty.insert(canonical);
        Ok(())
    }

    /// Explicitly clear `field` (assign `null`, marking it dirty).
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] if `field` is not in the schema.
    pub fn clear(&mut self, field: &str) -> Result<(), ModelError> {
        self.set(field, Value::Null)
    }

    /// Whether `field` has been assigned since the last clean point.
    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Iterate over the fields assigned since the last clean point.
    pub fn dirty_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dirty.iter().copied()
    }

    /// Forget all dirty marks, establishing a new clean baseline.
    ///
    /// Called after a successful remote create/update.
    pub fn reset_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Produce the mapping to send to the remote API.
    ///
    /// A field is included iff its value is non-null, **or** it is dirty,
    /// **or** the schema marks it required. This predicate is exact: it is
    /// what keeps an update from accidentally clearing server-side fields
    /// the caller never touched.
    pub fn wire_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        for &field in self.schema.fields {
            let value = self.values.get(field).unwrap_or(&Value::Null);
            if !value.is_null() || self.dirty.contains(field) || self.schema.is_required(field) {
                payload.insert(field.to_string(), value.clone());
            }
        }
        payload
    }

    /// [`wire_payload`](Self::wire_payload) restricted to the schema's
    /// writable fields.
    ///
    /// Some endpoints (vehicle create/update) accept only a fixed subset of
    /// the resource's fields; the rest are server-maintained telemetry.
    pub fn writable_payload(&self) -> Map<String, Value> {
        if self.schema.writable.is_empty() {
            return self.wire_payload();
        }
        self.wire_payload()
            .into_iter()
            .filter(|(field, _)| self.schema.is_writable(field))
            .collect()
    }

    /// The non-null subset of the schema's identity fields.
    ///
    /// Used by save/find logic to look the resource up remotely. Unset
    /// identity components are omitted rather than sent as null.
    pub fn identity(&self) -> Map<String, Value> {
        let mut identity = Map::new();
        for &field in self.schema.identity {
            if let Some(value) = self.values.get(field) {
                if !value.is_null() {
                    identity.insert(field.to_string(), value.clone());
                }
            }
        }
        identity
    }

    /// Replace this record's values from a server response and clear all
    /// dirty marks.
    ///
    /// Unrecognised response keys are ignored; fields absent from the
    /// response fall back to their schema defaults.
    pub fn absorb(&mut self, response: &Value) {
        *self = Self::from_value(self.schema, response);
    }

    /// The full schema-shaped value map.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    fn unknown(&self, field: &str) -> ModelError {
        ModelError::UnknownField {
            resource: self.schema.resource,
            field: field.to_string(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.wire_payload().serialize(serializer)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Delivery-style schema: `date`, `do` and `address` are always emitted.
    static DELIVERY: Schema = Schema {
        resource: "delivery",
        fields: &["date", "do", "address", "instructions"],
        defaults: &[],
        required: &["date", "do", "address"],
        identity: &["do", "date"],
        writable: &[],
    };

    static TYPED: Schema = Schema {
        resource: "typed",
        fields: &["id", "type", "note"],
        defaults: &[("type", "Delivery")],
        required: &[],
        identity: &["id"],
        writable: &[],
    };

    fn sample() -> Record {
        Record::from_value(
            &DELIVERY,
            &json!({"date": "2024-01-01", "do": "D1", "address": "X"}),
        )
    }

    #[test]
    fn values_match_schema_exactly() {
        let record = sample();
        let keys: Vec<&str> = record.values().keys().map(String::as_str).collect();
        let mut expected: Vec<&str> = DELIVERY.fields.to_vec();
        expected.sort_unstable();
        let mut sorted = keys;
        sorted.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn construction_ignores_unknown_keys() {
        let record = Record::from_value(
            &DELIVERY,
            &json!({"date": "2024-01-01", "colour": "red", "weight": 3}),
        );
        assert!(record.get("colour").is_err());
        assert_eq!(record.values().len(), DELIVERY.fields.len());
    }

    #[test]
    fn construction_skips_null_and_empty_inputs() {
        let record = Record::from_value(
            &DELIVERY,
            &json!({"date": "", "do": null, "instructions": []}),
        );
        assert_eq!(record.get("date").unwrap(), &Value::Null);
        assert_eq!(record.get("do").unwrap(), &Value::Null);
        assert_eq!(record.get("instructions").unwrap(), &Value::Null);
    }

    #[test]
    fn construction_leaves_fields_clean() {
        let record = sample();
        assert_eq!(record.dirty_fields().count(), 0);
    }

    #[test]
    fn schema_defaults_apply_without_dirtying() {
        let record = Record::new(&TYPED);
        assert_eq!(record.get("type").unwrap(), &json!("Delivery"));
        assert!(!record.is_dirty("type"));
    }

    #[test]
    fn write_marks_dirty_and_serializes_even_null() {
        let mut record = sample();
        record.clear("instructions").unwrap();
        assert!(record.is_dirty("instructions"));
        let payload = record.wire_payload();
        assert_eq!(payload.get("instructions"), Some(&Value::Null));
    }

    #[test]
    fn clean_null_fields_are_omitted() {
        let record = sample();
        let payload = record.wire_payload();
        // `instructions` is null, untouched and not required.
        assert!(!payload.contains_key("instructions"));
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn required_fields_always_emitted() {
        let mut record = Record::new(&DELIVERY);
        record.set("do", "D9").unwrap();
        record.reset_dirty();
        record.clear("do").unwrap();
        let payload = record.wire_payload();
        // Required fields appear even when null.
        assert_eq!(payload.get("date"), Some(&Value::Null));
        assert_eq!(payload.get("do"), Some(&Value::Null));
        assert_eq!(payload.get("address"), Some(&Value::Null));
    }

    #[test]
    fn reset_dirty_restores_sparse_serialization() {
        let mut record = sample();
        record.clear("instructions").unwrap();
        record.reset_dirty();
        let payload = record.wire_payload();
        assert!(!payload.contains_key("instructions"));
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn payload_round_trips_through_construction() {
        let mut record = sample();
        record.set("instructions", "ring bell").unwrap();
        let payload = Value::Object(record.wire_payload());
        let rebuilt = Record::from_value(&DELIVERY, &payload);
        for (field, value) in record.wire_payload() {
            assert_eq!(rebuilt.get(&field).unwrap(), &value);
        }
    }

    #[test]
    fn explicit_clear_of_optional_field_is_sent() {
        // Construct, serialize sparsely, then explicitly clear a field and
        // observe the null travelling on the wire.
        let mut record = sample();
        let before = record.wire_payload();
        assert_eq!(
            Value::Object(before),
            json!({"date": "2024-01-01", "do": "D1", "address": "X"})
        );
        record.set("instructions", Value::Null).unwrap();
        let after = record.wire_payload();
        assert_eq!(after.get("instructions"), Some(&Value::Null));
    }

    #[test]
    fn unknown_field_errors_on_read_and_write() {
        let mut record = sample();
        assert_eq!(
            record.get("colour").unwrap_err(),
            ModelError::UnknownField {
                resource: "delivery",
                field: "colour".into()
            }
        );
        assert!(record.set("colour", "red").is_err());
    }

    #[test]
    fn identity_omits_unset_components() {
        let mut record = Record::new(&DELIVERY);
        record.set("do", "D7").unwrap();
        let identity = record.identity();
        assert_eq!(identity.get("do"), Some(&json!("D7")));
        assert!(!identity.contains_key("date"));
    }

    #[test]
    fn absorb_replaces_values_and_clears_dirty() {
        let mut record = sample();
        record.set("instructions", "old").unwrap();
        record.absorb(&json!({"date": "2024-02-02", "do": "D2", "address": "Y"}));
        assert_eq!(record.get("date").unwrap(), &json!("2024-02-02"));
        assert_eq!(record.get("instructions").unwrap(), &Value::Null);
        assert_eq!(record.dirty_fields().count(), 0);
    }

    #[test]
    fn display_renders_wire_payload() {
        let record = sample();
        let rendered: Value = serde_json::from_str(&record.to_string()).unwrap();
        assert_eq!(rendered, Value::Object(record.wire_payload()));
    }
}
