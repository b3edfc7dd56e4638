//! Line items carried by a job.
//!
//! An [`Item`] is one SKU line (description, quantity, auxiliary fields) on
//! a delivery or collection job. Items are themselves attribute-tracked
//! records with a smaller schema, held in an ordered, duplicate-tolerant
//! [`ItemCollection`] owned by the parent job.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::record::Record;
use crate::schema::Schema;

/// Schema for a job line item.
///
/// `sku`, `description` and `quantity` are always emitted on the wire.
pub static ITEM_SCHEMA: Schema = Schema {
    resource: "item",
    fields: &[
        "id",
        "sku",
        "purchase_order_number",
        "batch_number",
        "expiry",
        "description",
        "comments",
        "quantity",
        "unit_of_measure",
        "checked",
        "actual_quantity",
        "inbound_quantity",
        "unload_time_estimate",
        "unload_time_actual",
        "follow_up_quantity",
        "follow_up_reason",
        "rework_quantity",
        "rework_reason",
        "reject_quantity",
        "reject_reason",
        "weight",
        "serial_numbers",
        "photo_url",
    ],
    defaults: &[],
    required: &["sku", "description", "quantity"],
    identity: &["id"],
    writable: &[],
};

/// One line item on a job.
#[derive(Debug, Clone)]
pub struct Item {
    record: Record,
}

impl Item {
    /// Create an empty item.
    pub fn new() -> Self {
        Self {
            record: Record::new(&ITEM_SCHEMA),
        }
    }

    /// Create an item from a (possibly sparse) JSON mapping.
    ///
    /// Unknown keys are ignored; populated fields start clean.
    pub fn from_value(input: &Value) -> Self {
        Self {
            record: Record::from_value(&ITEM_SCHEMA, input),
        }
    }

    /// Read a field by name.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the item schema.
    pub fn get(&self, field: &str) -> Result<&Value, ModelError> {
        self.record.get(field)
    }

    /// Assign a field by name, marking it dirty.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the item schema.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        self.record.set(field, value)
    }

    /// The item's server-assigned id, if any.
    pub fn id(&self) -> Option<&str> {
        self.record.get("id").ok().and_then(Value::as_str)
    }

    /// The stock-keeping unit code.
    pub fn sku(&self) -> Option<&str> {
        self.record.get("sku").ok().and_then(Value::as_str)
    }

    /// Set the stock-keeping unit code.
    pub fn set_sku(&mut self, sku: &str) {
        // "sku" is a schema field, the set cannot fail.
        let _ = self.record.set("sku", sku);
    }

    /// The human-readable description.
    pub fn description(&self) -> Option<&str> {
        self.record.get("description").ok().and_then(Value::as_str)
    }

    /// Set the human-readable description.
    pub fn set_description(&mut self, description: &str) {
        let _ = self.record.set("description", description);
    }

    /// The ordered quantity.
    pub fn quantity(&self) -> Option<i64> {
        self.record.get("quantity").ok().and_then(Value::as_i64)
    }

    /// Set the ordered quantity.
    pub fn set_quantity(&mut self, quantity: i64) {
        let _ = self.record.set("quantity", quantity);
    }

    /// The mapping to send to the remote API for this item.
    pub fn wire_payload(&self) -> Map<String, Value> {
        self.record.wire_payload()
    }

    /// Forget dirty marks after a successful save.
    pub fn reset_dirty(&mut self) {
        self.record.reset_dirty();
    }

    /// The underlying attribute-tracked record.
    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Item {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.record.serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// ItemCollection
// ---------------------------------------------------------------------------

/// Ordered, duplicate-tolerant sequence of items owned by a job.
#[derive(Debug, Clone, Default)]
pub struct ItemCollection(Vec<Item>);

impl ItemCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse a collection from a JSON array; anything else yields an empty
    /// collection.
    pub fn from_value(input: &Value) -> Self {
        match input {
            Value::Array(entries) => Self(entries.iter().map(Item::from_value).collect()),
            _ => Self::new(),
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: Item) {
        self.0.push(item);
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    /// Iterate mutably over the items in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Item> {
        self.0.iter_mut()
    }

    /// The item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.0.get(index)
    }

    /// Serialize every item's wire payload into a JSON array.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|item| Value::Object(item.wire_payload()))
                .collect(),
        )
    }

    /// Forget dirty marks on every item.
    pub fn reset_dirty(&mut self) {
        for item in &mut self.0 {
            item.reset_dirty();
        }
    }
}

impl From<Vec<Item>> for ItemCollection {
    fn from(items: Vec<Item>) -> Self {
        Self(items)
    }
}

impl IntoIterator for ItemCollection {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for ItemCollection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl fmt::Display for ItemCollection {
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

    #[test]
    fn required_item_fields_always_emitted() {
        let item = Item::new();
        let payload = item.wire_payload();
        assert_eq!(payload.get("sku"), Some(&Value::Null));
        assert_eq!(payload.get("description"), Some(&Value::Null));
        assert_eq!(payload.get("quantity"), Some(&Value::Null));
        assert!(!payload.contains_key("weight"));
    }

    #[test]
    fn typed_accessors() {
        let mut item = Item::new();
        item.set_sku("SKU-1");
        item.set_description("Widget");
        item.set_quantity(4);
        assert_eq!(item.sku(), Some("SKU-1"));
        assert_eq!(item.description(), Some("Widget"));
        assert_eq!(item.quantity(), Some(4));
    }

    #[test]
    fn unknown_item_field_is_rejected() {
        let mut item = Item::new();
        assert!(item.set("colour", "red").is_err());
    }

    #[test]
    fn collection_parses_json_array() {
        let collection = ItemCollection::from_value(&json!([
            {"sku": "A", "description": "first", "quantity": 1},
            {"sku": "B", "description": "second", "quantity": 2},
        ]));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(1).and_then(Item::sku), Some("B"));
    }

    #[test]
    fn collection_from_non_array_is_empty() {
        assert!(ItemCollection::from_value(&json!("nope")).is_empty());
        assert!(ItemCollection::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn collection_serializes_each_item_payload() {
        let mut collection = ItemCollection::new();
        let mut item = Item::new();
        item.set_sku("A");
        item.set_description("first");
        item.set_quantity(1);
        collection.push(item);
        assert_eq!(
            collection.to_value(),
            json!([{"sku": "A", "description": "first", "quantity": 1}])
        );
    }

    #[test]
    fn collection_tolerates_duplicates_in_order() {
        let mut collection = ItemCollection::new();
        let mut item = Item::new();
        item.set_sku("A");
        collection.push(item.clone());
        collection.push(item);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(0).and_then(Item::sku), Some("A"));
        assert_eq!(collection.get(1).and_then(Item::sku), Some("A"));
    }
}
