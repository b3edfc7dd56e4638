//! Vehicle (driver) resources.
//!
//! A [`Vehicle`] represents a driver attached to an organisation. Most of
//! its fields are server-maintained telemetry (position, speed, battery,
//! connection state); only a small subset may be written on create/update,
//! expressed through the schema's writable mask.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::record::Record;
use crate::schema::Schema;

/// Schema for a vehicle resource.
///
/// `id` is tied to the organisation and dies with the vehicle; `staff_id`
/// is tied to the person driving and persists across organisations. Create
/// and update requests accept only the writable subset below.
pub static VEHICLE_SCHEMA: Schema = Schema {
    resource: "vehicle",
    fields: &[
        "id",
        "staff_id",
        "name",
        "os_and_version",
        "app_version",
        "speed_limit",
        "stationary_limit",
        "groups",
        "disabled",
        "can_grab_job",
        "mobile_number",
        "zones",
        "status",
        "speed",
        "max_speed",
        "avg_speed",
        "distance",
        "battery",
        "gps",
        "lat",
        "lng",
        "address",
        "connected_at",
        "tracked_at",
        "connection",
        "checked_in_at",
        "created_at",
        "route",
        "heading_to_address",
        "heading_to",
        "last_pod_at",
    ],
    defaults: &[],
    required: &[],
    identity: &["id"],
    writable: &[
        "staff_id",
        "name",
        "speed_limit",
        "stationary_limit",
        "groups",
        "can_grab_job",
        "mobile_number",
        "zones",
    ],
};

/// Fields a vehicle can be created with; create and update preflight these
/// locally before any network call.
pub static VEHICLE_CREATE_FIELDS: &[&str] = &["name", "staff_id"];

// ---------------------------------------------------------------------------
// VehicleStatus
// ---------------------------------------------------------------------------

/// Status of a vehicle as reported by the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleStatus {
    /// Temporarily prevented from accepting jobs.
    Disabled,
    /// App installed but never checked in.
    Installed,
    /// Checked out.
    Off,
    /// Travelling above the configured speed limit.
    Speeding,
    /// Idle beyond the configured stationary limit.
    Stationary,
    /// Tracking normally.
    Normal,
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

/// A driver registered with the organisation.
#[derive(Debug, Clone)]
pub struct Vehicle {
    record: Record,
}

impl Vehicle {
    /// Create an empty vehicle.
    pub fn new() -> Self {
        Self {
            record: Record::new(&VEHICLE_SCHEMA),
        }
    }

    /// Create a vehicle from a (possibly sparse) JSON mapping.
    pub fn from_value(input: &Value) -> Self {
        Self {
            record: Record::from_value(&VEHICLE_SCHEMA, input),
        }
    }

    /// Read a field by name.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the vehicle schema.
    pub fn get(&self, field: &str) -> Result<&Value, ModelError> {
        self.record.get(field)
    }

    /// Assign a field by name, marking it dirty.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the vehicle schema.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        self.record.set(field, value)
    }

    /// The organisation-scoped vehicle id, if known.
    pub fn id(&self) -> Option<&str> {
        self.record.get("id").ok().and_then(Value::as_str)
    }

    /// The person-scoped staff id, if known.
    pub fn staff_id(&self) -> Option<&str> {
        self.record.get("staff_id").ok().and_then(Value::as_str)
    }

    /// Set the person-scoped staff id.
    pub fn set_staff_id(&mut self, staff_id: &str) {
        // "staff_id" is a schema field, the set cannot fail.
        let _ = self.record.set("staff_id", staff_id);
    }

    /// The name the organisation uses for this driver.
    pub fn name(&self) -> Option<&str> {
        self.record.get("name").ok().and_then(Value::as_str)
    }

    /// Set the driver's name.
    pub fn set_name(&mut self, name: &str) {
        let _ = self.record.set("name", name);
    }

    /// The vehicle status, when the `status` field parses as one.
    pub fn status(&self) -> Option<VehicleStatus> {
        self.record
            .get("status")
            .ok()
            .and_then(Value::as_str)
            .and_then(|s| VehicleStatus::from_str(s).ok())
    }

    /// The mapping to send to the remote API (all emittable fields).
    pub fn wire_payload(&self) -> Map<String, Value> {
        self.record.wire_payload()
    }

    /// The payload accepted by create/update endpoints: the wire payload
    /// restricted to the writable field subset.
    pub fn writable_payload(&self) -> Map<String, Value> {
        self.record.writable_payload()
    }

    /// Forget dirty marks after a successful save.
    pub fn reset_dirty(&mut self) {
        self.record.reset_dirty();
    }

    /// Replace the vehicle from a server response, clearing dirty marks.
    pub fn absorb(&mut self, response: &Value) {
        self.record.absorb(response);
    }

    /// The underlying attribute-tracked record.
    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Vehicle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.record.serialize(serializer)
    }
}

impl fmt::Display for Vehicle {
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
    fn writable_payload_masks_telemetry() {
        let mut vehicle = Vehicle::from_value(&json!({
            "id": "v-1",
            "name": "Truck 7",
            "speed": 55.0,
            "battery": 0.8,
        }));
        vehicle.set("speed_limit", 90).unwrap();
        let payload = vehicle.writable_payload();
        assert_eq!(payload.get("name"), Some(&json!("Truck 7")));
        assert_eq!(payload.get("speed_limit"), Some(&json!(90)));
        assert!(!payload.contains_key("speed"));
        assert!(!payload.contains_key("battery"));
        assert!(!payload.contains_key("id"));
    }

    #[test]
    fn wire_payload_keeps_telemetry() {
        let vehicle = Vehicle::from_value(&json!({"id": "v-1", "speed": 55.0}));
        let payload = vehicle.wire_payload();
        assert_eq!(payload.get("speed"), Some(&json!(55.0)));
    }

    #[test]
    fn status_parses_wire_spelling() {
        let vehicle = Vehicle::from_value(&json!({"status": "stationary"}));
        assert_eq!(vehicle.status(), Some(VehicleStatus::Stationary));
        assert_eq!(VehicleStatus::Normal.to_string(), "normal");
    }

    #[test]
    fn identity_is_the_id() {
        let vehicle = Vehicle::from_value(&json!({"id": "v-9", "name": "Van 2"}));
        assert_eq!(
            Value::Object(vehicle.record().identity()),
            json!({"id": "v-9"})
        );
    }

    #[test]
    fn unknown_vehicle_field_is_rejected() {
        let mut vehicle = Vehicle::new();
        assert!(vehicle.set("wingspan", 12).is_err());
    }
}
