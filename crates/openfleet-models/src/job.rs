//! Job resources (deliveries and collections).
//!
//! A [`Job`] is the central resource of the OpenFleet API: one delivery or
//! collection order, discriminated by its [`JobType`]. The flat attributes
//! live in an attribute-tracked [`Record`]; the nested line items live in an
//! [`ItemCollection`] owned by the job and are merged into the wire payload
//! under the `items` key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::item::{Item, ItemCollection};
use crate::record::Record;
use crate::schema::Schema;
use crate::vehicle::Vehicle;

/// Schema for a job resource.
///
/// `do_number`, `date` and `address` are always emitted on the wire; a job
/// is looked up remotely by its order number and date. The field list
/// mirrors the API v2 job document; most fields are optional and many are
/// server-maintained (POD timestamps, geocoding results, ratings).
pub static JOB_SCHEMA: Schema = Schema {
    resource: "job",
    fields: &[
        "id",
        "type",
        "deliver_to",
        "do_number",
        "date",
        "address",
        "instructions",
        "assign_to",
        "notify_email",
        "webhook_url",
        "zone",
        "initial_status",
        "open_job",
        "offer",
        "attempt",
        "start_date",
        "age",
        "sync_time",
        "job_time",
        "time_slot",
        "request_date",
        "tracking_number",
        "order_number",
        "job_type",
        "job_order",
        "job_fee",
        "address_lat",
        "address_lng",
        "address_company",
        "address_1",
        "address_2",
        "address_3",
        "postal_code",
        "city",
        "state",
        "country",
        "billing_address",
        "contact_name",
        "contact_last_name",
        "contact_phone",
        "sender_phone",
        "fax",
        "customer",
        "account_no",
        "owner_name",
        "invoice_number",
        "invoice_amount",
        "payment_mode",
        "payment_amount",
        "group_name",
        "vendor_name",
        "shipper_name",
        "source",
        "weight",
        "parcel_width",
        "parcel_length",
        "parcel_height",
        "cubic_meter",
        "boxes",
        "cartons",
        "pieces",
        "envelopes",
        "pallets",
        "bins",
        "trays",
        "bundles",
        "rolls",
        "labels",
        "attachment_1",
        "fleet_number",
        "status",
        "tracking_status",
        "reason",
        "last_reason",
        "handled_by",
        "note",
        "carrier",
        "pod_lat",
        "pod_lng",
        "pod_address",
        "address_tracked_at",
        "arrived_lat",
        "arrived_lng",
        "arrived_address",
        "arrived_at",
        "texted_at",
        "called_at",
        "serial_number",
        "signed_at",
        "photo_1_at",
        "photo_2_at",
        "photo_3_at",
        "photo_4_at",
        "photo_5_at",
        "signature_file_url",
        "photo_1_file_url",
        "photo_2_file_url",
        "photo_3_file_url",
        "photo_4_file_url",
        "photo_5_file_url",
        "actual_weight",
        "temperature",
        "hold_time",
        "payment_collected",
        "reschedule",
        "actual_crates",
        "actual_pallets",
        "actual_utilization",
        "goods_service_rating",
        "driver_rating",
        "feedback_remarks",
        "eta_time",
        "live_eta",
        "depot",
        "depot_contact",
        "department",
        "sales_person",
        "identification_number",
        "bank_prefix",
        "run_number",
        "pick_up_from",
        "pick_up_time",
        "pick_up_lat",
        "pick_up_lng",
        "pick_up_address",
        "pick_up_address_1",
        "pick_up_address_2",
        "pick_up_address_3",
        "pick_up_city",
        "pick_up_state",
        "pick_up_country",
        "pick_up_postal_code",
        "pick_up_zone",
        "pick_up_assign_to",
        "pick_up_reason",
        "info_received_at",
        "pick_up_at",
        "scheduled_at",
        "at_warehouse_at",
        "out_for_delivery_at",
        "head_to_pick_up_at",
        "head_to_delivery_at",
        "cancelled_at",
        "pod_at",
        "pick_up_failed_count",
        "deliver_failed_count",
        "job_price",
        "insurance_price",
        "insured",
        "total_price",
        "payer_type",
        "remarks",
        "items_count",
        "service_type",
        "warehouse_address",
        "destination_timeslot",
        "door",
        "time_zone",
        "created_at",
    ],
    defaults: &[("type", "Delivery")],
    required: &["do_number", "date", "address"],
    identity: &["do_number", "date"],
    writable: &[],
};

// ---------------------------------------------------------------------------
// JobType
// ---------------------------------------------------------------------------

/// Discriminator for the two kinds of job the API manages.
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
pub enum JobType {
    /// Goods travel from the warehouse to the customer.
    Delivery,
    /// Goods are picked up from the customer.
    Collection,
}

// ---------------------------------------------------------------------------
// DocumentFormat
// ---------------------------------------------------------------------------

/// Export format for proof-of-delivery documents.
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
pub enum DocumentFormat {
    /// Portable document format.
    Pdf,
    /// Tagged image file format.
    Tiff,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One delivery or collection order.
#[derive(Debug, Clone)]
pub struct Job {
    record: Record,
    items: ItemCollection,
}

impl Job {
    /// Create an empty job (type defaults to [`JobType::Delivery`]).
    pub fn new() -> Self {
        Self {
            record: Record::new(&JOB_SCHEMA),
            items: ItemCollection::new(),
        }
    }

    /// Create an empty delivery job.
    pub fn delivery() -> Self {
        Self::with_type(JobType::Delivery)
    }

    /// Create an empty collection job.
    pub fn collection() -> Self {
        Self::with_type(JobType::Collection)
    }

    /// Create an empty job of the given type.
    ///
    /// The type counts as a default, not a mutation: the job starts clean.
    pub fn with_type(job_type: JobType) -> Self {
        let mut job = Self::new();
        // "type" is a schema field, the set cannot fail.
        let _ = job.record.set("type", job_type.to_string());
        job.record.reset_dirty();
        job
    }

    /// Create a job from a (possibly sparse) JSON mapping.
    ///
    /// The `items` key, when present as an array, becomes the job's item
    /// collection; unknown keys are ignored; populated fields start clean.
    pub fn from_value(input: &Value) -> Self {
        let items = input
            .get("items")
            .map_or_else(ItemCollection::new, ItemCollection::from_value);
        Self {
            record: Record::from_value(&JOB_SCHEMA, input),
            items,
        }
    }

    // ------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------

    /// Read a field by name.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the job schema.
    pub fn get(&self, field: &str) -> Result<&Value, ModelError> {
        self.record.get(field)
    }

    /// Assign a field by name, marking it dirty.
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the job schema.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        self.record.set(field, value)
    }

    /// Explicitly clear a field (send `null` on the next save).
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownField`] for names outside the job schema.
    pub fn clear(&mut self, field: &str) -> Result<(), ModelError> {
        self.record.clear(field)
    }

    /// The job's server-assigned id, if any.
    pub fn id(&self) -> Option<&str> {
        self.record.get("id").ok().and_then(Value::as_str)
    }

    /// The job type, when the `type` field parses as one.
    pub fn job_type(&self) -> Option<JobType> {
        self.record
            .get("type")
            .ok()
            .and_then(Value::as_str)
            .and_then(|s| JobType::from_str(s).ok())
    }

    /// The delivery order number.
    pub fn do_number(&self) -> Option<&str> {
        self.record.get("do_number").ok().and_then(Value::as_str)
    }

    /// Set the delivery order number (must be unique per date).
    pub fn set_do_number(&mut self, do_number: &str) {
        let _ = self.record.set("do_number", do_number);
    }

    /// The job date (`YYYY-MM-DD`).
    pub fn date(&self) -> Option<&str> {
        self.record.get("date").ok().and_then(Value::as_str)
    }

    /// Set the job date (`YYYY-MM-DD`).
    pub fn set_date(&mut self, date: &str) {
        let _ = self.record.set("date", date);
    }

    /// The full delivery address.
    pub fn address(&self) -> Option<&str> {
        self.record.get("address").ok().and_then(Value::as_str)
    }

    /// Set the full delivery address. Include the country name for accurate
    /// geocoding.
    pub fn set_address(&mut self, address: &str) {
        let _ = self.record.set("address", address);
    }

    /// The current job status, as reported by the server.
    pub fn status(&self) -> Option<&str> {
        self.record.get("status").ok().and_then(Value::as_str)
    }

    /// The name of the vehicle this job is assigned to.
    pub fn assigned_to(&self) -> Option<&str> {
        self.record.get("assign_to").ok().and_then(Value::as_str)
    }

    /// Assign the job to a driver by vehicle name.
    pub fn assign_to_name(&mut self, name: &str) {
        let _ = self.record.set("assign_to", name);
    }

    /// Assign the job to a driver by [`Vehicle`].
    ///
    /// # Errors
    ///
    /// [`ModelError::MissingField`] when the vehicle has no name yet.
    pub fn assign_to(&mut self, vehicle: &Vehicle) -> Result<(), ModelError> {
        let name = vehicle.name().ok_or(ModelError::MissingField {
            resource: "vehicle",
            field: "name",
        })?;
        let name = name.to_string();
        self.record.set("assign_to", name)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// The job's line items.
    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    /// Mutable access to the job's line items.
    pub fn items_mut(&mut self) -> &mut ItemCollection {
        &mut self.items
    }

    /// Replace the job's line items.
    pub fn set_items(&mut self, items: impl Into<ItemCollection>) {
        self.items = items.into();
    }

    /// Append a single line item.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    // ------------------------------------------------------------------
    // Wire contract
    // ------------------------------------------------------------------

    /// The mapping to send to the remote API.
    ///
    /// Flat fields follow the record's selective-serialization predicate;
    /// the item collection is merged under `items` when non-empty (an
    /// absent `items` key means "leave the items unchanged").
    pub fn wire_payload(&self) -> Map<String, Value> {
        let mut payload = self.record.wire_payload();
        if !self.items.is_empty() {
            payload.insert("items".to_string(), self.items.to_value());
        }
        payload
    }

    /// The non-null subset of the job's identity (`do_number` + `date`).
    pub fn identity(&self) -> Map<String, Value> {
        self.record.identity()
    }

    /// Forget all dirty marks on the job and its items.
    pub fn reset_dirty(&mut self) {
        self.record.reset_dirty();
        self.items.reset_dirty();
    }

    /// Replace the job from a server response, clearing all dirty marks.
    pub fn absorb(&mut self, response: &Value) {
        self.record.absorb(response);
        self.items = response
            .get("items")
            .map_or_else(ItemCollection::new, ItemCollection::from_value);
    }

    /// The underlying attribute-tracked record (flat fields only).
    pub fn record(&self) -> &Record {
        &self.record
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Job {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.wire_payload().serialize(serializer)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
