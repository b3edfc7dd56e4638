#![deny(missing_docs)]

//! # OpenFleet Models
//!
//! Core data types for the OpenFleet delivery-management API client.
//!
//! Every wire-facing resource (job, item, vehicle) is an attribute-tracked
//! record: a schema-shaped map of field values that remembers which fields
//! were explicitly assigned since construction or the last save. That dirty
//! set drives selective serialization, honouring the API's convention that
//! an absent key means "leave unchanged" while an explicit `null` means
//! "clear this field".
//!
//! ## Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`schema`] | Static per-resource field descriptors (`Schema`) |
//! | [`record`] | `Record`, the dirty-tracking attribute map |
//! | [`job`] | `Job` resource, `JobType`, `DocumentFormat` |
//! | [`item`] | `Item` line records and `ItemCollection` |
//! | [`vehicle`] | `Vehicle` resource and `VehicleStatus` |
//! | [`response`] | API response envelope and error codes |
//! | [`factory`] | Fake fixtures for tests and demos |

pub mod error;
pub mod factory;
pub mod item;
pub mod job;
pub mod record;
pub mod response;
pub mod schema;
pub mod vehicle;

// Re-export all public types at crate root for convenience.
// Downstream crates can use `openfleet_models::Job` directly.
pub use error::*;
pub use factory::*;
pub use item::*;
pub use job::*;
pub use record::*;
pub use response::*;
pub use schema::*;
pub use vehicle::*;
